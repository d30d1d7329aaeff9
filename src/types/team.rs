use serde::{Deserialize, Serialize};

/// A team as saved to disk: just the display name and the logo URL.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub logo: String,
}
