use tabled::Tabled;

use crate::client::ApiSportsClient;
use crate::config::Settings;
use crate::error::Result;
use crate::output::{self, truncate};
use crate::responses::Extraction;
use crate::types::Team;

const MAX_LOGO_WIDTH: usize = 60;

#[derive(Tabled)]
struct TeamRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Logo")]
    logo: String,
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            logo: truncate(&team.logo, MAX_LOGO_WIDTH),
        }
    }
}

/// Fetch the configured country's teams and print them. Returns how many
/// teams were shown.
pub async fn list(client: &ApiSportsClient, settings: &Settings, strict: bool) -> Result<usize> {
    output::print_progress(&format!("Fetching teams for {}...", settings.country));

    match client.teams(&settings.country).await? {
        Extraction::Teams { teams, skipped } => {
            if let Some(note) = skipped_note(skipped) {
                output::print_progress(&note);
            }
            output::print_table(&teams, |t| TeamRow::from(t));
            Ok(teams.len())
        }
        Extraction::NoData { envelope } => {
            super::report_no_data(&settings.country, &envelope, strict)?;
            Ok(0)
        }
    }
}

fn skipped_note(skipped: usize) -> Option<String> {
    match skipped {
        0 => None,
        1 => Some("Left out 1 incomplete team entry".to_string()),
        n => Some(format!("Left out {n} incomplete team entries")),
    }
}
