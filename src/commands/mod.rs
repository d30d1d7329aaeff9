pub mod fetch;
pub mod init;
pub mod teams;

use serde_json::Value;

use crate::error::{FetchError, Result};
use crate::output;
use crate::responses;

/// Report an envelope without teams. Only an error when `strict` is set.
pub fn report_no_data(country: &str, envelope: &Value, strict: bool) -> Result<()> {
    let raw = output::to_pretty_json(envelope)?;
    output::print_warning(&format!("No teams found for {country} or the provider returned an error: {raw}"));

    for message in responses::provider_errors(envelope) {
        output::print_warning(&format!("Provider error: {message}"));
    }

    if strict {
        return Err(FetchError::NoTeams {
            country: country.to_string(),
        });
    }

    Ok(())
}
