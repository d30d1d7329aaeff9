use std::path::PathBuf;

use serde::Serialize;

use crate::client::ApiSportsClient;
use crate::config::Settings;
use crate::error::Result;
use crate::output;
use crate::responses::Extraction;

/// What a fetch run did, printed as-is in JSON mode.
#[derive(Serialize, Debug, PartialEq)]
pub struct FetchSummary {
    pub saved: usize,
    pub skipped: usize,
    pub path: PathBuf,
}

/// Fetch the configured country's teams and overwrite the output file.
///
/// Returns `None` when the provider had no teams; the output file is then
/// left untouched.
pub async fn run(
    client: &ApiSportsClient,
    settings: &Settings,
    strict: bool,
) -> Result<Option<FetchSummary>> {
    output::print_progress(&format!("Fetching teams for {}...", settings.country));

    let (teams, skipped) = match client.teams(&settings.country).await? {
        Extraction::Teams { teams, skipped } => (teams, skipped),
        Extraction::NoData { envelope } => {
            super::report_no_data(&settings.country, &envelope, strict)?;
            return Ok(None);
        }
    };

    output::write_json_file(&settings.output_path, &teams)?;

    let summary = FetchSummary {
        saved: teams.len(),
        skipped,
        path: settings.output_path.clone(),
    };
    output::print_success(&summary_message(&summary), &summary);

    Ok(Some(summary))
}

fn summary_message(summary: &FetchSummary) -> String {
    let noun = if summary.saved == 1 { "team" } else { "teams" };
    let mut message = format!("Saved {} {noun} to {}", summary.saved, summary.path.display());
    if summary.skipped > 0 {
        message.push_str(&format!(" ({} skipped)", summary.skipped));
    }
    message
}
