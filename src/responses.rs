//! Provider response envelope and the team extraction that runs over it.
//!
//! The body is kept as a `serde_json::Value` so the "no data" path can echo
//! the structure the provider actually sent.

use serde_json::Value;
use tracing::debug;

use crate::error::{FetchError, Result};
use crate::types::Team;

/// Outcome of inspecting a response envelope.
#[derive(Debug)]
pub enum Extraction {
    /// The envelope carried a non-empty `response` array.
    Teams { teams: Vec<Team>, skipped: usize },
    /// No usable `response`; holds the parsed body for diagnostics.
    NoData { envelope: Value },
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Validate the envelope and pull `{name, logo}` out of every complete entry.
///
/// Entries keep their input order. Anything without a non-empty string
/// `team.name` and `team.logo` is counted in `skipped`.
pub fn extract_teams(envelope: Value) -> Result<Extraction> {
    if !envelope.get("response").is_some_and(is_truthy) {
        return Ok(Extraction::NoData { envelope });
    }

    let response = &envelope["response"];
    let entries = response.as_array().ok_or_else(|| {
        FetchError::UnexpectedShape(format!(
            "`response` should be an array, got {}",
            kind(response)
        ))
    })?;

    let mut teams = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for (index, entry) in entries.iter().enumerate() {
        match team_from_entry(entry) {
            Some(team) => teams.push(team),
            None => {
                skipped += 1;
                debug!(index, entry = %entry, "skipping incomplete team entry");
            }
        }
    }

    Ok(Extraction::Teams { teams, skipped })
}

fn team_from_entry(entry: &Value) -> Option<Team> {
    let team = entry.get("team")?;
    let name = non_empty_str(team.get("name")?)?;
    let logo = non_empty_str(team.get("logo")?)?;

    Some(Team {
        name: name.to_string(),
        logo: logo.to_string(),
    })
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Human-readable messages from the provider's `errors` field.
///
/// API-Sports sends either an empty array or an object keyed by error kind,
/// e.g. `{"token": "Error/Missing application key"}`.
pub fn provider_errors(envelope: &Value) -> Vec<String> {
    match envelope.get("errors") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| format!("{key}: {}", display_value(value)))
            .collect(),
        Some(Value::Array(items)) => items.iter().map(display_value).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
