use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::{Config, DEFAULT_COUNTRY, DEFAULT_OUTPUT_PATH};
use crate::error::{FetchError, Result};

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    if config_path.exists() {
        let answer = prompt(
            &mut input,
            &format!(
                "Config file already exists at {}. Overwrite? [y/N] ",
                config_path.display()
            ),
        )?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("teams-fetch Configuration");
    println!("=========================\n");

    let api_key = prompt(
        &mut input,
        "Enter your API-Sports key (find it at https://dashboard.api-football.com): ",
    )?;
    if api_key.is_empty() {
        return Err(FetchError::MissingApiKey);
    }

    let country = prompt(
        &mut input,
        &format!("Enter default country [optional, {DEFAULT_COUNTRY}]: "),
    )?;
    let output_path = prompt(
        &mut input,
        &format!("Enter default output file [optional, {DEFAULT_OUTPUT_PATH}]: "),
    )?;

    let config = build_config(api_key, country, output_path);
    let contents = toml::to_string(&config)?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FetchError::OutputWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, contents).map_err(|e| FetchError::OutputWrite {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now run 'teams-fetch fetch'!");

    Ok(())
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn build_config(api_key: String, country: String, output_path: String) -> Config {
    Config {
        api_key: Some(api_key),
        country: (!country.is_empty()).then_some(country),
        output_path: (!output_path.is_empty()).then(|| PathBuf::from(output_path)),
        ..Default::default()
    }
}
