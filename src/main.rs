mod report;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use dialoguer::Input;
use ia_client::{ClientConfig, FileConfigStore, InPostClient};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "inpost-air",
    version,
    about = "Air quality readings from InPost parcel locker sensors"
)]
struct Cli {
    /// Point identifier, e.g. KRA01M (case-insensitive)
    point_id: Option<String>,

    /// Log in to InPost Mobile with an SMS code first
    #[arg(long)]
    login: bool,

    /// Session file, defaults to <executable>.config.json next to the executable
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(point_id) = cli
        .point_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_uppercase)
    else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    debug!("Using session file {}", config_path.display());

    let mut client = InPostClient::new(ClientConfig::default(), FileConfigStore::new(&config_path))
        .with_context(|| format!("Couldn't load session from {}", config_path.display()))?;

    if cli.login {
        login(&mut client)?;
    }

    let point = client
        .get_point(&point_id)
        .with_context(|| format!("Couldn't get air sensor data for {}", point_id))?;

    print!("{}", report::render(&point_id, &point));
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Two step SMS login, prompting on the terminal
fn login(client: &mut InPostClient) -> anyhow::Result<()> {
    let phone_number = prompt_digits("Phone number")?;
    client
        .send_login_code(&phone_number)
        .context("Couldn't send the SMS code")?;

    let sms_code = prompt_digits("SMS code")?;
    client
        .confirm_login_code(&phone_number, &sms_code)
        .context("Couldn't confirm the SMS code")?;

    println!("Logged in.");
    Ok(())
}

fn prompt_digits(prompt: &str) -> anyhow::Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
                Ok(())
            } else {
                Err("digits only")
            }
        })
        .interact_text()?;

    Ok(value)
}

fn default_config_path() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("Couldn't locate the executable")?;
    Ok(config_path_for(&exe))
}

/// `/opt/bin/inpost-air.exe` -> `/opt/bin/inpost-air.config.json`
fn config_path_for(exe: &Path) -> PathBuf {
    let stem = exe
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("inpost-air");
    exe.with_file_name(format!("{}.config.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_next_to_executable() {
        assert_eq!(
            config_path_for(Path::new("/opt/bin/inpost-air")),
            Path::new("/opt/bin/inpost-air.config.json")
        );
        assert_eq!(
            config_path_for(Path::new("C:/tools/air.exe")),
            Path::new("C:/tools/air.config.json")
        );
    }

    #[test]
    fn test_cli_parses_login_and_point() {
        let cli = Cli::try_parse_from(["inpost-air", "--login", "kra01m"]).unwrap();

        assert!(cli.login);
        assert_eq!(cli.point_id.as_deref(), Some("kra01m"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
