use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{DEFAULT_API_URL, DEFAULT_LIFF_ID, StoredConfig, config_file_path};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
    /// Store the bearer token used for API requests.
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored bearer token.
    Logout,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
        ConfigCommand::Login { token } => run_login(token),
        ConfigCommand::Logout => run_logout(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring helpdesk CLI.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Tokens are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        &format!("API base URL (default {DEFAULT_API_URL})"),
        &mut cfg.api_base_url,
        false,
    )?;
    apply_prompt(
        &format!("LIFF id (default {DEFAULT_LIFF_ID})"),
        &mut cfg.liff_id,
        false,
    )?;
    apply_prompt("API bearer token", &mut cfg.token, true)?;

    let mut line_sdk = cfg.line_sdk.map(|enabled| enabled.to_string());
    apply_prompt("Use LINE SDK (true/false)", &mut line_sdk, false)?;
    cfg.line_sdk = line_sdk.as_deref().map(parse_bool).transpose()?;

    apply_prompt("LINE access token", &mut cfg.line_access_token, true)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("API base URL: {}", display_value(&cfg.api_base_url));
    println!("LIFF id: {}", display_value(&cfg.liff_id));
    println!("API token: {}", mask_secret(&cfg.token));
    println!(
        "LINE SDK: {}",
        display_value(&cfg.line_sdk.map(|enabled| enabled.to_string()))
    );
    println!("LINE access token: {}", mask_secret(&cfg.line_access_token));

    Ok(())
}

fn run_login(token: String) -> AppResult<()> {
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(AppError::Validation("token must not be empty".to_string()));
    }
    let mut cfg = StoredConfig::load()?;
    cfg.token = Some(token);
    cfg.save()?;
    println!("Token saved.");
    Ok(())
}

fn run_logout() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;
    cfg.token = None;
    cfg.save()?;
    println!("Token removed.");
    Ok(())
}

fn parse_bool(value: &str) -> AppResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(AppError::Configuration(format!(
            "expected true or false, got '{other}'"
        ))),
    }
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::from_input(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}
