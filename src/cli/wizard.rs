//! Interactive flows: the default wizard and the config command.
//!
//! This module handles terminal presentation only; the meeting flow itself
//! lives in `cli::meeting` and is driven by the same argument structs the
//! non-interactive subcommands use.

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use std::io::{self, IsTerminal};

use crate::cli::args::{ConfigCliArgs, ConfigCommand, MeetingCliArgs, ProcessCliArgs, RecordCliArgs};
use crate::cli::meeting::{handle_process_command, handle_record_command};
use crate::config::Config;

/// Default flow when no subcommand is given: prompt for everything the
/// subcommands take as flags, then run the same handlers.
pub async fn run_interactive() -> Result<()> {
    if !io::stdin().is_terminal() {
        bail!(
            "No terminal available. Use `minutary record` or `minutary process <file>` \
             for non-interactive runs."
        );
    }

    let theme = ColorfulTheme::default();

    println!();
    println!("Minutary - meeting transcription and notes");
    println!("==========================================");
    println!();

    let options = vec!["Record a new meeting", "Use an existing audio file"];
    let selection = Select::with_theme(&theme)
        .with_prompt("What would you like to do?")
        .items(&options)
        .default(0)
        .interact()?;

    let meeting = prompt_meeting_options(&theme)?;

    if selection == 0 {
        let duration: String = Input::with_theme(&theme)
            .with_prompt("Recording length in seconds (empty = stop with Ctrl+C)")
            .allow_empty(true)
            .interact_text()?;
        let duration = duration.trim().parse::<u64>().ok();

        handle_record_command(RecordCliArgs { duration, meeting }).await
    } else {
        let file: String = Input::with_theme(&theme)
            .with_prompt("Path to the audio file")
            .interact_text()?;

        handle_process_command(ProcessCliArgs {
            file: file.trim().into(),
            meeting,
        })
        .await
    }
}

fn prompt_meeting_options(theme: &ColorfulTheme) -> Result<MeetingCliArgs> {
    let title: String = Input::with_theme(theme)
        .with_prompt("Meeting title (empty = automatic)")
        .allow_empty(true)
        .interact_text()?;
    let title = title.trim();

    let email = if Confirm::with_theme(theme)
        .with_prompt("Email the notes to participants?")
        .default(false)
        .interact()?
    {
        let emails: String = Input::with_theme(theme)
            .with_prompt("Recipient addresses (comma separated)")
            .interact_text()?;
        emails
            .split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    Ok(MeetingCliArgs {
        title: (!title.is_empty()).then(|| title.to_string()),
        email,
        language: None,
        output_dir: None,
    })
}

pub fn handle_config_command(args: ConfigCliArgs) -> Result<()> {
    match args.command {
        Some(ConfigCommand::Show) | None => show_config(),
        Some(ConfigCommand::Setup) => run_setup(),
    }
}

fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!();
    println!("Minutary Configuration");
    println!("======================");
    println!();
    println!("OpenAI");
    println!(
        "  API key:        {}",
        if config.openai.resolved_api_key().is_some() {
            "configured"
        } else {
            "<not set>"
        }
    );
    println!("  API base:       {}", config.openai.api_base);
    println!("  Transcription:  {}", config.openai.transcription_model);
    println!("  Chat model:     {}", config.openai.chat_model);
    println!("  Language:       {}", config.openai.language);
    println!();
    println!("Transcription");
    println!("  Size ceiling:   {} MB", config.transcription.size_ceiling_mb);
    println!(
        "  Request timeout: {} s",
        config.transcription.request_timeout_seconds
    );
    println!();
    println!("Email");
    println!(
        "  SMTP server:    {}:{}",
        config.email.resolved_smtp_server(),
        config.email.resolved_port()
    );
    println!(
        "  Username:       {}",
        config
            .email
            .resolved_username()
            .unwrap_or_else(|| "<not set>".to_string())
    );
    println!("  Sender name:    {}", config.email.sender_name);

    Ok(())
}

fn run_setup() -> Result<()> {
    if !io::stdin().is_terminal() {
        bail!("Config setup requires a terminal. Edit the config file directly instead.");
    }

    let theme = ColorfulTheme::default();
    let mut config = Config::load()?;

    let api_key: String = Password::with_theme(&theme)
        .with_prompt("OpenAI API key (empty = keep current / use OPENAI_API_KEY)")
        .allow_empty_password(true)
        .interact()?;
    if !api_key.trim().is_empty() {
        config.openai.api_key = Some(api_key.trim().to_string());
    }

    let language: String = Input::with_theme(&theme)
        .with_prompt("Transcription language")
        .default(config.openai.language.clone())
        .interact_text()?;
    config.openai.language = language.trim().to_string();

    if Confirm::with_theme(&theme)
        .with_prompt("Configure email delivery?")
        .default(false)
        .interact()?
    {
        let server: String = Input::with_theme(&theme)
            .with_prompt("SMTP server")
            .default(config.email.smtp_server.clone())
            .interact_text()?;
        config.email.smtp_server = server.trim().to_string();

        let port: String = Input::with_theme(&theme)
            .with_prompt("SMTP port")
            .default(config.email.port.to_string())
            .interact_text()?;
        config.email.port = port.trim().parse().unwrap_or(587);

        let username: String = Input::with_theme(&theme)
            .with_prompt("SMTP username")
            .allow_empty(true)
            .interact_text()?;
        if !username.trim().is_empty() {
            config.email.username = Some(username.trim().to_string());
        }

        let password: String = Password::with_theme(&theme)
            .with_prompt("SMTP password (empty = keep current)")
            .allow_empty_password(true)
            .interact()?;
        if !password.is_empty() {
            config.email.password = Some(password);
        }
    }

    config.save()?;
    println!("Configuration saved.");

    Ok(())
}
