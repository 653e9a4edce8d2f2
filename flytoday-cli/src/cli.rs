use std::{fs, io, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use flytoday_core::{Config, WebhookHandler, provider_from_config};
use inquire::{CustomType, Text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "flytoday", version, about = "Aviation weather for voice assistants")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the Dialogflow webhook over HTTP.
    Serve {
        /// Listen address; defaults to the configured `bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Answer a single webhook request and print the JSON response.
    Handle {
        /// Request file; reads stdin when absent.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Ask about the weather at an airport.
    Ask {
        /// ICAO code, e.g. "CYYZ".
        icao: String,

        /// Airport name used in the answer; defaults to the ICAO code.
        #[arg(long)]
        airport: Option<String>,

        /// Intent name, e.g. "get_wind_information".
        #[arg(long, default_value = "get_flight_condition")]
        intent: String,
    },

    /// Interactively configure the data server and templates.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Serve { bind } => {
                let config = Config::load()?;
                let bind = bind.unwrap_or_else(|| config.bind.clone());
                crate::serve::serve(handler_from_config(&config)?, &bind).await
            }
            Command::Handle { file } => {
                let body = match file {
                    Some(path) => fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read request file: {}", path.display()))?,
                    None => io::read_to_string(io::stdin()).context("Failed to read request from stdin")?,
                };
                let handler = handler_from_config(&Config::load()?)?;
                let response = handler.handle_json(&body).await;
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(())
            }
            Command::Ask {
                icao,
                airport,
                intent,
            } => {
                let handler = handler_from_config(&Config::load()?)?;
                let icao = icao.trim().to_uppercase();
                let answer = handler
                    .answer(&icao, airport.as_deref(), Some(intent.as_str()))
                    .await;
                println!("{}", answer.speech);
                if answer.text != answer.speech {
                    println!("{}", answer.text);
                }
                Ok(())
            }
        }
    }
}

fn handler_from_config(config: &Config) -> anyhow::Result<WebhookHandler> {
    Ok(WebhookHandler::new(
        provider_from_config(config)?,
        config.template_store(),
    ))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.endpoint = Text::new("METAR data server endpoint:")
        .with_default(&config.endpoint)
        .prompt()?;

    config.hours_before_now = CustomType::<u32>::new("Hours before now to search:")
        .with_default(config.hours_before_now)
        .with_error_message("Please enter a whole number of hours")
        .prompt()?;

    let timeout = Text::new("HTTP timeout in seconds (blank for none):")
        .with_default(&config.timeout_secs.map(|s| s.to_string()).unwrap_or_default())
        .prompt()?;
    config.timeout_secs = match timeout.trim() {
        "" => None,
        secs => Some(secs.parse().context("Timeout must be a whole number of seconds")?),
    };

    let templates = Text::new("Response template file (blank for built-in):")
        .with_default(
            &config
                .templates_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        )
        .prompt()?;
    config.templates_path = match templates.trim() {
        "" => None,
        path => Some(PathBuf::from(path)),
    };

    config.bind = Text::new("Webhook listen address:")
        .with_default(&config.bind)
        .prompt()?;

    config.validate()?;
    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
