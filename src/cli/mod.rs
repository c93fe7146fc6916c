pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Parser)]
#[command(name = "camctl")]
#[command(about = "camctl - Command-line client for the camera gallery server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Gallery server URL (defaults to CAMGALLERY_SERVER_URL)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Delete photos or timelapses from the gallery")]
    Delete {
        #[command(subcommand)]
        cmd: commands::delete::DeleteCommands,
    },

    #[command(about = "Gallery server checks")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Server URL from the command line, else from configuration
pub fn server_url(cli: &Cli) -> anyhow::Result<Url> {
    let raw = cli
        .server
        .clone()
        .unwrap_or_else(|| crate::config::config().client.server_url.clone());
    Url::parse(&raw).with_context(|| format!("invalid server URL '{}'", raw))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server_url = server_url(&cli)?;

    match cli.command {
        Commands::Delete { cmd } => commands::delete::handle(cmd, &server_url, output_format).await,
        Commands::Server { cmd } => commands::server::handle(cmd, &server_url, output_format).await,
    }
}
