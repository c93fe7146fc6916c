use clap::Subcommand;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health status from the /health endpoint")]
    Ping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
    Down,
}

pub async fn ping_server(server_url: &Url) -> ServerStatus {
    let client = reqwest::Client::new();
    let Ok(url) = server_url.join("/health") else {
        return ServerStatus::Down;
    };

    match client.get(url).timeout(std::time::Duration::from_secs(5)).send().await {
        Ok(response) if response.status().is_success() => ServerStatus::Up,
        _ => ServerStatus::Down,
    }
}

pub async fn handle(cmd: ServerCommands, server_url: &Url, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Ping => match ping_server(server_url).await {
            ServerStatus::Up => output_success(
                &output_format,
                &format!("{} is up", server_url),
                Some(json!({ "status": ServerStatus::Up })),
            ),
            ServerStatus::Down => {
                output_error(&output_format, &format!("{} is down", server_url), Some("SERVER_DOWN"))?;
                anyhow::bail!("server unreachable")
            }
        },
    }
}
