use clap::Subcommand;
use futures::future::join_all;
use serde_json::json;
use std::time::Duration;
use url::Url;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::client::{delete_resource, DeleteError, Document, HttpTransport, ResourceKind};

#[derive(Subcommand)]
pub enum DeleteCommands {
    #[command(about = "Delete photos (JPG, DNG and thumbnail)")]
    Photo {
        #[arg(required = true, help = "Photo names")]
        names: Vec<String>,
    },

    #[command(about = "Delete whole timelapses")]
    Timelapse {
        #[arg(required = true, help = "Timelapse start timestamps (YYYY-MM-DD_HH-MM-SS)")]
        names: Vec<String>,
    },
}

fn error_code(error: &DeleteError) -> &'static str {
    match error {
        DeleteError::ServerRejected { .. } => "SERVER_REJECTED",
        DeleteError::TransportFailure(_) => "TRANSPORT_FAILURE",
        DeleteError::MalformedResponse(_) => "MALFORMED_RESPONSE",
    }
}

pub async fn handle(cmd: DeleteCommands, server_url: &Url, output_format: OutputFormat) -> anyhow::Result<()> {
    let (kind, names) = match cmd {
        DeleteCommands::Photo { names } => (ResourceKind::Photo, names),
        DeleteCommands::Timelapse { names } => (ResourceKind::Timelapse, names),
    };

    let timeout = crate::config::config().client.timeout_secs.map(Duration::from_secs);
    let transport = HttpTransport::new(server_url.clone(), timeout)?;
    let view = Document::with_resources(&names);

    // One interaction per resource, all in flight at once
    let outcomes = join_all(
        names
            .iter()
            .map(|name| delete_resource(&transport, &view, kind, name)),
    )
    .await;

    let mut failures = 0;
    for (name, outcome) in names.iter().zip(outcomes) {
        match outcome {
            Ok(true) => output_success(
                &output_format,
                &format!("Deleted {} '{}'", kind, name),
                Some(json!({ "kind": kind, "name": name })),
            )?,
            Ok(false) => {
                failures += 1;
                output_error(
                    &output_format,
                    &format!("Server could not delete {} '{}'", kind, name),
                    Some("DELETE_FAILED"),
                )?;
            }
            Err(e) => {
                failures += 1;
                output_error(&output_format, &format!("{} '{}': {}", kind, name, e), Some(error_code(&e)))?;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} deletions failed", failures, names.len());
    }
    Ok(())
}
