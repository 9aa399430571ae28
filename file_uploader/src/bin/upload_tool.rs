use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use file_uploader::logging::{init_logging, LoggingConfig};
use file_uploader::{render_status, UploadSession};
use progress_tracking::{TrackerStatus, TrackingObserver, UploadProgressTracker};
use upload_client::{FilePayload, MemoryClient, RemoteClient, UploadClient};
use upload_config::UploaderConfig;
use upload_types::{FileId, FolderId};

const VERSION: &str = concat!("upload_tool", "/", env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[clap(version, about = "Upload files and follow their server-side processing")]
struct UploadCommand {
    #[clap(flatten)]
    overrides: CliOverrides,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CliOverrides {
    /// Server base URL. Defaults to env:UPLOADER_CLIENT_ENDPOINT.
    #[clap(long)]
    endpoint: Option<String>,
    /// API key sent as a bearer token. Defaults to env:UPLOADER_CLIENT_API_KEY.
    #[clap(long)]
    api_key: Option<String>,
    /// Seconds between progress queries, at least 1. Defaults to env:UPLOADER_TRACKING_POLL_INTERVAL.
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval: Option<u64>,
    /// Use an in-process simulated server instead of the network.
    #[clap(long)]
    simulate: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Uploads files in one request, then follows their processing until they are ready.
    Upload(UploadArgs),
    /// Follows the processing of files that were already uploaded.
    Track(TrackArgs),
}

#[derive(Args)]
struct UploadArgs {
    /// Files to upload.
    #[clap(required = true)]
    files: Vec<PathBuf>,
    /// Destination folder id.
    #[clap(long)]
    folder_id: Option<i64>,
    /// Print the assigned ids and exit without tracking.
    #[clap(long)]
    no_wait: bool,
}

#[derive(Args)]
struct TrackArgs {
    /// Ids of the files to follow.
    #[clap(required = true)]
    file_ids: Vec<i64>,
}

/// Prints the rendered status after every progress update.
#[derive(Debug)]
struct ConsoleObserver;

#[async_trait]
impl TrackingObserver for ConsoleObserver {
    async fn on_snapshot(&self, status: &TrackerStatus) {
        println!("{}\n", render_status(status, Utc::now()));
    }
}

impl UploadCommand {
    fn config(&self) -> UploaderConfig {
        let mut config = UploaderConfig::new();
        if let Some(endpoint) = &self.overrides.endpoint {
            config.client.endpoint = endpoint.clone();
        }
        if let Some(api_key) = &self.overrides.api_key {
            config.client.api_key = Some(api_key.clone());
        }
        if let Some(secs) = self.overrides.poll_interval {
            config.tracking.poll_interval = Duration::from_secs(secs);
        }
        config
    }

    async fn run(self) -> Result<()> {
        let config = self.config();
        init_logging(LoggingConfig::new(&config.log, VERSION));

        if self.overrides.simulate {
            let client = Arc::new(MemoryClient::default().with_ocr(3, 2.));
            self.command.run(client, &config).await
        } else {
            let client = Arc::new(RemoteClient::new(&config.client)?);
            self.command.run(client, &config).await
        }
    }
}

impl Command {
    async fn run<C: UploadClient + 'static>(self, client: Arc<C>, config: &UploaderConfig) -> Result<()> {
        let status = match self {
            Command::Upload(args) => {
                let mut files = Vec::with_capacity(args.files.len());
                for path in &args.files {
                    files.push(FilePayload::from_path(path).await?);
                }

                let mut session = UploadSession::with_observer(client, config, Arc::new(ConsoleObserver));
                let uploaded = session.upload(files, args.folder_id.map(FolderId)).await?;
                for file in &uploaded {
                    println!("{}\t{}", file.id, file.name.as_deref().unwrap_or_default());
                }
                if args.no_wait {
                    return Ok(());
                }
                session.wait().await
            },
            Command::Track(args) => {
                let tracker =
                    UploadProgressTracker::from_config(client, &config.tracking).with_observer(Arc::new(ConsoleObserver));
                tracker.start_tracking(args.file_ids.into_iter().map(FileId)).await;
                tracker.wait().await
            },
        };

        if let Some(error) = status.error {
            bail!(error);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = UploadCommand::parse();
    cli.run().await
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        UploadCommand::command().debug_assert();
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let parsed = UploadCommand::try_parse_from(["upload_tool", "--poll-interval", "0", "track", "1"]);
        assert!(parsed.is_err());

        let cli = UploadCommand::try_parse_from(["upload_tool", "--poll-interval", "2", "track", "1"]).unwrap();
        assert_eq!(cli.config().tracking.poll_interval, Duration::from_secs(2));
    }
}
