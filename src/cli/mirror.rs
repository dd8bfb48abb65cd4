//! Mirror and list command implementations

use crate::config::{
    DEFAULT_FAILED_DOWNLOADS_LOG, DEFAULT_FAILED_FOLDERS_LOG, DEFAULT_WORKER_CAPACITY,
    MAX_WORKER_CAPACITY,
};
use crate::mirror::{FailureLog, JobScheduler, MirrorDriver};
use crate::remote::drive::DriveClient;
use crate::remote::{EntryKind, RemoteStore};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::CliError;

/// Parse and validate the worker capacity flag.
fn parse_workers(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("workers must be at least 1".to_string());
    }
    if value > MAX_WORKER_CAPACITY {
        return Err(format!(
            "workers {value} exceeds maximum of {MAX_WORKER_CAPACITY}"
        ));
    }
    Ok(value)
}

/// Mirror a Google Drive folder tree to the local filesystem.
#[derive(Debug, Parser)]
#[command(name = "drive-mirror", version, about)]
pub struct Cli {
    /// OAuth access token for the Drive API.
    ///
    /// Obtaining and refreshing the token is external to this tool; pass a
    /// ready-to-use bearer token here or via the environment.
    #[arg(long, global = true, env = "DRIVE_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    fn drive_client(&self) -> Result<DriveClient, CliError> {
        let token = self.access_token.as_deref().ok_or_else(|| {
            CliError::InvalidArgument(
                "no access token: pass --access-token or set DRIVE_ACCESS_TOKEN".to_string(),
            )
        })?;
        Ok(DriveClient::new(token))
    }
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mirror a remote folder tree into a local directory
    Mirror(MirrorArgs),
    /// List the immediate children of a remote folder
    List(ListArgs),
}

/// Arguments for the `mirror` command
#[derive(Debug, Args)]
pub struct MirrorArgs {
    /// Remote id of the folder to mirror ("root" for the whole drive)
    #[arg(long, default_value = "root")]
    pub folder_id: String,

    /// Local destination root directory
    #[arg(long, default_value = "./drive")]
    pub dest: PathBuf,

    /// Number of concurrent download workers
    #[arg(long, default_value_t = DEFAULT_WORKER_CAPACITY, value_parser = parse_workers)]
    pub workers: usize,

    /// Where to append records of folders whose listing failed
    #[arg(long, default_value = DEFAULT_FAILED_FOLDERS_LOG)]
    pub failed_folders_log: PathBuf,

    /// Where to append records of files whose download failed
    #[arg(long, default_value = DEFAULT_FAILED_DOWNLOADS_LOG)]
    pub failed_downloads_log: PathBuf,
}

impl MirrorArgs {
    /// Run the mirror: traverse the tree, drain the worker pool, report.
    ///
    /// Individual item failures are recorded and do not fail the command;
    /// only fatal errors (unreachable root, broken worker pool) do.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let store: Arc<dyn RemoteStore> = Arc::new(cli.drive_client()?);
        let failures = Arc::new(FailureLog::open(
            &self.failed_folders_log,
            &self.failed_downloads_log,
        )?);

        let driver = MirrorDriver::new(store, failures);
        let stats = driver.stats();
        let mut scheduler = JobScheduler::new(self.workers);

        driver
            .mirror_tree(&mut scheduler, &self.folder_id, &self.dest)
            .await?;

        info!("Traversal complete, waiting for outstanding downloads");
        scheduler.wait_idle().await?;

        let (downloaded, skipped, files_failed, folders_failed) = stats.snapshot();
        info!(
            downloaded,
            skipped, files_failed, folders_failed, "Mirror complete"
        );
        if files_failed > 0 || folders_failed > 0 {
            warn!(
                failed_folders_log = %self.failed_folders_log.display(),
                failed_downloads_log = %self.failed_downloads_log.display(),
                "Some items failed; see the failure logs"
            );
        }
        Ok(())
    }
}

/// Arguments for the `list` command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Remote id of the folder to list
    #[arg(long, default_value = "root")]
    pub folder_id: String,
}

impl ListArgs {
    /// Print one folder's immediate children across all listing pages.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let store = cli.drive_client()?;
        let mut page_token: Option<String> = None;

        loop {
            let page = store
                .list_children(&self.folder_id, page_token.as_deref())
                .await?;
            for entry in &page.entries {
                match &entry.kind {
                    EntryKind::Folder => println!("{}  [folder]  {}", entry.id, entry.name),
                    EntryKind::File { mime_type } => {
                        println!("{}  [{}]  {}", entry.id, mime_type, entry.name)
                    }
                }
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(())
    }
}
