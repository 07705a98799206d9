//! Command-line interface for dlsweep.
//!
//! Every subcommand maps onto one tool request, so the CLI and the JSON
//! server share the same dispatcher and produce the same envelopes.

use crate::config::Config;
use crate::engine::{DEFAULT_ARCHIVE_DAYS, DEFAULT_CLEAN_DAYS};
use crate::output::OutputFormatter;
use crate::server;
use crate::tools::{ToolDispatcher, ToolRequest, ToolResponse};
use clap::{ArgAction, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::thread;

#[derive(Debug, Parser)]
#[command(name = "dlsweep", version, about = "Keep a downloads folder tidy")]
pub struct Cli {
    /// Configuration file (defaults to ./.dlsweeprc.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the raw JSON envelope instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Move files into per-category folders
    Organize {
        root: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Find files with identical content, keeping the newest copy
    Duplicates {
        root: Option<PathBuf>,
        #[arg(long)]
        delete: bool,
    },
    /// List (or delete) files older than a number of days
    Clean {
        root: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_CLEAN_DAYS)]
        days: u64,
        #[arg(long)]
        delete: bool,
    },
    /// Show totals, a per-category breakdown and the largest files
    Stats { root: Option<PathBuf> },
    /// Move files into YYYY/MM-Month folders by modification time
    ByDate {
        root: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Bundle old files into a ZIP archive and remove the originals
    Archive {
        root: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_ARCHIVE_DAYS)]
        days: u64,
        /// Archive file name (default archive_YYYY-MM-DD.zip)
        #[arg(long)]
        name: Option<String>,
    },
    /// Expand every ZIP archive into a sibling folder
    Extract {
        root: Option<PathBuf>,
        #[arg(long)]
        delete_after: bool,
    },
    /// Manage the software inventory
    Software {
        #[command(subcommand)]
        command: SoftwareCommand,
    },
    /// Answer newline-delimited JSON requests on stdin
    Serve,
}

#[derive(Debug, Subcommand)]
pub enum SoftwareCommand {
    Install { name: String },
    Uninstall { name: String },
    List,
    CheckUpdates,
    Update { name: String },
    /// Software recommended for a task, e.g. "web development"
    Recommend {
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,
    },
    AutoUpdate {
        name: String,
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
    Info { name: String },
}

impl Command {
    /// The tool request this command stands for; `None` for `serve`.
    pub fn into_request(self) -> Option<ToolRequest> {
        let request = match self {
            Command::Organize { root, dry_run } => ToolRequest::OrganizeByType { root, dry_run },
            Command::Duplicates { root, delete } => ToolRequest::FindDuplicates { root, delete },
            Command::Clean { root, days, delete } => ToolRequest::CleanOldFiles {
                root,
                days_old: days,
                delete,
            },
            Command::Stats { root } => ToolRequest::FolderStats { root },
            Command::ByDate { root, dry_run } => ToolRequest::OrganizeByDate { root, dry_run },
            Command::Archive { root, days, name } => ToolRequest::ArchiveOldFiles {
                root,
                days_old: days,
                archive_name: name,
            },
            Command::Extract { root, delete_after } => {
                ToolRequest::ExtractArchives { root, delete_after }
            }
            Command::Software { command } => command.into_request(),
            Command::Serve => return None,
        };
        Some(request)
    }
}

impl SoftwareCommand {
    fn into_request(self) -> ToolRequest {
        match self {
            SoftwareCommand::Install { name } => ToolRequest::InstallSoftware { name },
            SoftwareCommand::Uninstall { name } => ToolRequest::UninstallSoftware { name },
            SoftwareCommand::List => ToolRequest::ListInstalledSoftware,
            SoftwareCommand::CheckUpdates => ToolRequest::CheckUpdates,
            SoftwareCommand::Update { name } => ToolRequest::UpdateSoftware { name },
            SoftwareCommand::Recommend { task } => ToolRequest::GetRecommendations {
                task: task.join(" "),
            },
            SoftwareCommand::AutoUpdate { name, enabled } => {
                ToolRequest::SetAutoUpdate { name, enabled }
            }
            SoftwareCommand::Info { name } => ToolRequest::GetSoftwareInfo { name },
        }
    }
}

/// Runs the parsed command. Returns whether the request succeeded.
pub fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = Config::load(cli.config.as_deref())?;
    let dispatcher = ToolDispatcher::from_config(&config)?;

    let Some(request) = cli.command.into_request() else {
        server::serve(&dispatcher, io::stdin().lock(), io::stdout())?;
        return Ok(true);
    };

    let tool = request.tool_name();
    let response = run_with_spinner(&dispatcher, request);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        OutputFormatter::render(tool, &response);
    }
    Ok(response.ok)
}

/// Handles `request` on a worker thread while a spinner ticks.
fn run_with_spinner(dispatcher: &ToolDispatcher, request: ToolRequest) -> ToolResponse {
    let spinner = OutputFormatter::spinner(&format!("Running {}", request.tool_name()));

    let response = thread::scope(|s| {
        s.spawn(|| dispatcher.handle(request))
            .join()
            .unwrap_or_else(|_| ToolResponse::failure("Operation panicked"))
    });

    spinner.finish_and_clear();
    response
}
