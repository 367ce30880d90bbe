//! Command-line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ferry", author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Move the items of a folder into another folder in size-bounded batches
    Move(MoveArgs),

    /// List the top-level folders of a mailbox
    #[command(alias = "folder")]
    Folders(FoldersArgs),

    /// Print the effective settings
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Mailbox to move items out of
    #[arg(long, value_name = "MAILBOX")]
    pub source_mailbox: String,

    /// Folder to move items out of, by display or well-known name
    #[arg(long, value_name = "FOLDER")]
    pub source_folder: String,

    /// Mailbox that owns the target folder
    #[arg(long, value_name = "MAILBOX")]
    pub target_mailbox: String,

    #[arg(long, value_name = "FOLDER")]
    pub target_folder: String,

    /// OData filter restricting the items to move
    ///
    /// For example: "receivedDateTime lt 2020-01-01T00:00:00Z"
    #[arg(long, value_name = "FILTER")]
    pub filter: Option<String>,

    /// Close a batch once it holds at least this many bytes
    #[arg(long, value_name = "BYTES")]
    pub batch_size: Option<u64>,

    /// Seconds between polls of the target folder
    #[arg(long, value_name = "SECS")]
    pub wait_time: Option<u64>,

    /// Do not wait for the target folder to drain between batches
    #[arg(long)]
    pub no_check_target_empty: bool,

    /// Start every batch without asking
    #[arg(long)]
    pub no_confirm: bool,

    /// Write an audit record per moved item to this file. The file must not exist.
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Field delimiter of the audit file
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Give up when the target folder has not drained after this many seconds
    #[arg(long, value_name = "SECS")]
    pub quota_timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct FoldersArgs {
    #[arg(long, value_name = "MAILBOX")]
    pub mailbox: String,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write the effective settings to the settings file
    #[arg(long)]
    pub save: bool,
}
