//! Command line interface

use std::path::PathBuf;

use bcon_infrastructure::config::ConfigKind;
use clap::{Parser, Subcommand, ValueEnum};

/// Command line interface for the backup console
#[derive(Parser, Debug)]
#[command(name = "bcon")]
#[command(about = "Backup console - ACL-filtered views over burp backup agents")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// User to authenticate as (ignored when login is disabled)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Password of `--user`
    #[arg(short, long)]
    pub password: Option<String>,

    /// Restrict the command to one agent
    #[arg(short, long, global = true)]
    pub agent: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Console commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clients visible to the caller
    Clients,
    /// Clients with their status and statistics
    Stats,
    /// Backup counts and sizes of the visible clients
    Report,
    /// Clients with a backup in progress
    Running {
        /// Ask about this client only
        #[arg(long)]
        client: Option<String>,
    },
    /// Whether any visible backup is in progress
    BackupRunning,
    /// Resolved plugins and every registered provider
    Plugins,
    /// Read one configuration option
    Config {
        /// Section name
        section: String,
        /// Option name
        key: String,
        /// Type to read the option as
        #[arg(long, value_enum, default_value_t = KindArg::String)]
        kind: KindArg,
    },
    /// Server settings, administrators only
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// Administrative commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    /// Show the server configuration
    Server {
        /// Included configuration file
        #[arg(long)]
        conf: Option<String>,
    },
    /// Show one client's configuration
    Client {
        /// Client name
        name: String,
        /// Included configuration file
        #[arg(long)]
        conf: Option<String>,
    },
    /// Clients declared on the server
    Clients,
    /// Server capabilities
    Options,
    /// Declare a new client
    Create {
        /// Client name
        name: String,
    },
    /// Remove a client
    Delete {
        /// Client name
        name: String,
        /// Revoke its certificate
        #[arg(long)]
        revoke: bool,
        /// Delete its certificate
        #[arg(long)]
        delcert: bool,
    },
    /// Expand a glob path on the server
    Expand {
        /// Path or glob
        path: String,
        /// Restore source
        #[arg(long)]
        source: Option<String>,
        /// Client the path belongs to
        #[arg(long)]
        client: Option<String>,
    },
}

/// `--kind` values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    /// Plain string
    String,
    /// Integer
    Integer,
    /// Boolean
    Boolean,
    /// Comma-separated list
    List,
    /// Lower-cased comma-separated list
    LowerList,
}

impl From<KindArg> for ConfigKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::String => Self::String,
            KindArg::Integer => Self::Integer,
            KindArg::Boolean => Self::Boolean,
            KindArg::List => Self::List,
            KindArg::LowerList => Self::StringLowerList,
        }
    }
}

impl Command {
    /// Whether the command runs on behalf of a principal
    pub fn needs_principal(&self) -> bool {
        !matches!(self, Self::Plugins | Self::Config { .. })
    }
}
