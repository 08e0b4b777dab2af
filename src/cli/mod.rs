pub mod import;
pub mod init;
pub mod profiles;
pub mod statements;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "csvbank", about = "Profile-driven bank statement CSV importer.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up csvbank: choose a data directory and initialize the database.
    Init {
        /// Path for csvbank data (default: ~/Documents/csvbank)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Default company stamped on statements and imported lines
        #[arg(long)]
        company: Option<String>,
    },
    /// Manage CSV mapping profiles.
    Profiles {
        #[command(subcommand)]
        command: ProfilesCommands,
    },
    /// Manage bank statements.
    Statements {
        #[command(subcommand)]
        command: StatementsCommands,
    },
    /// Import a bank statement CSV file through a mapping profile.
    Import {
        /// Path to the CSV file to import
        file: String,
        /// Target statement name (must be a draft with no lines)
        #[arg(long)]
        statement: String,
        /// Profile name (may be omitted when exactly one profile exists)
        #[arg(long)]
        profile: Option<String>,
        /// The file has no header row
        #[arg(long = "no-header")]
        no_header: bool,
        /// Leave the statement in draft state after import
        #[arg(long = "no-confirm")]
        no_confirm: bool,
        /// Do not store the file as an attachment
        #[arg(long = "no-attach")]
        no_attach: bool,
        /// Skip rows equal to already confirmed/posted lines
        #[arg(long = "skip-repeated")]
        skip_repeated: bool,
        /// Override the profile's character encoding (utf-8 or latin-1)
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum ProfilesCommands {
    /// Add a profile with its column mappings.
    Add {
        /// Profile name
        name: String,
        /// Column mapping <cols>:<field>, e.g. 0:date or 2,3:amount (repeatable)
        #[arg(long = "map", required = true)]
        maps: Vec<String>,
        /// Character encoding: utf-8 or latin-1
        #[arg(long, default_value = "utf-8")]
        encoding: String,
        /// chrono format for date columns, e.g. %d/%m/%Y
        #[arg(long = "date-format")]
        date_format: Option<String>,
    },
    /// Replace a profile's column mappings.
    Remap {
        /// Profile name
        name: String,
        /// Column mapping <cols>:<field> (repeatable)
        #[arg(long = "map", required = true)]
        maps: Vec<String>,
        /// chrono format for date columns
        #[arg(long = "date-format")]
        date_format: Option<String>,
    },
    /// List profiles.
    List,
    /// Show a profile's column mappings.
    Show {
        /// Profile name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum StatementsCommands {
    /// Add a draft statement.
    Add {
        /// Statement name
        name: String,
        /// Company (default: from settings)
        #[arg(long)]
        company: Option<String>,
        /// Declared ending balance, checked on confirm
        #[arg(long = "end-balance", allow_hyphen_values = true)]
        end_balance: Option<f64>,
    },
    /// List statements.
    List,
    /// List a statement's lines.
    Show {
        /// Statement name
        name: String,
    },
    /// Confirm a draft statement and run the balance check.
    Confirm {
        /// Statement name
        name: String,
    },
}
