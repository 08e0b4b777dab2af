mod cli;
mod coerce;
mod db;
mod dedup;
mod error;
mod fmt;
mod importer;
mod mapper;
mod models;
mod profile;
mod reconciler;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands, ProfilesCommands, StatementsCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir, company } => cli::init::run(data_dir, company),
        Commands::Profiles { command } => match command {
            ProfilesCommands::Add {
                name,
                maps,
                encoding,
                date_format,
            } => cli::profiles::add(&name, &maps, &encoding, date_format.as_deref()),
            ProfilesCommands::Remap {
                name,
                maps,
                date_format,
            } => cli::profiles::remap(&name, &maps, date_format.as_deref()),
            ProfilesCommands::List => cli::profiles::list(),
            ProfilesCommands::Show { name } => cli::profiles::show(&name),
        },
        Commands::Statements { command } => match command {
            StatementsCommands::Add {
                name,
                company,
                end_balance,
            } => cli::statements::add(&name, company.as_deref(), end_balance),
            StatementsCommands::List => cli::statements::list(),
            StatementsCommands::Show { name } => cli::statements::show(&name),
            StatementsCommands::Confirm { name } => cli::statements::confirm(&name),
        },
        Commands::Import {
            file,
            statement,
            profile,
            no_header,
            no_confirm,
            no_attach,
            skip_repeated,
            encoding,
        } => cli::import::run(
            &file,
            &statement,
            profile.as_deref(),
            no_header,
            no_confirm,
            no_attach,
            skip_repeated,
            encoding.as_deref(),
        ),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
