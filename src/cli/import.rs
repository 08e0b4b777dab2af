use std::path::PathBuf;

use colored::Colorize;

use crate::db::get_connection;
use crate::error::{ImportError, Result};
use crate::fmt::money;
use crate::importer::{run_import, ImportRequest};
use crate::profile::{self, Encoding};
use crate::settings::get_data_dir;

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: &str,
    statement: &str,
    profile_name: Option<&str>,
    no_header: bool,
    no_confirm: bool,
    no_attach: bool,
    skip_repeated: bool,
    encoding: Option<&str>,
) -> Result<()> {
    let data = std::fs::read(PathBuf::from(file))?;
    let conn = get_connection(&get_data_dir().join("csvbank.db"))?;

    let profile = match profile_name {
        Some(name) => profile::load(&conn, name)?,
        None => profile::load_default(&conn)?.ok_or_else(|| {
            ImportError::Other("no single default profile; pass --profile".into())
        })?,
    };

    let encoding = match encoding {
        Some(key) => Some(
            Encoding::from_key(key)
                .ok_or_else(|| ImportError::Other(format!("unknown encoding: {key}")))?,
        ),
        None => None,
    };

    let request = ImportRequest {
        statement: statement.to_string(),
        data,
        header: !no_header,
        confirm: !no_confirm,
        attach: !no_attach,
        skip_repeated,
        encoding,
    };
    let outcome = run_import(&conn, &profile, &request)?;

    println!(
        "{} lines created, {} skipped (already imported)",
        outcome.created, outcome.skipped
    );
    if outcome.confirmed {
        println!("Statement {}", "confirmed".green());
    }
    if let Some(result) = outcome.reconciliation {
        if result.is_reconciled {
            println!("{} lines sum to {}", "Reconciled:".green(), money(result.calculated_balance));
        } else {
            println!(
                "{} lines sum to {}, statement declares {} (off by {})",
                "Not reconciled:".red(),
                money(result.calculated_balance),
                money(result.end_balance),
                money(result.discrepancy),
            );
        }
    }
    Ok(())
}
