use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{ImportError, Result};
use crate::fmt::money;
use crate::models::StatementLine;
use crate::reconciler::search_reconcile;
use crate::settings::{get_data_dir, resolve_company};
use crate::store::{confirm_statement, get_statement};

fn colored_state(state: &str) -> String {
    match state {
        "draft" => state.yellow().to_string(),
        "confirmed" => state.green().to_string(),
        "posted" => state.blue().to_string(),
        _ => state.to_string(),
    }
}

pub fn add(name: &str, company: Option<&str>, end_balance: Option<f64>) -> Result<()> {
    let company = resolve_company(company)?;
    let conn = get_connection(&get_data_dir().join("csvbank.db"))?;
    conn.execute(
        "INSERT INTO statements (name, company, end_balance) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, company, end_balance],
    )?;
    println!("Added statement: {name} ({company})");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("csvbank.db"))?;
    let mut stmt = conn.prepare(
        "SELECT s.name, s.company, s.state, s.end_balance, count(l.id), COALESCE(SUM(l.amount), 0) \
         FROM statements s LEFT JOIN statement_lines l ON l.statement_id = s.id \
         GROUP BY s.id ORDER BY s.id",
    )?;
    let rows: Vec<(String, String, String, Option<f64>, i64, f64)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Company", "State", "Lines", "Total", "End balance"]);
    for (name, company, state, end_balance, lines, total) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(company),
            Cell::new(colored_state(&state)),
            Cell::new(lines),
            Cell::new(money(total)),
            Cell::new(end_balance.map(money).unwrap_or_default()),
        ]);
    }
    println!("Statements\n{table}");
    Ok(())
}

pub fn show(name: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("csvbank.db"))?;
    let statement = get_statement(&conn, name)?;

    let mut stmt = conn.prepare(
        "SELECT id, statement_id, date, description, amount, reference, notes, state \
         FROM statement_lines WHERE statement_id = ?1 ORDER BY id",
    )?;
    let lines: Vec<StatementLine> = stmt
        .query_map([statement.id], |row| {
            Ok(StatementLine {
                id: row.get(0)?,
                statement_id: row.get(1)?,
                date: row.get(2)?,
                description: row.get(3)?,
                amount: row.get(4)?,
                reference: row.get(5)?,
                notes: row.get(6)?,
                state: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Amount", "Reference", "State"]);
    for line in &lines {
        table.add_row(vec![
            Cell::new(&line.date),
            Cell::new(&line.description),
            Cell::new(money(line.amount)),
            Cell::new(line.reference.as_deref().unwrap_or("")),
            Cell::new(colored_state(&line.state)),
        ]);
    }
    println!(
        "Statement {} ({}, {})\n{table}",
        statement.name,
        statement.company,
        colored_state(&statement.state)
    );
    Ok(())
}

pub fn confirm(name: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("csvbank.db"))?;
    let statement = get_statement(&conn, name)?;
    if statement.state != "draft" {
        return Err(ImportError::StatementNotDraft(statement.name));
    }

    confirm_statement(&conn, statement.id)?;
    println!("Confirmed statement: {name}");

    if let Some(result) = search_reconcile(&conn, statement.id)? {
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
