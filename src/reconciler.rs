use rusqlite::Connection;

use crate::error::Result;

pub struct ReconcileResult {
    pub is_reconciled: bool,
    pub end_balance: f64,
    pub calculated_balance: f64,
    pub discrepancy: f64,
}

/// Compare a statement's declared ending balance against the sum of its line
/// amounts and record the outcome. Statements without a declared balance are
/// skipped.
pub fn search_reconcile(conn: &Connection, statement_id: i64) -> Result<Option<ReconcileResult>> {
    let end_balance: Option<f64> = conn.query_row(
        "SELECT end_balance FROM statements WHERE id = ?1",
        [statement_id],
        |row| row.get(0),
    )?;
    let Some(end_balance) = end_balance else {
        return Ok(None);
    };

    let calculated: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM statement_lines WHERE statement_id = ?1",
        [statement_id],
        |row| row.get(0),
    )?;

    let discrepancy = (calculated - end_balance).abs();
    let is_reconciled = discrepancy < 0.01;

    conn.execute(
        "INSERT INTO reconciliations (statement_id, end_balance, calculated_balance, is_reconciled) \
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![statement_id, end_balance, calculated, is_reconciled as i32],
    )?;

    Ok(Some(ReconcileResult {
        is_reconciled,
        end_balance,
        calculated_balance: calculated,
        discrepancy: (discrepancy * 100.0).round() / 100.0,
    }))
}
