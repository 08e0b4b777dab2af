use rusqlite::Connection;

use crate::dedup::is_repeated;
use crate::error::{ImportError, Result};
use crate::mapper::{map_row, MappedRow};
use crate::profile::{Encoding, MappingProfile};
use crate::reconciler::{search_reconcile, ReconcileResult};
use crate::store;

/// One import invocation. Flag defaults mirror the import wizard: header,
/// confirm, and attach on; skip_repeated off; encoding from the profile.
pub struct ImportRequest {
    pub statement: String,
    pub data: Vec<u8>,
    pub header: bool,
    pub confirm: bool,
    pub attach: bool,
    pub skip_repeated: bool,
    pub encoding: Option<Encoding>,
}

pub struct ImportOutcome {
    pub created: usize,
    pub skipped: usize,
    pub confirmed: bool,
    pub reconciliation: Option<ReconcileResult>,
}

/// Run one import to completion: precondition checks, decode, parse, map,
/// dedup, then commit the whole batch atomically. Confirm and attach run
/// only after the batch is committed.
pub fn run_import(
    conn: &Connection,
    profile: &MappingProfile,
    request: &ImportRequest,
) -> Result<ImportOutcome> {
    let statement = store::get_statement(conn, &request.statement)?;
    if store::line_count(conn, statement.id)? > 0 {
        return Err(ImportError::StatementAlreadyHasLines(statement.name));
    }
    if statement.state != "draft" {
        return Err(ImportError::StatementNotDraft(statement.name));
    }

    let encoding = request.encoding.unwrap_or(profile.encoding);
    let text = encoding.decode(&request.data)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();
    if request.header {
        // Discard unconditionally; a no-op on an empty file.
        records.next();
    }

    let mut batch: Vec<MappedRow> = Vec::new();
    let mut skipped = 0usize;
    for result in records {
        let record = result.map_err(|_| ImportError::GeneralFailure)?;
        let Some(row) = map_row(&record, profile)? else {
            continue;
        };
        if request.skip_repeated && is_repeated(conn, &statement.company, &row)? {
            skipped += 1;
            continue;
        }
        batch.push(row);
    }

    let created = store::create_lines(conn, &statement, &batch)?;

    let mut reconciliation = None;
    if request.confirm {
        store::confirm_statement(conn, statement.id)?;
        reconciliation = search_reconcile(conn, statement.id)?;
    }
    if request.attach {
        store::save_attachment(conn, statement.id, &request.data)?;
    }

    Ok(ImportOutcome {
        created,
        skipped,
        confirmed: request.confirm,
        reconciliation,
    })
}
