use chrono::Local;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::error::{ImportError, Result};
use crate::mapper::MappedRow;
use crate::models::Statement;
use crate::profile::TargetField;

fn db_failure(e: rusqlite::Error) -> ImportError {
    ImportError::DatabaseGeneralFailure(e.to_string())
}

pub fn get_statement(conn: &Connection, name: &str) -> Result<Statement> {
    conn.query_row(
        "SELECT id, name, company, state, end_balance FROM statements WHERE name = ?1",
        [name],
        |row| {
            Ok(Statement {
                id: row.get(0)?,
                name: row.get(1)?,
                company: row.get(2)?,
                state: row.get(3)?,
                end_balance: row.get(4)?,
            })
        },
    )
    .map_err(|_| ImportError::UnknownStatement(name.to_string()))
}

pub fn line_count(conn: &Connection, statement_id: i64) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT count(*) FROM statement_lines WHERE statement_id = ?1",
        [statement_id],
        |row| row.get(0),
    )?)
}

/// Persist a whole batch of mapped rows as draft lines in one transaction.
/// Insertion order follows batch order, so lines keep file order.
pub fn create_lines(conn: &Connection, statement: &Statement, batch: &[MappedRow]) -> Result<usize> {
    let tx = conn.unchecked_transaction().map_err(db_failure)?;
    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO statement_lines \
                 (statement_id, company, date, description, amount, reference, notes, state) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'draft')",
            )
            .map_err(db_failure)?;
        for row in batch {
            stmt.execute(rusqlite::params![
                statement.id,
                statement.company,
                row.get(TargetField::Date),
                row.get(TargetField::Description),
                row.get(TargetField::Amount),
                row.get(TargetField::Reference),
                row.get(TargetField::Notes),
            ])
            .map_err(db_failure)?;
        }
    }
    tx.commit().map_err(db_failure)?;
    Ok(batch.len())
}

/// Transition a statement and its draft lines to confirmed.
pub fn confirm_statement(conn: &Connection, statement_id: i64) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE statements SET state = 'confirmed' WHERE id = ?1",
        [statement_id],
    )?;
    tx.execute(
        "UPDATE statement_lines SET state = 'confirmed' WHERE statement_id = ?1 AND state = 'draft'",
        [statement_id],
    )?;
    tx.commit()?;
    Ok(())
}

/// Store the original import file, named with the import timestamp.
pub fn save_attachment(conn: &Connection, statement_id: i64, data: &[u8]) -> Result<()> {
    let name = Local::now().format("%y/%m/%d %H:%M:%S").to_string();
    let mut hasher = Sha256::new();
    hasher.update(data);
    let checksum = hex::encode(hasher.finalize());
    conn.execute(
        "INSERT INTO attachments (statement_id, name, data, checksum) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![statement_id, name, data, checksum],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::FieldValue;
    use crate::db::{get_connection, init_db};
    use chrono::NaiveDate;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn add_statement(conn: &Connection) -> Statement {
        conn.execute(
            "INSERT INTO statements (name, company) VALUES ('January', 'Acme')",
            [],
        )
        .unwrap();
        get_statement(conn, "January").unwrap()
    }

    fn row(date: &str, description: &str, amount: f64) -> MappedRow {
        MappedRow {
            values: vec![
                (
                    TargetField::Date,
                    FieldValue::Date(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
                ),
                (TargetField::Description, FieldValue::Text(description.into())),
                (TargetField::Amount, FieldValue::Amount(amount)),
            ],
        }
    }

    #[test]
    fn test_get_statement_unknown() {
        let (_dir, conn) = test_db();
        assert!(matches!(
            get_statement(&conn, "nope"),
            Err(ImportError::UnknownStatement(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_create_lines_preserves_order() {
        let (_dir, conn) = test_db();
        let statement = add_statement(&conn);
        let batch = vec![
            row("2024-01-05", "first", -1.0),
            row("2024-01-04", "second", -2.0),
            row("2024-01-06", "third", -3.0),
        ];
        assert_eq!(create_lines(&conn, &statement, &batch).unwrap(), 3);

        let descriptions: Vec<String> = conn
            .prepare("SELECT description FROM statement_lines ORDER BY id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(descriptions, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_create_lines_stamps_draft_and_company() {
        let (_dir, conn) = test_db();
        let statement = add_statement(&conn);
        create_lines(&conn, &statement, &[row("2024-01-05", "Coffee shop", -4.5)]).unwrap();
        let (company, state): (String, String) = conn
            .query_row("SELECT company, state FROM statement_lines", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(company, "Acme");
        assert_eq!(state, "draft");
    }

    #[test]
    fn test_create_lines_missing_required_value_fails_whole_batch() {
        let (_dir, conn) = test_db();
        let statement = add_statement(&conn);
        let bad = MappedRow {
            values: vec![(TargetField::Description, FieldValue::Text("no date".into()))],
        };
        let result = create_lines(
            &conn,
            &statement,
            &[row("2024-01-05", "good", -1.0), bad],
        );
        assert!(matches!(result, Err(ImportError::DatabaseGeneralFailure(_))));
        assert_eq!(line_count(&conn, statement.id).unwrap(), 0);
    }

    #[test]
    fn test_confirm_statement_transitions_lines() {
        let (_dir, conn) = test_db();
        let statement = add_statement(&conn);
        create_lines(&conn, &statement, &[row("2024-01-05", "Coffee shop", -4.5)]).unwrap();
        confirm_statement(&conn, statement.id).unwrap();

        let state: String = conn
            .query_row("SELECT state FROM statements WHERE id = ?1", [statement.id], |r| r.get(0))
            .unwrap();
        assert_eq!(state, "confirmed");
        let line_state: String = conn
            .query_row("SELECT state FROM statement_lines", [], |r| r.get(0))
            .unwrap();
        assert_eq!(line_state, "confirmed");
    }

    #[test]
    fn test_save_attachment_checksums_content() {
        let (_dir, conn) = test_db();
        let statement = add_statement(&conn);
        let data = b"date,description,amount\n";
        save_attachment(&conn, statement.id, data).unwrap();

        let (stored, checksum): (Vec<u8>, String) = conn
            .query_row("SELECT data, checksum FROM attachments", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(stored, data);

        let mut hasher = Sha256::new();
        hasher.update(data);
        assert_eq!(checksum, hex::encode(hasher.finalize()));
    }
}
