use rusqlite::Connection;

use crate::error::Result;
use crate::mapper::MappedRow;

/// Check whether an equal line was already imported and confirmed/posted for
/// this company. Exact equality across the mapped fields only; lines that
/// differ in an unmapped field are not treated as duplicates.
pub fn is_repeated(conn: &Connection, company: &str, row: &MappedRow) -> Result<bool> {
    let mut sql = String::from(
        "SELECT 1 FROM statement_lines \
         WHERE company = ?1 AND state IN ('confirmed', 'posted')",
    );
    let mut params: Vec<&dyn rusqlite::ToSql> = vec![&company];
    for (index, (field, value)) in row.values.iter().enumerate() {
        sql.push_str(&format!(" AND {} = ?{}", field.key(), index + 2));
        params.push(value);
    }
    let mut stmt = conn.prepare(&sql)?;
    Ok(stmt.exists(params.as_slice())?)
}
