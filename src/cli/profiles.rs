use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{ImportError, Result};
use crate::profile::{self, parse_column_list, ColumnSpec, Encoding, TargetField};
use crate::settings::get_data_dir;

/// Parse one --map argument: "<cols>:<field>", e.g. "0:date" or "2,3:amount".
fn parse_map(raw: &str, date_format: Option<&str>) -> Result<ColumnSpec> {
    let (cols, field) = raw
        .rsplit_once(':')
        .ok_or_else(|| ImportError::InvalidMapping(format!("expected <cols>:<field>, got {raw}")))?;
    let field = TargetField::from_key(field.trim())
        .ok_or_else(|| ImportError::InvalidMapping(format!("unknown field: {field}")))?;
    Ok(ColumnSpec {
        columns: parse_column_list(cols)?,
        field,
        date_format: if field == TargetField::Date {
            date_format.map(str::to_string)
        } else {
            None
        },
    })
}

fn parse_maps(maps: &[String], date_format: Option<&str>) -> Result<Vec<ColumnSpec>> {
    maps.iter().map(|raw| parse_map(raw, date_format)).collect()
}

pub fn add(name: &str, maps: &[String], encoding: &str, date_format: Option<&str>) -> Result<()> {
    let encoding = Encoding::from_key(encoding)
        .ok_or_else(|| ImportError::Other(format!("unknown encoding: {encoding}")))?;
    let columns = parse_maps(maps, date_format)?;

    let conn = get_connection(&get_data_dir().join("csvbank.db"))?;
    let profile = profile::create(&conn, name, encoding, columns)?;
    println!("Added profile: {} ({} columns)", profile.name, profile.columns.len());
    Ok(())
}

pub fn remap(name: &str, maps: &[String], date_format: Option<&str>) -> Result<()> {
    let columns = parse_maps(maps, date_format)?;
    let conn = get_connection(&get_data_dir().join("csvbank.db"))?;
    let profile = profile::remap(&conn, name, columns)?;
    println!("Remapped profile: {} ({} columns)", profile.name, profile.columns.len());
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("csvbank.db"))?;
    let mut stmt = conn.prepare(
        "SELECT p.name, p.character_encoding, count(c.id) \
         FROM profiles p LEFT JOIN profile_columns c ON c.profile_id = p.id \
         GROUP BY p.id ORDER BY p.name",
    )?;
    let rows: Vec<(String, String, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Encoding", "Columns"]);
    for (name, encoding, columns) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(encoding), Cell::new(columns)]);
    }
    println!("Profiles\n{table}");
    Ok(())
}

pub fn show(name: &str) -> Result<()> {
    let conn = get_connection(&get_data_dir().join("csvbank.db"))?;
    let profile = profile::load(&conn, name)?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Source columns", "Field", "Date format"]);
    for (position, spec) in profile.columns.iter().enumerate() {
        let columns = spec
            .columns
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        table.add_row(vec![
            Cell::new(position),
            Cell::new(columns),
            Cell::new(spec.field.key()),
            Cell::new(spec.date_format.as_deref().unwrap_or("")),
        ]);
    }
    println!("Profile {} ({})\n{table}", profile.name, profile.encoding.key());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_map() {
        let spec = parse_map("0:date", None).unwrap();
        assert_eq!(spec.columns, vec![0]);
        assert_eq!(spec.field, TargetField::Date);

        let spec = parse_map("2,3:amount", None).unwrap();
        assert_eq!(spec.columns, vec![2, 3]);
        assert_eq!(spec.field, TargetField::Amount);
    }

    #[test]
    fn test_parse_map_date_format_only_applies_to_dates() {
        let spec = parse_map("0:date", Some("%d/%m/%Y")).unwrap();
        assert_eq!(spec.date_format.as_deref(), Some("%d/%m/%Y"));
        let spec = parse_map("1:description", Some("%d/%m/%Y")).unwrap();
        assert!(spec.date_format.is_none());
    }

    #[test]
    fn test_parse_map_rejects_bad_input() {
        assert!(parse_map("0", None).is_err());
        assert!(parse_map("0:balance", None).is_err());
        assert!(parse_map("x:date", None).is_err());
    }
}
