use rusqlite::Connection;

use crate::error::{ImportError, Result};

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
}

impl Encoding {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "utf-8" => Some(Self::Utf8),
            "latin-1" => Some(Self::Latin1),
            _ => None,
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            // Latin-1 maps bytes 1:1 onto the first 256 code points.
            Self::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Self::Utf8 => {
                String::from_utf8(bytes.to_vec()).map_err(|_| ImportError::GeneralFailure)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Target fields — closed set instead of schema-resolved field names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetField {
    Date,
    Description,
    Amount,
    Reference,
    Notes,
}

impl TargetField {
    /// Fields every profile must map before it can be saved.
    pub const REQUIRED: &'static [TargetField] =
        &[TargetField::Date, TargetField::Description, TargetField::Amount];

    /// Storage key, also the statement_lines column name.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Reference => "reference",
            Self::Notes => "notes",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "date" => Some(Self::Date),
            "description" => Some(Self::Description),
            "amount" => Some(Self::Amount),
            "reference" => Some(Self::Reference),
            "notes" => Some(Self::Notes),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column specifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// Zero-based source column indices, in configured order.
    pub columns: Vec<usize>,
    pub field: TargetField,
    /// Explicit chrono format for date columns, e.g. %d/%m/%Y.
    pub date_format: Option<String>,
}

/// Parse a comma-separated column index list like "0" or "2,3".
pub fn parse_column_list(raw: &str) -> Result<Vec<usize>> {
    let mut columns = Vec::new();
    for part in raw.split(',') {
        let index = part
            .trim()
            .parse::<usize>()
            .map_err(|_| ImportError::InvalidMapping(format!("bad column index: {part}")))?;
        columns.push(index);
    }
    Ok(columns)
}

fn column_list_key(columns: &[usize]) -> String {
    columns
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Mapping profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MappingProfile {
    pub id: i64,
    pub name: String,
    pub encoding: Encoding,
    pub columns: Vec<ColumnSpec>,
}

impl MappingProfile {
    /// The standing invariant: every required field must be mapped.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<String> = TargetField::REQUIRED
            .iter()
            .filter(|field| !self.columns.iter().any(|spec| spec.field == **field))
            .map(|field| field.key().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ImportError::RequiredFieldsMissing(missing))
        }
    }
}

pub fn create(
    conn: &Connection,
    name: &str,
    encoding: Encoding,
    columns: Vec<ColumnSpec>,
) -> Result<MappingProfile> {
    let mut profile = MappingProfile {
        id: 0,
        name: name.to_string(),
        encoding,
        columns,
    };
    profile.validate()?;

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO profiles (name, character_encoding) VALUES (?1, ?2)",
        rusqlite::params![name, encoding.key()],
    )?;
    profile.id = tx.last_insert_rowid();
    insert_columns(&tx, profile.id, &profile.columns)?;
    tx.commit()?;
    Ok(profile)
}

/// Replace a profile's column mappings atomically, re-validating first.
pub fn remap(conn: &Connection, name: &str, columns: Vec<ColumnSpec>) -> Result<MappingProfile> {
    let mut profile = load(conn, name)?;
    profile.columns = columns;
    profile.validate()?;

    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM profile_columns WHERE profile_id = ?1", [profile.id])?;
    insert_columns(&tx, profile.id, &profile.columns)?;
    tx.commit()?;
    Ok(profile)
}

fn insert_columns(conn: &Connection, profile_id: i64, columns: &[ColumnSpec]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO profile_columns (profile_id, position, source_columns, target_field, date_format) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (position, spec) in columns.iter().enumerate() {
        stmt.execute(rusqlite::params![
            profile_id,
            position as i64,
            column_list_key(&spec.columns),
            spec.field.key(),
            spec.date_format,
        ])?;
    }
    Ok(())
}

pub fn load(conn: &Connection, name: &str) -> Result<MappingProfile> {
    let (id, encoding_key): (i64, String) = conn
        .query_row(
            "SELECT id, character_encoding FROM profiles WHERE name = ?1",
            [name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|_| ImportError::UnknownProfile(name.to_string()))?;

    let encoding = Encoding::from_key(&encoding_key)
        .ok_or_else(|| ImportError::InvalidMapping(format!("bad encoding: {encoding_key}")))?;

    let mut stmt = conn.prepare(
        "SELECT source_columns, target_field, date_format FROM profile_columns \
         WHERE profile_id = ?1 ORDER BY position",
    )?;
    let raw: Vec<(String, String, Option<String>)> = stmt
        .query_map([id], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut columns = Vec::with_capacity(raw.len());
    for (source_columns, target_field, date_format) in raw {
        let field = TargetField::from_key(&target_field)
            .ok_or_else(|| ImportError::InvalidMapping(format!("bad field: {target_field}")))?;
        columns.push(ColumnSpec {
            columns: parse_column_list(&source_columns)?,
            field,
            date_format,
        });
    }

    Ok(MappingProfile {
        id,
        name: name.to_string(),
        encoding,
        columns,
    })
}

/// When exactly one profile exists it is the implicit default.
pub fn load_default(conn: &Connection) -> Result<Option<MappingProfile>> {
    let names: Vec<String> = conn
        .prepare("SELECT name FROM profiles")?
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match names.as_slice() {
        [only] => Ok(Some(load(conn, only)?)),
        _ => Ok(None),
    }
}
