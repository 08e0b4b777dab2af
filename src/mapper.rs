use csv::StringRecord;

use crate::coerce::{coerce, FieldValue};
use crate::error::{ImportError, Result};
use crate::profile::{MappingProfile, TargetField};

/// One mapped CSV row. The (field, value) pairs are kept in profile order;
/// they double as the equality predicate the dedup filter matches on.
#[derive(Debug, Clone)]
pub struct MappedRow {
    pub values: Vec<(TargetField, FieldValue)>,
}

impl MappedRow {
    pub fn get(&self, field: TargetField) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, value)| value)
    }
}

/// Apply every column spec of the profile to one CSV record.
///
/// Returns Ok(None) for empty rows, which contribute neither a line nor an
/// error. A configured column index missing from the record is fatal and
/// stops the whole import.
pub fn map_row(record: &StringRecord, profile: &MappingProfile) -> Result<Option<MappedRow>> {
    if record.iter().all(|cell| cell.trim().is_empty()) {
        return Ok(None);
    }

    let mut values = Vec::with_capacity(profile.columns.len());
    for spec in &profile.columns {
        let mut cells = Vec::with_capacity(spec.columns.len());
        for &index in &spec.columns {
            let cell = record.get(index).ok_or(ImportError::CsvFormat)?;
            cells.push(cell);
        }
        values.push((spec.field, coerce(spec, &cells)?));
    }
    Ok(Some(MappedRow { values }))
}
