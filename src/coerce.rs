use chrono::NaiveDate;
use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::ToSql;

use crate::error::{ImportError, Result};
use crate::profile::{ColumnSpec, TargetField};

/// A coerced cell value, typed per target field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Date(NaiveDate),
    Amount(f64),
    Text(String),
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Date(date) => {
                ToSqlOutput::Owned(Value::Text(date.format("%Y-%m-%d").to_string()))
            }
            FieldValue::Amount(amount) => ToSqlOutput::Owned(Value::Real(*amount)),
            FieldValue::Text(text) => ToSqlOutput::Borrowed(text.as_str().into()),
        })
    }
}

/// Formats tried in order when a date column has no explicit format.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d.%m.%Y"];

pub fn parse_date(raw: &str, format: Option<&str>) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Some(format) = format {
        return NaiveDate::parse_from_str(raw, format).map_err(|_| ImportError::CsvFormat);
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    Err(ImportError::CsvFormat)
}

/// Accepts thousands separators, currency symbols, surrounding quotes, and
/// accounting parentheses for negatives.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let cleaned = raw.replace(',', "").replace('"', "").replace('$', "");
    let cleaned = cleaned.trim();
    if let Some(inner) = cleaned.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        let value: f64 = inner.trim().parse().map_err(|_| ImportError::CsvFormat)?;
        return Ok(-value);
    }
    cleaned.parse().map_err(|_| ImportError::CsvFormat)
}

/// Reduce one or more raw cells to a single typed value.
///
/// Text fields join their cells with a comma. Dates take the first non-empty
/// cell. Amounts parse and sum every non-empty cell, so a split debit/credit
/// column pair reduces to the populated side.
pub fn coerce(spec: &ColumnSpec, cells: &[&str]) -> Result<FieldValue> {
    match spec.field {
        TargetField::Date => {
            let cell = cells
                .iter()
                .map(|c| c.trim())
                .find(|c| !c.is_empty())
                .ok_or(ImportError::CsvFormat)?;
            Ok(FieldValue::Date(parse_date(cell, spec.date_format.as_deref())?))
        }
        TargetField::Amount => {
            let mut total = 0.0;
            let mut any = false;
            for cell in cells {
                if cell.trim().is_empty() {
                    continue;
                }
                total += parse_amount(cell)?;
                any = true;
            }
            if !any {
                return Err(ImportError::CsvFormat);
            }
            Ok(FieldValue::Amount(total))
        }
        TargetField::Description | TargetField::Reference | TargetField::Notes => {
            Ok(FieldValue::Text(cells.join(",").trim().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(field: TargetField) -> ColumnSpec {
        ColumnSpec {
            columns: vec![0],
            field,
            date_format: None,
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("\"500.00\"").unwrap(), 500.0);
        assert_eq!(parse_amount("  -42.50  ").unwrap(), -42.5);
        assert_eq!(parse_amount("-4.50").unwrap(), -4.5);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_amount_parenthesized_negatives() {
        assert_eq!(parse_amount("(500.00)").unwrap(), -500.0);
        assert_eq!(parse_amount("(1,234.56)").unwrap(), -1234.56);
    }

    #[test]
    fn test_parse_amount_currency_symbol() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("-$50.00").unwrap(), -50.0);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("not_a_number").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_parse_date_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_date("2024-01-05", None).unwrap(), expected);
        assert_eq!(parse_date("05/01/2024", None).unwrap(), expected);
        assert_eq!(parse_date("05.01.2024", None).unwrap(), expected);
        assert!(parse_date("not a date", None).is_err());
    }

    #[test]
    fn test_parse_date_explicit_format() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_date("01/05/2024", Some("%m/%d/%Y")).unwrap(), expected);
        assert!(parse_date("2024-01-05", Some("%m/%d/%Y")).is_err());
    }

    #[test]
    fn test_coerce_text_joins_cells() {
        let value = coerce(&spec(TargetField::Description), &["Coffee shop"]).unwrap();
        assert_eq!(value, FieldValue::Text("Coffee shop".into()));
        let value = coerce(&spec(TargetField::Description), &["ACME", "invoice 42"]).unwrap();
        assert_eq!(value, FieldValue::Text("ACME,invoice 42".into()));
    }

    #[test]
    fn test_coerce_amount_sums_nonempty_cells() {
        let value = coerce(&spec(TargetField::Amount), &["-4.50"]).unwrap();
        assert_eq!(value, FieldValue::Amount(-4.5));
        // Debit/credit pair: only one side populated.
        let value = coerce(&spec(TargetField::Amount), &["", "120.00"]).unwrap();
        assert_eq!(value, FieldValue::Amount(120.0));
        let value = coerce(&spec(TargetField::Amount), &["-30.00", "10.00"]).unwrap();
        assert_eq!(value, FieldValue::Amount(-20.0));
    }

    #[test]
    fn test_coerce_amount_requires_a_value() {
        assert!(coerce(&spec(TargetField::Amount), &["", ""]).is_err());
    }

    #[test]
    fn test_coerce_date_takes_first_nonempty() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let value = coerce(&spec(TargetField::Date), &["", "2024-01-05"]).unwrap();
        assert_eq!(value, FieldValue::Date(expected));
        assert!(coerce(&spec(TargetField::Date), &[""]).is_err());
    }

    #[test]
    fn test_coerce_date_honors_column_format() {
        let mut date_spec = spec(TargetField::Date);
        date_spec.date_format = Some("%m/%d/%Y".into());
        let value = coerce(&date_spec, &["01/05/2024"]).unwrap();
        assert_eq!(value, FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()));
    }
}
