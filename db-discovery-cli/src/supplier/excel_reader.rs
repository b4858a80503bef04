//! Excel workbooks to datasets
//!
//! Reads the first sheet; its first row is the header.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::csv_reader::{NA_VALUES, header_name};
use crate::dataset::{Column, ColumnKind, Dataset, Value};

/// Kind reported for columns holding nothing but durations
const DURATION_KIND: &str = "duration";

/// Convert an Excel cell to a dataset value
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) if NA_VALUES.contains(&s.trim()) => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => {
            // Whole numbers are integers in the sheet, only stored as floats
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Value::Int(*f as i64)
            } else {
                Value::Float(*f)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => match dt.as_duration() {
            Some(duration) => Value::Text(duration.to_string()),
            None => Value::Null,
        },
        Data::DateTime(dt) => dt.as_datetime().map(Value::Timestamp).unwrap_or(Value::Null),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Value::Timestamp)
            .unwrap_or_else(|| Value::Text(s.clone())),
        Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

fn is_duration(cell: &Data) -> bool {
    match cell {
        Data::DurationIso(_) => true,
        Data::DateTime(dt) => dt.is_duration(),
        _ => false,
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Read the first sheet of an .xlsx workbook
pub fn read_xlsx<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Excel file has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let rows: Vec<&[Data]> = range.rows().collect();
    dataset_from_rows(&rows).with_context(|| format!("Invalid sheet: {}", sheet_name))
}

/// Build a dataset from sheet rows, the first row being the header
pub(crate) fn dataset_from_rows(rows: &[&[Data]]) -> Result<Dataset> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Dataset::default());
    };

    let empty = Data::Empty;
    let mut columns = Vec::with_capacity(header.len());
    for (idx, cell) in header.iter().enumerate() {
        let name = header_name(&cell_to_value(cell).to_text().unwrap_or_default(), idx);
        let cells: Vec<&Data> = body
            .iter()
            .map(|row| row.get(idx).unwrap_or(&empty))
            .collect();
        let values: Vec<Value> = cells.iter().map(|c| cell_to_value(c)).collect();

        let present: Vec<&&Data> = cells.iter().filter(|c| !matches!(c, Data::Empty)).collect();
        let column = if !present.is_empty() && present.iter().all(|c| is_duration(c)) {
            Column::new(name, ColumnKind::Other(DURATION_KIND.to_string()), values)
        } else {
            Column::infer(name, values)
        };
        columns.push(column);
    }

    Dataset::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn build(rows: Vec<Vec<Data>>) -> Dataset {
        let slices: Vec<&[Data]> = rows.iter().map(|r| r.as_slice()).collect();
        dataset_from_rows(&slices).unwrap()
    }

    #[test]
    fn test_cell_to_value() {
        assert_eq!(cell_to_value(&Data::Empty), Value::Null);
        assert_eq!(cell_to_value(&s("N/A")), Value::Null);
        assert_eq!(cell_to_value(&Data::Float(3.0)), Value::Int(3));
        assert_eq!(cell_to_value(&Data::Float(3.25)), Value::Float(3.25));
        assert_eq!(cell_to_value(&Data::Bool(true)), Value::Bool(true));
        assert_eq!(
            cell_to_value(&Data::DateTimeIso("2023-05-04T10:30:00".to_string()))
                .as_timestamp()
                .unwrap()
                .to_string(),
            "2023-05-04 10:30:00"
        );
    }

    #[test]
    fn test_sheet_columns() {
        let ds = build(vec![
            vec![s("Patient ID"), s("BCS"), s("Age"), s("Visit Date"), s("Stay")],
            vec![
                Data::Float(1.0),
                s("Y"),
                Data::Float(54.0),
                Data::DateTimeIso("2023-01-09".to_string()),
                Data::DurationIso("PT36H".to_string()),
            ],
            vec![
                Data::Float(2.0),
                Data::Empty,
                Data::Float(61.5),
                Data::DateTimeIso("2023-02-14".to_string()),
                Data::Empty,
            ],
        ]);

        assert_eq!(ds.shape(), (2, 5));
        let kind = |name: &str| ds.column(name).unwrap().kind().clone();
        assert_eq!(kind("Patient ID"), ColumnKind::Integer);
        assert_eq!(kind("BCS"), ColumnKind::Text);
        assert_eq!(kind("Age"), ColumnKind::Float);
        assert_eq!(kind("Visit Date"), ColumnKind::Timestamp);
        assert_eq!(kind("Stay"), ColumnKind::Other("duration".to_string()));
    }

    #[test]
    fn test_short_rows_padded_with_nulls() {
        let ds = build(vec![vec![s("a"), s("b")], vec![Data::Int(1)]]);
        assert_eq!(ds.row(0).unwrap(), vec![&Value::Int(1), &Value::Null]);
    }

    #[test]
    fn test_empty_sheet() {
        assert!(build(vec![]).is_empty());
    }

    #[test]
    fn test_missing_workbook() {
        assert!(read_xlsx("does/not/exist.xlsx").is_err());
    }
}
