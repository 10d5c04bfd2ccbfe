//! Structured value → workbook

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::address::CellAddress;
use crate::bridge::structured::{Shape, Structured};
use crate::cell::CellKind;
use crate::config::EncoderSettings;
use crate::error::{CellbridgeError, Result};
use crate::value::Value;
use crate::workbook::Workbook;
use crate::worksheet::Worksheet;

/// Header of the single column written for a sequence of scalars
pub const SCALAR_COLUMN: &str = "value";

/// Encodes records into workbooks
#[derive(Debug, Clone, Default)]
pub struct StructuredEncoder {
    settings: EncoderSettings,
}

impl StructuredEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EncoderSettings) -> Self {
        Self { settings }
    }

    /// Encode a record.
    ///
    /// The main sheet comes first and holds every scalar field. Each nested
    /// record or sequence field follows as its own sheet, ordered by field
    /// name.
    pub fn encode<T: Structured + ?Sized>(&self, value: &T) -> Result<Workbook> {
        let Shape::Fields(mut fields) = value.shape() else {
            return Err(CellbridgeError::UnsupportedOperation(
                "top-level value must be a record".to_string(),
            ));
        };
        fields.sort_by(|a, b| a.0.cmp(b.0));

        let mut scalars = Vec::new();
        let mut secondary = Vec::new();
        for (name, field) in fields {
            let shape = field.shape();
            if !matches!(shape, Shape::Scalar(_)) && name == self.settings.main_sheet {
                return Err(CellbridgeError::UnsupportedOperation(format!(
                    "field '{name}' would need a sheet named like the main sheet"
                )));
            }
            match shape {
                Shape::Scalar(v) => scalars.push((name, v)),
                Shape::Fields(nested) => secondary.push(record_sheet(name, nested)?),
                Shape::Elements(items) => secondary.push(sequence_sheet(name, items)?),
            }
        }

        let mut main = Worksheet::new(self.settings.main_sheet.as_str());
        for (index, (name, value)) in scalars.iter().enumerate() {
            let column = column_number(index)?;
            put_header(&mut main, column, name)?;
            put_value(&mut main, column, 2, value)?;
        }

        let mut workbook = Workbook::new();
        workbook.add_sheet(main)?;
        for sheet in secondary {
            workbook.add_sheet(sheet)?;
        }
        debug!(sheets = workbook.sheets().len(), "encoded record");
        Ok(workbook)
    }

    /// Encode any serializable value through its JSON form.
    pub fn encode_serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Workbook> {
        let json = serde_json::to_value(value)
            .map_err(|e| CellbridgeError::UnsupportedOperation(e.to_string()))?;
        self.encode(&json)
    }
}

fn column_number(index: usize) -> Result<u32> {
    u32::try_from(index + 1)
        .map_err(|_| CellbridgeError::UnsupportedOperation(format!("too many columns: {index}")))
}

fn row_number(index: usize) -> Result<u32> {
    u32::try_from(index + 2)
        .map_err(|_| CellbridgeError::UnsupportedOperation(format!("too many rows: {index}")))
}

fn put_header(sheet: &mut Worksheet, column: u32, name: &str) -> Result<()> {
    sheet.set_cell_with_kind(CellAddress::new(column, 1)?, name, CellKind::SharedString);
    Ok(())
}

fn put_value(sheet: &mut Worksheet, column: u32, row: u32, value: &Value) -> Result<()> {
    if let Some(text) = value.to_cell_text() {
        sheet.set_cell_with_kind(CellAddress::new(column, row)?, text, value.cell_kind());
    }
    Ok(())
}

/// Scalar value of a field inside a secondary sheet.
fn leaf_value(sheet: &str, field: &str, value: &dyn Structured) -> Result<Value> {
    match value.shape() {
        Shape::Scalar(v) => Ok(v),
        _ => Err(CellbridgeError::UnsupportedOperation(format!(
            "field '{sheet}.{field}' nests deeper than one level"
        ))),
    }
}

/// A nested record: header row plus one data row.
fn record_sheet(name: &str, mut fields: Vec<(&str, &dyn Structured)>) -> Result<Worksheet> {
    fields.sort_by(|a, b| a.0.cmp(b.0));
    let mut sheet = Worksheet::new(name);
    for (index, (field, value)) in fields.into_iter().enumerate() {
        let column = column_number(index)?;
        put_header(&mut sheet, column, field)?;
        put_value(&mut sheet, column, 2, &leaf_value(name, field, value)?)?;
    }
    Ok(sheet)
}

/// A sequence: records become rows under a shared header, scalars fill a
/// single `value` column.
fn sequence_sheet(name: &str, items: Vec<&dyn Structured>) -> Result<Worksheet> {
    let mut sheet = Worksheet::new(name);
    let Some(first) = items.first() else {
        return Ok(sheet);
    };

    match first.shape() {
        Shape::Fields(fields) => {
            let mut header: Vec<&str> = fields.iter().map(|(field, _)| *field).collect();
            header.sort_unstable();
            let columns: HashMap<String, u32> = header
                .iter()
                .enumerate()
                .map(|(index, field)| Ok((field.to_string(), column_number(index)?)))
                .collect::<Result<_>>()?;
            for (field, column) in &columns {
                put_header(&mut sheet, *column, field)?;
            }

            for (index, item) in items.iter().enumerate() {
                let Shape::Fields(fields) = item.shape() else {
                    return Err(heterogeneous(name, index));
                };
                let mut names: Vec<&str> = fields.iter().map(|(field, _)| *field).collect();
                names.sort_unstable();
                if names != header {
                    return Err(heterogeneous(name, index));
                }
                let row = row_number(index)?;
                for (field, value) in fields {
                    let column = columns[field];
                    put_value(&mut sheet, column, row, &leaf_value(name, field, value)?)?;
                }
            }
        }
        Shape::Scalar(_) => {
            put_header(&mut sheet, 1, SCALAR_COLUMN)?;
            for (index, item) in items.iter().enumerate() {
                let Shape::Scalar(value) = item.shape() else {
                    return Err(heterogeneous(name, index));
                };
                put_value(&mut sheet, 1, row_number(index)?, &value)?;
            }
        }
        Shape::Elements(_) => {
            return Err(CellbridgeError::UnsupportedOperation(format!(
                "sequence '{name}' contains nested sequences"
            )));
        }
    }

    Ok(sheet)
}

fn heterogeneous(name: &str, index: usize) -> CellbridgeError {
    CellbridgeError::UnsupportedOperation(format!(
        "sequence '{name}' is not homogeneous (element {index} differs from the first)"
    ))
}
