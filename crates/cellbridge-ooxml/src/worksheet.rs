//! Sparse worksheet grid

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use crate::address::CellAddress;
use crate::cell::{Cell, CellKind};
use crate::error::Result;

/// One row of a worksheet, cells ascending by column
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    /// 1-based row number
    pub number: u32,
    pub cells: Vec<&'a Cell>,
}

impl Row<'_> {
    /// Value in the given column, if that cell was set.
    pub fn value_at(&self, column: u32) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.address.column() == column)
            .map(|c| c.value.as_str())
    }
}

/// A named sheet holding cells keyed by address
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    name: String,
    /// Row-major ordering comes from `CellAddress: Ord`
    cells: BTreeMap<CellAddress, Cell>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create or overwrite a text cell.
    pub fn set_cell(&mut self, address: CellAddress, value: impl Into<String>) {
        self.set_cell_with_kind(address, value, CellKind::SharedString);
    }

    /// Create or overwrite a cell with an explicit kind.
    pub fn set_cell_with_kind(
        &mut self,
        address: CellAddress,
        value: impl Into<String>,
        kind: CellKind,
    ) {
        self.cells.insert(address, Cell::new(address, value, kind));
    }

    /// Set a text cell by reference ("B12").
    pub fn set(&mut self, reference: &str, value: impl Into<String>) -> Result<()> {
        let address = CellAddress::parse(reference)?;
        self.set_cell(address, value);
        Ok(())
    }

    pub fn get_cell(&self, address: CellAddress) -> Option<&Cell> {
        self.cells.get(&address)
    }

    /// Look a cell up by reference; malformed references yield `None`.
    pub fn get(&self, reference: &str) -> Option<&Cell> {
        CellAddress::parse(reference)
            .ok()
            .and_then(|address| self.cells.get(&address))
    }

    pub fn remove_cell(&mut self, address: CellAddress) -> Option<Cell> {
        self.cells.remove(&address)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Group cells by row, rows ascending and cells ascending by column.
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows: Vec<Row<'_>> = Vec::new();
        for cell in self.cells.values() {
            let number = cell.address.row();
            match rows.last_mut() {
                Some(row) if row.number == number => row.cells.push(cell),
                _ => rows.push(Row {
                    number,
                    cells: vec![cell],
                }),
            }
        }
        rows
    }

    /// Rows as JSON objects keyed by column letters.
    pub fn to_json(&self) -> JsonValue {
        let rows = self
            .rows()
            .into_iter()
            .map(|row| {
                let object: Map<String, JsonValue> = row
                    .cells
                    .iter()
                    .map(|cell| {
                        (
                            cell.address.column_name(),
                            JsonValue::String(cell.value.clone()),
                        )
                    })
                    .collect();
                JsonValue::Object(object)
            })
            .collect();
        JsonValue::Array(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(r: &str) -> CellAddress {
        CellAddress::parse(r).unwrap()
    }

    #[test]
    fn test_set_and_get() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_cell(addr("A1"), "Title");
        assert_eq!(sheet.get_cell(addr("A1")).unwrap().value, "Title");
        assert!(sheet.get_cell(addr("B1")).is_none());
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set("B2", "first").unwrap();
        sheet.set("b2", "second").unwrap();
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.get("B2").unwrap().value, "second");
    }

    #[test]
    fn test_empty_string_differs_from_absent() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set("A1", "").unwrap();
        assert_eq!(sheet.get("A1").unwrap().value, "");
        assert!(sheet.get("A2").is_none());
    }

    #[test]
    fn test_set_rejects_malformed_reference() {
        let mut sheet = Worksheet::new("Sheet1");
        assert!(sheet.set("12", "x").is_err());
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_rows_grouping_is_sorted_and_sparse() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set("C3", "c3").unwrap();
        sheet.set("A1", "a1").unwrap();
        sheet.set("AA1", "aa1").unwrap();
        sheet.set("B1", "b1").unwrap();
        sheet.set("A3", "a3").unwrap();

        let rows = sheet.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 1);
        let refs: Vec<String> = rows[0].cells.iter().map(|c| c.reference()).collect();
        assert_eq!(refs, vec!["A1", "B1", "AA1"]);
        assert_eq!(rows[1].number, 3);
        assert_eq!(rows[1].value_at(3), Some("c3"));
        assert_eq!(rows[1].value_at(2), None);
    }

    #[test]
    fn test_to_json() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set("A1", "Hello").unwrap();
        sheet.set("B1", "World").unwrap();
        sheet.set("A2", "x").unwrap();
        let json = sheet.to_json();
        assert_eq!(
            json,
            serde_json::json!([{"A": "Hello", "B": "World"}, {"A": "x"}])
        );
    }
}
