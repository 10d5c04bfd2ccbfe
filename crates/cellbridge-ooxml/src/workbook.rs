//! Workbook: ordered worksheets plus one shared string table

use serde_json::{Map, Value as JsonValue};

use crate::error::{CellbridgeError, Result};
use crate::shared_strings::SharedStringTable;
use crate::worksheet::Worksheet;

/// An in-memory spreadsheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    /// Sheets in declaration order
    sheets: Vec<Worksheet>,
    shared_strings: SharedStringTable,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet. Names must be unique within the workbook.
    pub fn add_sheet(&mut self, sheet: Worksheet) -> Result<&mut Worksheet> {
        if self.sheet(sheet.name()).is_some() {
            return Err(CellbridgeError::DuplicateSheetName(sheet.name().to_string()));
        }
        self.sheets.push(sheet);
        let last = self.sheets.len() - 1;
        Ok(&mut self.sheets[last])
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|s| s.name() == name)
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Worksheet::name).collect()
    }

    /// Intern a string in the workbook's shared string table.
    pub fn add_shared_string(&mut self, s: &str) -> usize {
        self.shared_strings.add_string(s)
    }

    pub fn shared_string_index(&self, s: &str) -> Option<usize> {
        self.shared_strings.index_of(s)
    }

    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.shared_strings
    }

    pub(crate) fn set_shared_strings(&mut self, table: SharedStringTable) {
        self.shared_strings = table;
    }

    /// Sheets as `{name: [rows]}`, see [`Worksheet::to_json`].
    pub fn to_json(&self) -> JsonValue {
        let object: Map<String, JsonValue> = self
            .sheets
            .iter()
            .map(|s| (s.name().to_string(), s.to_json()))
            .collect();
        JsonValue::Object(object)
    }
}
