//! Cell values and their kinds

use crate::address::CellAddress;

/// How a cell's raw text should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    /// Text stored in the shared string table (`t="s"`)
    #[default]
    SharedString,
    /// Text stored inline in the cell (`t="inlineStr"` or `t="str"`)
    InlineString,
    /// Number in its textual form (no `t` or `t="n"`)
    NumericText,
    /// `1`/`0` or `true`/`false` (`t="b"`)
    BooleanText,
    /// ISO-8601 date text (`t="d"`)
    DateText,
}

impl CellKind {
    /// Map a worksheet `t` attribute to a kind.
    pub fn from_type_attr(attr: Option<&str>) -> Self {
        match attr {
            Some("s") => CellKind::SharedString,
            Some("inlineStr") | Some("str") | Some("e") => CellKind::InlineString,
            Some("b") => CellKind::BooleanText,
            Some("d") => CellKind::DateText,
            _ => CellKind::NumericText,
        }
    }

    /// Whether the raw value is plain text rather than a typed rendering.
    pub fn is_text(self) -> bool {
        matches!(self, CellKind::SharedString | CellKind::InlineString)
    }
}

/// A single populated cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub address: CellAddress,
    pub value: String,
    pub kind: CellKind,
}

impl Cell {
    pub fn new(address: CellAddress, value: impl Into<String>, kind: CellKind) -> Self {
        Self {
            address,
            value: value.into(),
            kind,
        }
    }

    /// The cell reference, e.g. "B12".
    pub fn reference(&self) -> String {
        self.address.to_string()
    }
}
