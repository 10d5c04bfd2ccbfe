//! # cellbridge-ooxml
//!
//! Reading and writing XLSX (SpreadsheetML) packages, and mapping structured
//! values onto workbooks.
//!
//! This crate provides functionality to:
//! - Read an XLSX package into a sparse in-memory [`Workbook`]
//! - Write a [`Workbook`] back out as a minimal, valid package
//! - Encode records as sheets and decode them again through the [`bridge`]
//!
//! ## Example: Reading a Workbook
//!
//! ```no_run
//! let workbook = cellbridge_ooxml::read("report.xlsx")?;
//!
//! for sheet in workbook.sheets() {
//!     for row in sheet.rows() {
//!         println!("{}: {:?}", sheet.name(), row.cells);
//!     }
//! }
//! # Ok::<(), cellbridge_ooxml::CellbridgeError>(())
//! ```
//!
//! ## Example: Encoding a Record
//!
//! ```no_run
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let person = Person { name: "Alice".into(), age: 25 };
//! let workbook = cellbridge_ooxml::StructuredEncoder::new().encode_serialize(&person)?;
//! cellbridge_ooxml::write(&workbook, "person.xlsx")?;
//! # Ok::<(), cellbridge_ooxml::CellbridgeError>(())
//! ```

pub mod address;
pub mod archive;
pub mod bridge;
pub mod cell;
pub mod config;
pub mod error;
pub mod parts;
pub mod reader;
pub mod relationships;
pub mod shared_strings;
pub mod value;
pub mod workbook;
pub mod worksheet;
pub mod writer;
pub mod xml;

use std::path::Path;

pub use address::CellAddress;
pub use archive::{ArchiveError, ArchiveService, ZipArchiveService};
pub use bridge::{
    Binary, FromRecord, FromValue, Record, Shape, Structured, StructuredDecoder,
    StructuredEncoder,
};
pub use cell::{Cell, CellKind};
pub use config::{Settings, SheetLookup};
pub use error::{CellbridgeError, Result};
pub use reader::PackageReader;
pub use relationships::Relationships;
pub use shared_strings::SharedStringTable;
pub use value::Value;
pub use workbook::Workbook;
pub use worksheet::{Row, Worksheet};
pub use writer::PackageWriter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read a package with default settings.
pub fn read(path: impl AsRef<Path>) -> Result<Workbook> {
    PackageReader::new().read(path)
}

/// Write a package with default settings.
pub fn write(workbook: &Workbook, path: impl AsRef<Path>) -> Result<()> {
    PackageWriter::new().write(workbook, path)
}

/// Encode a record with default settings.
pub fn encode<T: Structured + ?Sized>(value: &T) -> Result<Workbook> {
    StructuredEncoder::new().encode(value)
}

/// Decode a record with default settings.
pub fn decode<T: FromRecord>(workbook: &Workbook) -> Result<T> {
    StructuredDecoder::new().decode(workbook)
}
