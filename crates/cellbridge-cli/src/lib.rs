//! cellbridge CLI - Command-line interface library
//!
//! This library provides the CLI functionality for cellbridge, including:
//! - Inspect: Summarize the sheets of an XLSX package
//! - Dump: Print sheet contents as text or JSON
//! - From JSON: Encode a JSON document into a new package
//!
//! # Library Usage
//!
//! ```ignore
//! use cellbridge_cli::{run_cli, DumpFormat};
//!
//! // Run the full CLI
//! run_cli();
//!
//! // Or use individual commands programmatically
//! inspect_command(&input, &settings)?;
//! dump_command(&input, None, DumpFormat::Json, &settings)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Summarize a workbook
//! cellbridge inspect report.xlsx
//!
//! # Print one sheet as JSON
//! cellbridge dump report.xlsx --sheet People --format json
//!
//! # Build a workbook from JSON
//! cellbridge from-json order.json --output order.xlsx
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{dump_command, from_json_command, inspect_command};
pub use app::{
    dump_json, dump_text, init_logging, inspect_report, load_settings, run_cli, DumpFormat,
};
