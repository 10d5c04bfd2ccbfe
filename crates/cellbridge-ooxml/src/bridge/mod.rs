//! Mapping between structured values and workbooks
//!
//! A record's scalar fields land on a main worksheet as a header row plus one
//! data row. Fields holding a nested record or a sequence each get a worksheet
//! named after the field. Only one level of nesting is representable.
//!
//! Encoding goes through the [`Structured`] trait; any `serde::Serialize`
//! type can also be encoded through its JSON form. Decoding is driven by
//! [`FromRecord`] implementations reading fields from a [`Record`].

pub mod decoder;
pub mod encoder;
pub mod structured;

pub use decoder::{FromRecord, FromValue, Record, StructuredDecoder};
pub use encoder::StructuredEncoder;
pub use structured::{Binary, Shape, Structured};
