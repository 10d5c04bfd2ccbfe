//! Workbook → structured value

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};

use crate::address::CellAddress;
use crate::bridge::encoder::SCALAR_COLUMN;
use crate::bridge::structured::Binary;
use crate::cell::Cell;
use crate::config::DecoderSettings;
use crate::error::{CellbridgeError, Result};
use crate::value::Value;
use crate::workbook::Workbook;
use crate::worksheet::Worksheet;

/// A type that can be read from a single tagged value.
///
/// Conversion first accepts the exact tag, then falls back to parsing the
/// value's text.
pub trait FromValue: Sized {
    /// Type name reported in mismatch errors
    const EXPECTED: &'static str;

    fn from_value(value: &Value, settings: &DecoderSettings) -> Option<Self>;

    /// Conversion from the cell's verbatim text, tried before the tagged value.
    fn from_raw(_raw: &str) -> Option<Self> {
        None
    }
}

/// A type that can be rebuilt from a [`Record`].
///
/// ```
/// use cellbridge_ooxml::bridge::{FromRecord, Record};
///
/// struct Person {
///     name: String,
///     age: i64,
///     nickname: Option<String>,
/// }
///
/// impl FromRecord for Person {
///     fn from_record(record: &Record<'_>) -> cellbridge_ooxml::Result<Self> {
///         Ok(Person {
///             name: record.field("name")?,
///             age: record.field("age")?,
///             nickname: record.optional("nickname")?,
///         })
///     }
/// }
/// ```
pub trait FromRecord: Sized {
    fn from_record(record: &Record<'_>) -> Result<Self>;
}

/// Decodes workbooks into records
#[derive(Debug, Clone, Default)]
pub struct StructuredDecoder {
    settings: DecoderSettings,
}

impl StructuredDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DecoderSettings) -> Self {
        Self { settings }
    }

    /// Decode the record stored on the main sheet.
    pub fn decode<T: FromRecord>(&self, workbook: &Workbook) -> Result<T> {
        let name = self.settings.main_sheet.as_str();
        let sheet = workbook
            .sheet(name)
            .ok_or_else(|| CellbridgeError::KeyNotFound(format!("sheet '{name}'")))?;
        T::from_record(&Record::new(workbook, sheet, 2, true, &self.settings))
    }
}

/// One data row of a sheet, addressed by the names in the sheet's header row
#[derive(Debug, Clone)]
pub struct Record<'a> {
    workbook: &'a Workbook,
    sheet: &'a Worksheet,
    columns: HashMap<&'a str, u32>,
    row: u32,
    top_level: bool,
    settings: &'a DecoderSettings,
}

impl<'a> Record<'a> {
    fn new(
        workbook: &'a Workbook,
        sheet: &'a Worksheet,
        row: u32,
        top_level: bool,
        settings: &'a DecoderSettings,
    ) -> Self {
        Self {
            workbook,
            sheet,
            columns: header_columns(sheet),
            row,
            top_level,
            settings,
        }
    }

    /// Name of the sheet this record is read from.
    pub fn sheet_name(&self) -> &str {
        self.sheet.name()
    }

    /// Row number of this record's data.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Whether the header row names `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Field names in column order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<(&str, u32)> = self.columns.iter().map(|(k, v)| (*k, *v)).collect();
        names.sort_by_key(|(_, column)| *column);
        names.into_iter().map(|(name, _)| name).collect()
    }

    fn cell(&self, name: &str) -> Option<&'a Cell> {
        let column = *self.columns.get(name)?;
        let address = CellAddress::new(column, self.row).ok()?;
        self.sheet.get_cell(address)
    }

    /// Raw value of a field, or `None` when absent.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.cell(name).map(Value::from_cell)
    }

    /// Read a required field.
    pub fn field<T: FromValue>(&self, name: &str) -> Result<T> {
        if !self.has_field(name) {
            return Err(CellbridgeError::KeyNotFound(format!(
                "column '{name}' in sheet '{}'",
                self.sheet.name()
            )));
        }
        let cell = self.cell(name).ok_or_else(|| {
            CellbridgeError::KeyNotFound(format!(
                "value for '{name}' in sheet '{}' row {}",
                self.sheet.name(),
                self.row
            ))
        })?;
        convert(cell, name, self.settings)
    }

    /// Read a field that may be absent.
    pub fn optional<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
        match self.cell(name) {
            Some(cell) => convert(cell, name, self.settings).map(Some),
            None => Ok(None),
        }
    }

    /// A sequence element: an absent cell is read as `Null`.
    fn element<T: FromValue>(&self, name: &str) -> Result<T> {
        match self.cell(name) {
            Some(cell) => convert(cell, name, self.settings),
            None => T::from_value(&Value::Null, self.settings).ok_or_else(|| {
                CellbridgeError::TypeMismatch {
                    field: format!("{name} (row {})", self.row),
                    expected: T::EXPECTED,
                    found: String::new(),
                }
            }),
        }
    }

    fn secondary_sheet(&self, name: &str) -> Result<&'a Worksheet> {
        if !self.top_level {
            return Err(CellbridgeError::UnsupportedOperation(format!(
                "'{name}' is nested deeper than one level below sheet '{}'",
                self.sheet.name()
            )));
        }
        self.workbook
            .sheet(name)
            .ok_or_else(|| CellbridgeError::KeyNotFound(format!("sheet '{name}'")))
    }

    /// Read a nested record from the sheet named `name`.
    pub fn nested<T: FromRecord>(&self, name: &str) -> Result<T> {
        let sheet = self.secondary_sheet(name)?;
        T::from_record(&Record::new(self.workbook, sheet, 2, false, self.settings))
    }

    /// Read a sequence of records, one per data row of the sheet named `name`.
    pub fn sequence<T: FromRecord>(&self, name: &str) -> Result<Vec<T>> {
        let sheet = self.secondary_sheet(name)?;
        data_rows(sheet)
            .map(|row| {
                T::from_record(&Record::new(self.workbook, sheet, row, false, self.settings))
            })
            .collect()
    }

    /// Read a sequence of scalars from the `value` column of the sheet named `name`.
    pub fn scalars<T: FromValue>(&self, name: &str) -> Result<Vec<T>> {
        let sheet = self.secondary_sheet(name)?;
        if sheet.is_empty() {
            return Ok(Vec::new());
        }
        let record = Record::new(self.workbook, sheet, 1, false, self.settings);
        if !record.has_field(SCALAR_COLUMN) {
            return Err(CellbridgeError::KeyNotFound(format!(
                "column '{SCALAR_COLUMN}' in sheet '{name}'"
            )));
        }
        data_rows(sheet)
            .map(|row| Record { row, ..record.clone() }.element(SCALAR_COLUMN))
            .collect()
    }
}

/// Header text → column number, from row 1.
fn header_columns(sheet: &Worksheet) -> HashMap<&str, u32> {
    sheet
        .cells()
        .take_while(|cell| cell.address.row() == 1)
        .map(|cell| (cell.value.as_str(), cell.address.column()))
        .collect()
}

/// Row numbers from below the header to the last row holding a cell.
///
/// Rows with no cells in between still count, since an element whose values
/// are all null writes nothing.
fn data_rows(sheet: &Worksheet) -> std::ops::RangeInclusive<u32> {
    let last = sheet.cells().map(|cell| cell.address.row()).max().unwrap_or(0);
    2..=last
}

fn convert<T: FromValue>(cell: &Cell, field: &str, settings: &DecoderSettings) -> Result<T> {
    T::from_raw(&cell.value)
        .or_else(|| T::from_value(&Value::from_cell(cell), settings))
        .ok_or_else(|| CellbridgeError::TypeMismatch {
            field: field.to_string(),
            expected: T::EXPECTED,
            found: cell.value.clone(),
        })
}

impl FromValue for Value {
    const EXPECTED: &'static str = "value";

    fn from_value(value: &Value, _settings: &DecoderSettings) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value, _settings: &DecoderSettings) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn from_raw(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: &Value, settings: &DecoderSettings) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other, settings).map(Some),
        }
    }

    fn from_raw(raw: &str) -> Option<Self> {
        T::from_raw(raw).map(Some)
    }
}

macro_rules! from_value_integer {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                const EXPECTED: &'static str = "integer";

                fn from_value(value: &Value, _settings: &DecoderSettings) -> Option<Self> {
                    match value {
                        Value::Integer(i) => <$t>::try_from(*i).ok(),
                        Value::String(s) => s.trim().parse().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

macro_rules! from_value_float {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                const EXPECTED: &'static str = "real";

                fn from_value(value: &Value, _settings: &DecoderSettings) -> Option<Self> {
                    match value {
                        Value::Real(f) => Some(*f as $t),
                        Value::Integer(i) => Some(*i as $t),
                        Value::String(s) => s.trim().parse().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value_float!(f32, f64);

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: &Value, _settings: &DecoderSettings) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(*b),
            Value::Integer(1) => Some(true),
            Value::Integer(0) => Some(false),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromValue for DateTime<Utc> {
    const EXPECTED: &'static str = "timestamp";

    fn from_value(value: &Value, settings: &DecoderSettings) -> Option<Self> {
        match value {
            Value::Timestamp(t) => Some(*t),
            Value::String(s) => parse_timestamp(s.trim(), &settings.date_fallback_format),
            _ => None,
        }
    }
}

fn parse_timestamp(text: &str, fallback_format: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| text.parse::<DateTime<Utc>>())
        .or_else(|_| DateTime::parse_from_str(text, fallback_format).map(|t| t.with_timezone(&Utc)))
        .ok()
}

impl FromValue for Vec<u8> {
    const EXPECTED: &'static str = "binary";

    fn from_value(value: &Value, _settings: &DecoderSettings) -> Option<Self> {
        match value {
            Value::Binary(bytes) => Some(bytes.clone()),
            Value::String(s) => BASE64.decode(s.trim()).ok(),
            _ => None,
        }
    }
}

impl FromValue for Binary {
    const EXPECTED: &'static str = "binary";

    fn from_value(value: &Value, settings: &DecoderSettings) -> Option<Self> {
        Vec::<u8>::from_value(value, settings).map(Binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::encoder::StructuredEncoder;
    use crate::bridge::structured::{Shape, Structured};
    use crate::cell::CellKind;
    use chrono::TimeZone;

    #[derive(Debug, PartialEq)]
    struct Address {
        street: String,
        city: String,
    }

    impl Structured for Address {
        fn shape(&self) -> Shape<'_> {
            Shape::Fields(vec![("street", &self.street), ("city", &self.city)])
        }
    }

    impl FromRecord for Address {
        fn from_record(record: &Record<'_>) -> Result<Self> {
            Ok(Address {
                street: record.field("street")?,
                city: record.field("city")?,
            })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Person {
        name: String,
        age: u32,
        score: f64,
        member: bool,
        joined: DateTime<Utc>,
        avatar: Binary,
        nickname: Option<String>,
        address: Address,
        previous: Vec<Address>,
        hobbies: Vec<String>,
    }

    impl Structured for Person {
        fn shape(&self) -> Shape<'_> {
            Shape::Fields(vec![
                ("name", &self.name),
                ("age", &self.age),
                ("score", &self.score),
                ("member", &self.member),
                ("joined", &self.joined),
                ("avatar", &self.avatar),
                ("nickname", &self.nickname),
                ("address", &self.address),
                ("previous", &self.previous),
                ("hobbies", &self.hobbies),
            ])
        }
    }

    impl FromRecord for Person {
        fn from_record(record: &Record<'_>) -> Result<Self> {
            Ok(Person {
                name: record.field("name")?,
                age: record.field("age")?,
                score: record.field("score")?,
                member: record.field("member")?,
                joined: record.field("joined")?,
                avatar: record.field("avatar")?,
                nickname: record.optional("nickname")?,
                address: record.nested("address")?,
                previous: record.sequence("previous")?,
                hobbies: record.scalars("hobbies")?,
            })
        }
    }

    fn workbook_with_main(cells: &[(&str, &str, CellKind)]) -> Workbook {
        let mut sheet = Worksheet::new("Main Sheet");
        for (reference, value, kind) in cells {
            sheet.set_cell_with_kind(CellAddress::parse(reference).unwrap(), *value, *kind);
        }
        let mut workbook = Workbook::new();
        workbook.add_sheet(sheet).unwrap();
        workbook
    }

    #[derive(Debug)]
    struct Flag(bool);

    impl FromRecord for Flag {
        fn from_record(record: &Record<'_>) -> Result<Self> {
            Ok(Flag(record.field("flag")?))
        }
    }

    fn decode_flag(text: &str) -> Result<bool> {
        let workbook = workbook_with_main(&[
            ("A1", "flag", CellKind::SharedString),
            ("A2", text, CellKind::SharedString),
        ]);
        StructuredDecoder::new()
            .decode::<Flag>(&workbook)
            .map(|flag| flag.0)
    }

    #[test]
    fn test_boolean_text_forms() {
        assert!(decode_flag("yes").unwrap());
        assert!(decode_flag("TRUE").unwrap());
        assert!(!decode_flag("0").unwrap());
        assert!(!decode_flag("No").unwrap());
        let err = decode_flag("maybe").unwrap_err();
        assert!(matches!(
            err,
            CellbridgeError::TypeMismatch { ref field, expected: "boolean", ref found }
                if field == "flag" && found == "maybe"
        ));
    }

    #[test]
    fn test_missing_main_sheet() {
        let err = StructuredDecoder::new()
            .decode::<Flag>(&Workbook::new())
            .unwrap_err();
        assert!(matches!(err, CellbridgeError::KeyNotFound(_)));
    }

    #[test]
    fn test_missing_column_and_cell() {
        let no_column = workbook_with_main(&[("A1", "other", CellKind::SharedString)]);
        assert!(matches!(
            StructuredDecoder::new().decode::<Flag>(&no_column),
            Err(CellbridgeError::KeyNotFound(_))
        ));

        let no_cell = workbook_with_main(&[("A1", "flag", CellKind::SharedString)]);
        assert!(matches!(
            StructuredDecoder::new().decode::<Flag>(&no_cell),
            Err(CellbridgeError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_numbers_from_text() {
        struct Numbers {
            count: i32,
            ratio: f64,
        }
        impl FromRecord for Numbers {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                Ok(Numbers {
                    count: record.field("count")?,
                    ratio: record.field("ratio")?,
                })
            }
        }

        let workbook = workbook_with_main(&[
            ("A1", "count", CellKind::SharedString),
            ("B1", "ratio", CellKind::SharedString),
            ("A2", "42", CellKind::SharedString),
            ("B2", "7", CellKind::NumericText),
        ]);
        let numbers: Numbers = StructuredDecoder::new().decode(&workbook).unwrap();
        assert_eq!(numbers.count, 42);
        assert_eq!(numbers.ratio, 7.0);

        let bad = workbook_with_main(&[
            ("A1", "count", CellKind::SharedString),
            ("B1", "ratio", CellKind::SharedString),
            ("A2", "4.5", CellKind::SharedString),
            ("B2", "1", CellKind::SharedString),
        ]);
        assert!(matches!(
            StructuredDecoder::new().decode::<Numbers>(&bad),
            Err(CellbridgeError::TypeMismatch { expected: "integer", .. })
        ));
    }

    #[test]
    fn test_timestamp_fallback_format() {
        struct Stamp(DateTime<Utc>);
        impl FromRecord for Stamp {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                Ok(Stamp(record.field("at")?))
            }
        }

        let expected = Utc.with_ymd_and_hms(2024, 9, 29, 10, 30, 0).unwrap();
        for text in [
            "2024-09-29T10:30:00Z",
            "2024-09-29T12:30:00+02:00",
            "2024-09-29T10:30:00+0000",
        ] {
            let workbook = workbook_with_main(&[
                ("A1", "at", CellKind::SharedString),
                ("A2", text, CellKind::SharedString),
            ]);
            let stamp: Stamp = StructuredDecoder::new().decode(&workbook).unwrap();
            assert_eq!(stamp.0, expected, "parsing {text}");
        }

        let custom = StructuredDecoder::with_settings(DecoderSettings {
            main_sheet: "Main Sheet".to_string(),
            date_fallback_format: "%d/%m/%Y %H:%M %z".to_string(),
        });
        let workbook = workbook_with_main(&[
            ("A1", "at", CellKind::SharedString),
            ("A2", "29/09/2024 10:30 +0000", CellKind::SharedString),
        ]);
        assert_eq!(custom.decode::<Stamp>(&workbook).unwrap().0, expected);
    }

    #[test]
    fn test_nested_only_at_top_level() {
        struct Deep;
        impl FromRecord for Deep {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                record.nested::<Address>("address")?;
                Ok(Deep)
            }
        }
        struct Outer;
        impl FromRecord for Outer {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                record.nested::<Deep>("address")?;
                Ok(Outer)
            }
        }

        let workbook = StructuredEncoder::new()
            .encode(&serde_json::json!({"address": {"street": "s", "city": "c"}}))
            .unwrap();
        assert!(matches!(
            StructuredDecoder::new().decode::<Outer>(&workbook),
            Err(CellbridgeError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_encode_decode_record() {
        let person = Person {
            name: "Alice".to_string(),
            age: 25,
            score: 88.5,
            member: true,
            joined: Utc.with_ymd_and_hms(2024, 9, 29, 10, 30, 0).unwrap(),
            avatar: Binary(vec![0, 159, 146, 150]),
            nickname: None,
            address: Address {
                street: "123 Elm St".to_string(),
                city: "Somewhere".to_string(),
            },
            previous: vec![
                Address {
                    street: "1 Oak Rd".to_string(),
                    city: "Elsewhere".to_string(),
                },
                Address {
                    street: "9 Pine Ave".to_string(),
                    city: "Nowhere".to_string(),
                },
            ],
            hobbies: vec!["Reading".to_string(), "Gaming".to_string()],
        };

        let workbook = StructuredEncoder::new().encode(&person).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec!["Main Sheet", "address", "hobbies", "previous"]
        );

        let decoded: Person = StructuredDecoder::new().decode(&workbook).unwrap();
        assert_eq!(decoded, person);
    }

    #[test]
    fn test_empty_sequences_decode_empty() {
        struct Lists {
            items: Vec<Address>,
            tags: Vec<String>,
        }
        impl FromRecord for Lists {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                Ok(Lists {
                    items: record.sequence("items")?,
                    tags: record.scalars("tags")?,
                })
            }
        }

        let workbook = StructuredEncoder::new()
            .encode(&serde_json::json!({"items": [], "tags": []}))
            .unwrap();
        let lists: Lists = StructuredDecoder::new().decode(&workbook).unwrap();
        assert!(lists.items.is_empty());
        assert!(lists.tags.is_empty());
    }

    #[test]
    fn test_numeric_text_reads_verbatim_as_string() {
        struct Code(String, Option<String>);
        impl FromRecord for Code {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                Ok(Code(record.field("id")?, record.optional("rate")?))
            }
        }

        let workbook = workbook_with_main(&[
            ("A1", "id", CellKind::SharedString),
            ("B1", "rate", CellKind::SharedString),
            ("A2", "12345678901234567890", CellKind::NumericText),
            ("B2", "1.10", CellKind::NumericText),
        ]);
        let code: Code = StructuredDecoder::new().decode(&workbook).unwrap();
        assert_eq!(code.0, "12345678901234567890");
        assert_eq!(code.1.as_deref(), Some("1.10"));

        let padded = workbook_with_main(&[
            ("A1", "id", CellKind::SharedString),
            ("A2", "007", CellKind::NumericText),
        ]);
        let code: Code = StructuredDecoder::new().decode(&padded).unwrap();
        assert_eq!(code.0, "007");
        assert!(code.1.is_none());
    }

    #[test]
    fn test_null_sequence_elements_keep_their_rows() {
        struct Tags(Vec<Option<String>>);
        impl FromRecord for Tags {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                Ok(Tags(record.scalars("tags")?))
            }
        }
        #[derive(Debug)]
        struct StrictTags(Vec<String>);
        impl FromRecord for StrictTags {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                Ok(StrictTags(record.scalars("tags")?))
            }
        }

        let workbook = StructuredEncoder::new()
            .encode(&serde_json::json!({"tags": ["a", null, "c"]}))
            .unwrap();
        let tags: Tags = StructuredDecoder::new().decode(&workbook).unwrap();
        assert_eq!(
            tags.0,
            vec![Some("a".to_string()), None, Some("c".to_string())]
        );

        let err = StructuredDecoder::new()
            .decode::<StrictTags>(&workbook)
            .unwrap_err();
        assert!(matches!(
            err,
            CellbridgeError::TypeMismatch { ref field, expected: "string", .. }
                if field.contains("row 3")
        ));
    }

    #[test]
    fn test_empty_record_in_sequence_keeps_its_row() {
        struct Entry {
            note: Option<String>,
        }
        impl FromRecord for Entry {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                Ok(Entry {
                    note: record.optional("note")?,
                })
            }
        }
        struct Log(Vec<Entry>);
        impl FromRecord for Log {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                Ok(Log(record.sequence("entries")?))
            }
        }

        let workbook = StructuredEncoder::new()
            .encode(&serde_json::json!({
                "entries": [{"note": "first"}, {"note": null}, {"note": "third"}]
            }))
            .unwrap();
        let log: Log = StructuredDecoder::new().decode(&workbook).unwrap();
        let notes: Vec<Option<&str>> = log.0.iter().map(|e| e.note.as_deref()).collect();
        assert_eq!(notes, vec![Some("first"), None, Some("third")]);
    }

    #[test]
    fn test_field_names_in_column_order() {
        let workbook = workbook_with_main(&[
            ("B1", "second", CellKind::SharedString),
            ("A1", "first", CellKind::SharedString),
        ]);
        let decoder = StructuredDecoder::new();
        struct Names(Vec<String>);
        impl FromRecord for Names {
            fn from_record(record: &Record<'_>) -> Result<Self> {
                Ok(Names(
                    record.field_names().into_iter().map(str::to_string).collect(),
                ))
            }
        }
        let names: Names = decoder.decode(&workbook).unwrap();
        assert_eq!(names.0, vec!["first", "second"]);
    }
}
