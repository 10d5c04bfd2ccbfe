//! Package writer: [`Workbook`] → XLSX bytes
//!
//! Every part is rendered into a scratch directory which is then archived.
//! All cells are written as shared-string cells (`t="s"`); the table written
//! out is the workbook's own table extended with any cell text it lacks, so
//! the caller's workbook is left untouched.
//!
//! # Example
//!
//! ```no_run
//! use cellbridge_ooxml::{PackageWriter, Workbook, Worksheet};
//!
//! let mut workbook = Workbook::new();
//! let mut sheet = Worksheet::new("Data");
//! sheet.set("A1", "hello")?;
//! workbook.add_sheet(sheet)?;
//!
//! PackageWriter::new().write(&workbook, "out.xlsx")?;
//! # Ok::<(), cellbridge_ooxml::CellbridgeError>(())
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::archive::{remove_scratch, scratch_dir, ArchiveService, ZipArchiveService};
use crate::error::{CellbridgeError, Result};
use crate::parts::{
    content_types_xml, root_rels_xml, workbook_rels_xml, worksheet_path, CONTENT_TYPES_PATH,
    OFFICE_RELS_NS, ROOT_RELS_PATH, SHARED_STRINGS_PATH, SPREADSHEET_NS, WORKBOOK_PATH,
    WORKBOOK_RELS_PATH, XML_DECLARATION,
};
use crate::shared_strings::SharedStringTable;
use crate::workbook::Workbook;
use crate::worksheet::Worksheet;
use crate::xml::escape_xml;

/// Writes workbooks as spreadsheet packages
#[derive(Debug, Clone, Default)]
pub struct PackageWriter<A = ZipArchiveService> {
    archive: A,
}

impl PackageWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: ArchiveService> PackageWriter<A> {
    /// Use a different archive service.
    pub fn with_archive_service<B: ArchiveService>(self, archive: B) -> PackageWriter<B> {
        PackageWriter { archive }
    }

    /// Write `workbook` to a file at `path`.
    pub fn write(&self, workbook: &Workbook, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.write_to_bytes(workbook)?;
        fs::write(path, bytes).map_err(|e| CellbridgeError::write(path.display(), e))?;
        debug!(path = %path.display(), sheets = workbook.sheets().len(), "wrote package");
        Ok(())
    }

    /// Render `workbook` as package bytes.
    pub fn write_to_bytes(&self, workbook: &Workbook) -> Result<Vec<u8>> {
        let scratch = scratch_dir("cellbridge-write-")
            .map_err(|e| CellbridgeError::write("creating scratch directory", e))?;

        let result = self.write_tree(workbook, scratch.path());
        remove_scratch(scratch);
        result
    }

    fn write_tree(&self, workbook: &Workbook, root: &Path) -> Result<Vec<u8>> {
        let sheets = workbook.sheets();
        let mut strings = workbook.shared_strings().clone();

        let mut parts: Vec<(String, String)> = Vec::with_capacity(sheets.len() + 5);
        for (index, sheet) in sheets.iter().enumerate() {
            parts.push((worksheet_path(index + 1), worksheet_xml(sheet, &mut strings)));
        }

        let names: Vec<&str> = sheets.iter().map(Worksheet::name).collect();
        parts.push((SHARED_STRINGS_PATH.to_string(), shared_strings_xml(&strings)));
        parts.push((WORKBOOK_PATH.to_string(), workbook_xml(&names)));
        parts.push((CONTENT_TYPES_PATH.to_string(), content_types_xml(sheets.len())));
        parts.push((ROOT_RELS_PATH.to_string(), root_rels_xml()));
        parts.push((WORKBOOK_RELS_PATH.to_string(), workbook_rels_xml(sheets.len())));

        for (part, xml) in &parts {
            write_part(root, part, xml)?;
        }
        debug!(parts = parts.len(), strings = strings.len(), "rendered package tree");

        self.archive
            .archive(root)
            .map_err(|e| CellbridgeError::write("archiving package", e))
    }
}

fn write_part(root: &Path, part: &str, xml: &str) -> Result<()> {
    let path = root.join(part);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CellbridgeError::write(part, e))?;
    }
    fs::write(&path, xml).map_err(|e| CellbridgeError::write(part, e))
}

/// Render one worksheet part, interning each cell's text in `strings`.
pub fn worksheet_xml(sheet: &Worksheet, strings: &mut SharedStringTable) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<worksheet xmlns="{SPREADSHEET_NS}" xmlns:r="{OFFICE_RELS_NS}">"#
    ));

    let rows = sheet.rows();
    if rows.is_empty() {
        xml.push_str("<sheetData/>");
    } else {
        xml.push_str("<sheetData>");
        for row in rows {
            xml.push_str(&format!(r#"<row r="{}">"#, row.number));
            for cell in row.cells {
                let index = strings.add_string(&cell.value);
                xml.push_str(&format!(
                    r#"<c r="{}" t="s"><v>{index}</v></c>"#,
                    cell.address
                ));
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData>");
    }

    xml.push_str("</worksheet>");
    xml
}

/// Render `xl/sharedStrings.xml`.
pub fn shared_strings_xml(strings: &SharedStringTable) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<sst xmlns="{SPREADSHEET_NS}" count="{count}" uniqueCount="{count}">"#,
        count = strings.len()
    ));

    for s in strings.iter() {
        // Leading/trailing whitespace is dropped by readers unless preserved
        let preserve = s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace);
        if preserve {
            xml.push_str(r#"<si><t xml:space="preserve">"#);
        } else {
            xml.push_str("<si><t>");
        }
        xml.push_str(&escape_xml(s));
        xml.push_str("</t></si>");
    }

    xml.push_str("</sst>");
    xml
}

/// Render `xl/workbook.xml`; sheet N gets `sheetId="N"` and `r:id="rIdN"`.
pub fn workbook_xml(sheet_names: &[&str]) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<workbook xmlns="{SPREADSHEET_NS}" xmlns:r="{OFFICE_RELS_NS}">"#
    ));
    xml.push_str("<sheets>");
    for (index, name) in sheet_names.iter().enumerate() {
        let position = index + 1;
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{position}" r:id="rId{position}"/>"#,
            escape_xml(name)
        ));
    }
    xml.push_str("</sheets>");
    xml.push_str("</workbook>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{parse_shared_strings, parse_workbook_sheets, parse_worksheet};
    use crate::relationships::Relationships;

    fn sample_sheet() -> Worksheet {
        let mut sheet = Worksheet::new("Data");
        sheet.set("B2", "second").unwrap();
        sheet.set("A1", "first").unwrap();
        sheet.set("C1", "first").unwrap();
        sheet
    }

    #[test]
    fn test_worksheet_xml_sorted_and_interned() {
        let mut strings = SharedStringTable::new();
        let xml = worksheet_xml(&sample_sheet(), &mut strings);

        assert!(xml.contains(
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1" t="s"><v>0</v></c></row>"#
        ));
        assert!(xml.contains(r#"<row r="2"><c r="B2" t="s"><v>1</v></c></row>"#));
        assert_eq!(strings.len(), 2);
    }

    #[test]
    fn test_worksheet_xml_reparses() {
        let mut strings = SharedStringTable::new();
        let xml = worksheet_xml(&sample_sheet(), &mut strings);
        let sheet = parse_worksheet(xml.as_bytes(), "Data", &strings).unwrap();
        assert_eq!(sheet, sample_sheet());
    }

    #[test]
    fn test_empty_worksheet() {
        let mut strings = SharedStringTable::new();
        let xml = worksheet_xml(&Worksheet::new("Empty"), &mut strings);
        assert!(xml.contains("<sheetData/>"));
        assert!(strings.is_empty());
    }

    #[test]
    fn test_shared_strings_counts_and_escaping() {
        let strings = SharedStringTable::from_strings(vec![
            "a < b & c".to_string(),
            "  padded ".to_string(),
            "plain".to_string(),
        ]);
        let xml = shared_strings_xml(&strings);

        assert!(xml.contains(r#"count="3" uniqueCount="3""#));
        assert!(xml.contains("<si><t>a &lt; b &amp; c</t></si>"));
        assert!(xml.contains(r#"<si><t xml:space="preserve">  padded </t></si>"#));
        assert_eq!(
            parse_shared_strings(xml.as_bytes()).unwrap(),
            vec!["a < b & c", "  padded ", "plain"]
        );
    }

    #[test]
    fn test_workbook_xml_declares_sheets_in_order() {
        let xml = workbook_xml(&["Main Sheet", "R&D"]);
        assert!(xml.contains(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#));
        assert!(xml.contains(r#"<sheet name="R&amp;D" sheetId="2" r:id="rId2"/>"#));

        let declared = parse_workbook_sheets(xml.as_bytes()).unwrap();
        let names: Vec<&str> = declared.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Main Sheet", "R&D"]);
        assert_eq!(declared[0].rel_id.as_deref(), Some("rId1"));
    }

    #[test]
    fn test_write_does_not_mutate_workbook() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(sample_sheet()).unwrap();
        let before = workbook.clone();

        let bytes = PackageWriter::new().write_to_bytes(&workbook).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(workbook, before);
        assert!(workbook.shared_strings().is_empty());
    }

    #[test]
    fn test_package_contains_every_part() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(sample_sheet()).unwrap();
        workbook.add_sheet(Worksheet::new("Other")).unwrap();

        let bytes = PackageWriter::new().write_to_bytes(&workbook).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        for part in [
            CONTENT_TYPES_PATH,
            ROOT_RELS_PATH,
            WORKBOOK_PATH,
            WORKBOOK_RELS_PATH,
            SHARED_STRINGS_PATH,
            "xl/worksheets/sheet1.xml",
            "xl/worksheets/sheet2.xml",
        ] {
            assert!(archive.by_name(part).is_ok(), "missing {part}");
        }

        let mut rels_xml = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name(WORKBOOK_RELS_PATH).unwrap(),
            &mut rels_xml,
        )
        .unwrap();
        let rels = Relationships::parse(rels_xml.as_bytes()).unwrap();
        assert_eq!(rels.get("rId2"), Some("worksheets/sheet2.xml"));
    }

    #[test]
    fn test_write_to_missing_directory_is_write_error() {
        let workbook = Workbook::new();
        let err = PackageWriter::new()
            .write(&workbook, "/nonexistent-dir/sub/out.xlsx")
            .unwrap_err();
        assert!(matches!(err, CellbridgeError::Write(_)));
    }
}
