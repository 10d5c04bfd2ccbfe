//! Fixed part paths and the static parts of a spreadsheet package

use crate::relationships::Relationships;

pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
pub const ROOT_RELS_PATH: &str = "_rels/.rels";
pub const WORKBOOK_PATH: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";
pub const SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";

/// SpreadsheetML main namespace
pub const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
/// Office document relationships namespace (the `r:` prefix)
pub const OFFICE_RELS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Relationship ID of the shared strings part in workbook.xml.rels
pub(crate) const SHARED_STRINGS_REL_ID: &str = "rIdSharedStrings";

/// Path of the worksheet part for the 1-based sheet `position`.
pub fn worksheet_path(position: usize) -> String {
    format!("xl/worksheets/sheet{position}.xml")
}

/// Target of the worksheet part relative to `xl/`.
pub(crate) fn worksheet_target(position: usize) -> String {
    format!("worksheets/sheet{position}.xml")
}

/// `[Content_Types].xml` declaring one override per worksheet.
pub fn content_types_xml(sheet_count: usize) -> String {
    let mut overrides = String::new();
    for position in 1..=sheet_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            worksheet_path(position)
        ));
        overrides.push('\n');
    }

    format!(
        concat!(
            "{decl}\n",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            "\n",
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            "\n",
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            "\n",
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            "\n",
            r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
            "\n",
            "{overrides}",
            "</Types>",
        ),
        decl = XML_DECLARATION,
        overrides = overrides,
    )
}

/// `_rels/.rels` pointing the package at the workbook part.
pub fn root_rels_xml() -> String {
    let mut rels = Relationships::new();
    rels.add(WORKBOOK_PATH, Relationships::TYPE_OFFICE_DOCUMENT);
    rels.to_xml()
}

/// `xl/_rels/workbook.xml.rels`: `rIdN` → `worksheets/sheetN.xml`, plus shared strings.
pub fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut rels = Relationships::new();
    rels.add_with_id(
        SHARED_STRINGS_REL_ID,
        "sharedStrings.xml",
        Relationships::TYPE_SHARED_STRINGS,
    );
    for position in 1..=sheet_count {
        rels.add_with_id(
            format!("rId{position}"),
            worksheet_target(position),
            Relationships::TYPE_WORKSHEET,
        );
    }
    rels.to_xml()
}
