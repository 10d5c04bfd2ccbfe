//! Package reader: XLSX bytes → [`Workbook`]
//!
//! The package is unpacked into a scratch directory that is removed when the
//! read finishes, whether it succeeded or not. Parts are then parsed from the
//! tree in this order: shared strings, workbook declaration, worksheets.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::address::CellAddress;
use crate::archive::{remove_scratch, scratch_dir, ArchiveService, ZipArchiveService};
use crate::cell::CellKind;
use crate::config::{ReaderSettings, SheetLookup};
use crate::error::{CellbridgeError, Result};
use crate::parts::{worksheet_path, SHARED_STRINGS_PATH, WORKBOOK_PATH, WORKBOOK_RELS_PATH};
use crate::relationships::Relationships;
use crate::shared_strings::SharedStringTable;
use crate::workbook::Workbook;
use crate::worksheet::Worksheet;
use crate::xml::{XmlEvent, XmlEvents};

/// A `<sheet>` entry from `xl/workbook.xml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetDeclaration {
    pub name: String,
    /// Relationship ID (`r:id`), when present
    pub rel_id: Option<String>,
}

/// Reads spreadsheet packages into workbooks
#[derive(Debug, Clone, Default)]
pub struct PackageReader<A = ZipArchiveService> {
    archive: A,
    sheet_lookup: SheetLookup,
}

impl PackageReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &ReaderSettings) -> Self {
        Self::new().with_sheet_lookup(settings.sheet_lookup)
    }
}

impl<A: ArchiveService> PackageReader<A> {
    /// Use a different archive service.
    pub fn with_archive_service<B: ArchiveService>(self, archive: B) -> PackageReader<B> {
        PackageReader {
            archive,
            sheet_lookup: self.sheet_lookup,
        }
    }

    pub fn with_sheet_lookup(mut self, sheet_lookup: SheetLookup) -> Self {
        self.sheet_lookup = sheet_lookup;
        self
    }

    /// Read a package file.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Workbook> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| CellbridgeError::read(path.display(), e))?;
        self.read_bytes(&bytes)
    }

    /// Read a package from memory.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Workbook> {
        let scratch = scratch_dir("cellbridge-read-")
            .map_err(|e| CellbridgeError::read("creating scratch directory", e))?;

        let result = self.read_tree(bytes, scratch.path());
        remove_scratch(scratch);
        result
    }

    fn read_tree(&self, bytes: &[u8], root: &Path) -> Result<Workbook> {
        self.archive
            .extract(bytes, root)
            .map_err(|e| CellbridgeError::read("extracting package", e))?;

        let strings = match read_optional_part(root, SHARED_STRINGS_PATH)? {
            Some(xml) => parse_shared_strings(&xml)?,
            None => Vec::new(),
        };
        let table = SharedStringTable::from_strings(strings);
        debug!(strings = table.len(), "loaded shared strings");

        let workbook_xml = read_optional_part(root, WORKBOOK_PATH)?
            .ok_or_else(|| CellbridgeError::Read(format!("missing {WORKBOOK_PATH}")))?;
        let declarations = parse_workbook_sheets(&workbook_xml)?;

        let part_paths = match self.sheet_lookup {
            SheetLookup::Positional => (1..=declarations.len()).map(worksheet_path).collect(),
            SheetLookup::Relationships => resolve_by_relationship(root, &declarations)?,
        };

        let mut workbook = Workbook::new();
        for (declaration, part) in declarations.iter().zip(part_paths) {
            let Some(xml) = read_optional_part(root, &part)? else {
                if self.sheet_lookup == SheetLookup::Relationships {
                    return Err(CellbridgeError::Read(format!(
                        "sheet '{}' targets missing part {part}",
                        declaration.name
                    )));
                }
                warn!(sheet = %declaration.name, part = %part, "worksheet part missing, skipping sheet");
                continue;
            };
            let sheet = parse_worksheet(&xml, &declaration.name, &table)
                .map_err(|e| with_part_context(e, &part))?;
            debug!(sheet = %declaration.name, part = %part, cells = sheet.len(), "parsed worksheet");
            workbook.add_sheet(sheet)?;
        }

        workbook.set_shared_strings(table);
        Ok(workbook)
    }
}

fn with_part_context(err: CellbridgeError, part: &str) -> CellbridgeError {
    match err {
        CellbridgeError::Read(msg) => CellbridgeError::Read(format!("{part}: {msg}")),
        other => other,
    }
}

fn read_optional_part(root: &Path, part: &str) -> Result<Option<Vec<u8>>> {
    let path = root.join(part);
    if !path.is_file() {
        return Ok(None);
    }
    fs::read(&path)
        .map(Some)
        .map_err(|e| CellbridgeError::read(part, e))
}

/// Worksheet part paths for each declaration via `xl/_rels/workbook.xml.rels`.
fn resolve_by_relationship(root: &Path, declarations: &[SheetDeclaration]) -> Result<Vec<String>> {
    let rels_xml = read_optional_part(root, WORKBOOK_RELS_PATH)?
        .ok_or_else(|| CellbridgeError::Read(format!("missing {WORKBOOK_RELS_PATH}")))?;
    let rels = Relationships::parse(&rels_xml)?;

    declarations
        .iter()
        .map(|declaration| {
            let id = declaration.rel_id.as_deref().ok_or_else(|| {
                CellbridgeError::Read(format!("sheet '{}' has no r:id", declaration.name))
            })?;
            let target = rels.get(id).ok_or_else(|| {
                CellbridgeError::Read(format!(
                    "sheet '{}' references unknown relationship {id}",
                    declaration.name
                ))
            })?;
            Ok(match target.strip_prefix('/') {
                Some(absolute) => absolute.to_string(),
                None => format!("xl/{target}"),
            })
        })
        .collect()
}

fn xml_events<'a>(
    xml: &'a [u8],
    part: &'static str,
) -> impl Iterator<Item = Result<XmlEvent>> + 'a {
    XmlEvents::new(xml).map(move |event| event.map_err(|e| CellbridgeError::read(part, e)))
}

/// Parse `xl/sharedStrings.xml` into the ordered list of strings.
///
/// Each `<si>` yields one entry. All of its `<t>` runs are concatenated, so
/// rich text (`<r><t>..</t></r>` runs) reads as its plain text; phonetic
/// guides (`<rPh>`) are not part of the displayed string and are skipped.
pub fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>> {
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut phonetic_depth = 0usize;

    for event in xml_events(xml, SHARED_STRINGS_PATH) {
        match event? {
            XmlEvent::Start { name, .. } => match name.as_str() {
                "si" => current = Some(String::new()),
                "rPh" => phonetic_depth += 1,
                "t" if current.is_some() && phonetic_depth == 0 => in_text = true,
                _ => {}
            },
            XmlEvent::Text(text) => {
                if let (true, Some(s)) = (in_text, current.as_mut()) {
                    s.push_str(&text);
                }
            }
            XmlEvent::End { name } => match name.as_str() {
                "t" => in_text = false,
                "rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                "si" => {
                    if let Some(s) = current.take() {
                        strings.push(s);
                    }
                }
                _ => {}
            },
        }
    }

    Ok(strings)
}

/// Parse the ordered sheet declarations out of `xl/workbook.xml`.
pub fn parse_workbook_sheets(xml: &[u8]) -> Result<Vec<SheetDeclaration>> {
    let mut sheets = Vec::new();
    let mut saw_root = false;
    let mut saw_sheets = false;

    for event in xml_events(xml, WORKBOOK_PATH) {
        let event = event?;
        if !saw_root {
            if !event.is_start("workbook") {
                return Err(CellbridgeError::Read(format!(
                    "{WORKBOOK_PATH}: root element is not <workbook>"
                )));
            }
            saw_root = true;
            continue;
        }
        if event.is_start("sheets") {
            saw_sheets = true;
        } else if event.is_start("sheet") {
            let name = event.attribute("name").ok_or_else(|| {
                CellbridgeError::Read(format!("{WORKBOOK_PATH}: <sheet> without a name"))
            })?;
            sheets.push(SheetDeclaration {
                name: name.to_string(),
                rel_id: event.attribute("r:id").map(str::to_string),
            });
        }
    }

    if !saw_sheets {
        return Err(CellbridgeError::Read(format!(
            "{WORKBOOK_PATH}: no <sheets> declaration"
        )));
    }
    Ok(sheets)
}

/// Cell being assembled while its element is open
struct PendingCell {
    address: CellAddress,
    kind: CellKind,
    value: Option<String>,
}

/// Parse one worksheet part.
///
/// Shared-string cells are resolved through `table`; every other cell keeps
/// its inner text verbatim. Cells without a value element are not created.
pub fn parse_worksheet(xml: &[u8], name: &str, table: &SharedStringTable) -> Result<Worksheet> {
    let mut sheet = Worksheet::new(name);
    let mut row: u32 = 0;
    let mut last_column: u32 = 0;
    let mut pending: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline = false;
    let mut in_text = false;
    let mut phonetic_depth = 0usize;

    for event in XmlEvents::new(xml) {
        let event = event.map_err(|e| CellbridgeError::read(format!("sheet '{name}'"), e))?;
        match &event {
            XmlEvent::Start { name: element, .. } => match element.as_str() {
                "row" => {
                    row = match event.attribute("r") {
                        Some(r) => r.parse().map_err(|_| {
                            CellbridgeError::Read(format!("sheet '{name}': invalid row number {r:?}"))
                        })?,
                        None => row + 1,
                    };
                    last_column = 0;
                }
                "c" => {
                    let address = match event.attribute("r") {
                        Some(r) => CellAddress::parse(r)
                            .map_err(|e| CellbridgeError::Read(format!("sheet '{name}': {e}")))?,
                        None => CellAddress::new(last_column + 1, row.max(1))
                            .map_err(|e| CellbridgeError::Read(format!("sheet '{name}': {e}")))?,
                    };
                    last_column = address.column();
                    pending = Some(PendingCell {
                        address,
                        kind: CellKind::from_type_attr(event.attribute("t")),
                        value: None,
                    });
                }
                "v" => {
                    in_value = true;
                    if let Some(cell) = pending.as_mut() {
                        cell.value.get_or_insert_with(String::new);
                    }
                }
                "is" => {
                    in_inline = true;
                    if let Some(cell) = pending.as_mut() {
                        cell.value.get_or_insert_with(String::new);
                    }
                }
                "rPh" if in_inline => phonetic_depth += 1,
                "t" if in_inline && phonetic_depth == 0 => in_text = true,
                _ => {}
            },
            XmlEvent::Text(text) => {
                if in_value || in_text {
                    if let Some(value) = pending.as_mut().and_then(|c| c.value.as_mut()) {
                        value.push_str(text);
                    }
                }
            }
            XmlEvent::End { name: element } => match element.as_str() {
                "v" => in_value = false,
                "t" => in_text = false,
                "rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                "is" => in_inline = false,
                "c" => {
                    if let Some(cell) = pending.take() {
                        store_cell(&mut sheet, cell, table)?;
                    }
                }
                _ => {}
            },
        }
    }

    Ok(sheet)
}

fn store_cell(sheet: &mut Worksheet, cell: PendingCell, table: &SharedStringTable) -> Result<()> {
    let Some(raw) = cell.value else {
        return Ok(());
    };

    if cell.kind == CellKind::SharedString {
        let location = format!("{}!{}", sheet.name(), cell.address);
        let index: usize = raw.trim().parse().map_err(|_| {
            CellbridgeError::Resolution(format!("{location}: invalid shared string index {raw:?}"))
        })?;
        let text = table.get(index).ok_or_else(|| {
            CellbridgeError::Resolution(format!(
                "{location}: index {index} out of range (table has {} entries)",
                table.len()
            ))
        })?;
        sheet.set_cell_with_kind(cell.address, text, CellKind::SharedString);
    } else {
        sheet.set_cell_with_kind(cell.address, raw, cell.kind);
    }
    Ok(())
}
