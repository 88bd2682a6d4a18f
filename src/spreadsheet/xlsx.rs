use crate::error::ResultMessage;
use crate::error::SheetTablesError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::builtin_number_format;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::cell::NumberKind;
use crate::spreadsheet::cell::SheetCell;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Worksheet;
use crate::spreadsheet::style::Alignment;
use crate::spreadsheet::style::Border;
use crate::spreadsheet::style::CellStyle;
use crate::spreadsheet::style::Color;
use crate::spreadsheet::style::Fill;
use crate::spreadsheet::style::Font;
use crate::spreadsheet::style::HorizontalAlignment;
use crate::spreadsheet::style::VerticalAlignment;
use crate::spreadsheet::SpreadsheetError;
use crate::spreadsheet::Workbook;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts"); // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");   // Individual custom number format
const TAG_FONTS: QName = QName(b"fonts");             // Font records container
const TAG_FONT: QName = QName(b"font");               // Individual font record
const TAG_FILLS: QName = QName(b"fills");             // Fill records container
const TAG_FILL: QName = QName(b"fill");               // Individual fill record
const TAG_PATTERN_FILL: QName = QName(b"patternFill"); // Pattern of a fill
const TAG_FOREGROUND_COLOR: QName = QName(b"fgColor"); // Foreground colour of a pattern
const TAG_BORDERS: QName = QName(b"borders");         // Border records container
const TAG_BORDER: QName = QName(b"border");           // Individual border record
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");  // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");         // Individual cell format index
const TAG_ALIGNMENT: QName = QName(b"alignment");     // Alignment of a cell format
const TAG_PROTECTION: QName = QName(b"protection");   // Protection of a cell format
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr"); // Workbook properties
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content
const TAG_MERGE_CELL: QName = QName(b"mergeCell");    // Merged range in worksheet

/// Cell value types declared by the `t` attribute of a `<c>` element
#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum ValueType {
    #[default]
    Number,
    SharedString,
    InlineString,
    IsoDateTime,
    Boolean,
    Error,
}

impl ValueType {
    fn parse(t: &str) -> Self {
        match t {
            "inlineStr" | "str" => Self::InlineString,
            "s" => Self::SharedString,
            "d" => Self::IsoDateTime,
            "b" => Self::Boolean,
            "e" => Self::Error,
            _ => Self::Number,
        }
    }
}

/// One resolved `cellXfs` entry
#[derive(Clone, Debug, Default)]
struct FormatRecord {
    /// None when the entry is the workbook default (the cell counts as unstyled)
    style: Option<CellStyle>,
    /// How numeric values under this format are read
    number_kind: NumberKind,
}

/// Raw `xf` attributes before resolution against the font/fill/border tables
#[derive(Clone, Debug, Default)]
struct FormatIndex {
    number_format_id: u32,
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    style_id: usize,
    alignment: Alignment,
    has_protection: bool,
}

impl FormatIndex {
    fn is_default(&self) -> bool {
        self.number_format_id == 0
            && self.font_id == 0
            && self.fill_id == 0
            && self.border_id == 0
            && self.style_id == 0
            && self.alignment == Alignment::default()
            && !self.has_protection
    }
}

/// Which `styles.xml` container the parser is currently inside
#[derive(Copy, Clone, Debug, PartialEq)]
enum StyleSection {
    Outside,
    CustomFormats,
    Fonts,
    Fills,
    Borders,
    FormatIndexes,
}

/// Represents an Excel XLSX (Office Open XML) workbook
pub struct XlsxWorkbook<RS: Read + Seek> {
    /// File name of the workbook
    name: String,
    /// ZIP archive containing the XLSX package
    zip: ZipArchive<RS>,
    /// Worksheets as (name, zip_path) pairs, in workbook order
    sheets: Vec<(String, String)>,
    /// Shared string table
    shared_strings: Vec<String>,
    /// Resolved cell formats indexed by style ID
    formats: Vec<FormatRecord>,
    /// Whether serial dates use the 1904 system
    is_1904: bool,
}

impl XlsxWorkbook<BufReader<File>> {
    /// Opens an XLSX workbook file and parses its structure
    ///
    /// # Arguments
    /// * `file_name` - Path to the XLSX file
    ///
    /// # Returns
    /// Result containing the initialized workbook or an error
    pub fn open(file_name: &str) -> Result<Self, SheetTablesError> {
        let reader = BufReader::new(File::open(file_name)?);
        Self::from_reader(file_name, reader)
    }
}

impl<RS: Read + Seek> XlsxWorkbook<RS> {
    /// Parses an XLSX package from any seekable reader (file or in-memory buffer)
    pub fn from_reader(name: &str, reader: RS) -> Result<Self, SheetTablesError> {
        let mut zip = ZipArchive::new(reader)?;
        let (sheets, is_1904) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?
        }
        let shared_strings = load_shared_strings(&mut zip).with_prefix("xl/sharedStrings.xml")?;
        let formats = load_styles(&mut zip).with_prefix("xl/styles.xml")?;
        Ok(XlsxWorkbook {
            name: name.to_owned(),
            zip,
            sheets,
            shared_strings,
            formats,
            is_1904,
        })
    }
}

impl<RS: Read + Seek> Workbook for XlsxWorkbook<RS> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    /// Reads one worksheet: its cells (values and formats) and merged ranges
    fn worksheet(&mut self, sheet_name: &str) -> Result<Worksheet, SheetTablesError> {
        let zip_path = self.sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, path)| path.to_owned())
            .ok_or_else(|| SpreadsheetError::SheetNotFound(sheet_name.to_owned()))?;

        let mut sheet = Worksheet::new(sheet_name);
        let mut merged_ranges = Vec::<String>::new();
        let mut next_row = 0usize;
        let mut next_col = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = ValueType::default();
        let mut format_id = 0usize;
        let mut value = None::<String>;
        let mut reader = self.zip.xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                row = event.parse_attribute_value::<usize>("r")?
                    .and_then(|r| r.checked_sub(1))
                    .unwrap_or(next_row);
                next_row = row + 1;
                next_col = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event.get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row, next_col));
                next_col = col + 1;
                kind = event.get_attribute_value("t")?
                    .map(|t| ValueType::parse(&t))
                    .unwrap_or_default();
                format_id = event.parse_attribute_value::<usize>("s")?.unwrap_or(0);
                value = None;
            }
            Event::Start(event) if event.name() == TAG_INLINE_STRING => {
                value = Some(read_string_value(&mut reader, TAG_INLINE_STRING, false)?);
            }
            Event::Start(event) if event.name() == TAG_VALUE => {
                value = Some(read_string_value(&mut reader, TAG_VALUE, true)?);
            }
            Event::End(event) if event.name() == TAG_CELL => {
                let format = self.formats.get(format_id).cloned().unwrap_or_default();
                let cell = SheetCell {
                    value: to_cell_value(kind, value.take(), format.number_kind, &self.shared_strings, self.is_1904)?,
                    style: format.style,
                };
                sheet.push(row, col, cell);
            }
            Event::Start(event) if event.name() == TAG_MERGE_CELL => {
                merged_ranges.extend(event.get_attribute_string("ref")?);
            }
        });

        for range in &merged_ranges {
            sheet.merge(range);
        }
        Ok(sheet)
    }
}

/// Converts the raw text of a `<c>` element into a typed value
fn to_cell_value(
    kind: ValueType,
    value: Option<String>,
    number_kind: NumberKind,
    shared_strings: &[String],
    is_1904: bool,
) -> Result<Option<CellValue>, SheetTablesError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = match kind {
        ValueType::InlineString => CellValue::Text(value),
        ValueType::SharedString => {
            let index = value.trim().parse::<usize>()?;
            let string = shared_strings
                .get(index)
                .ok_or(SpreadsheetError::SharedStringIndexError(index))?;
            CellValue::Text(string.to_owned())
        }
        _ if value.trim().is_empty() => return Ok(None),
        ValueType::Boolean => CellValue::Boolean(value.trim() == "1" || value.trim().eq_ignore_ascii_case("true")),
        ValueType::Error => CellValue::Error(value),
        ValueType::IsoDateTime => parse_iso_datetime(&value)?,
        ValueType::Number => number_kind.to_value(&value, is_1904)?,
    };
    Ok(Some(value))
}

/// Parses an ISO 8601 date or date-time literal (`t="d"` cells)
fn parse_iso_datetime(value: &str) -> Result<CellValue, SheetTablesError> {
    let value = value.trim().trim_end_matches('Z');
    let datetime = if value.contains('T') {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    };
    datetime
        .map(CellValue::DateTime)
        .ok_or_else(|| SpreadsheetError::CellValueError(value.to_owned()).into())
}

/// Loads workbook structure and worksheet information from XLSX file
///
/// Parses the workbook.xml file to extract worksheet names and their corresponding
/// XML file paths, and determines the date system (1900 vs 1904) used in the file.
///
/// # Returns
/// Tuple of (worksheets, is_1904_date_system) where worksheets are (name, zip_path) pairs
fn load_workbook<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<(Vec<(String, String)>, bool), SheetTablesError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.unescape_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.unescape_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_flag("date1904")?.unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Loads the whole shared string table; a missing part yields an empty table
fn load_shared_strings<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<Vec<String>, SheetTablesError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
            shared_strings.push(string);
        }
    });
    Ok(shared_strings)
}

/// Loads number formats, fonts, fills, borders and cell format indexes from styles.xml
///
/// # Returns
/// Vector of resolved formats indexed by style ID
fn load_styles<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<Vec<FormatRecord>, SheetTablesError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut section = StyleSection::Outside;
    let mut custom_formats = HashMap::<u32, String>::new();
    let mut fonts = Vec::<Font>::new();
    let mut fills = Vec::<Fill>::new();
    let mut borders = Vec::<Border>::new();
    let mut format_indexes = Vec::<FormatIndex>::new();

    let mut font = Font::default();
    let mut fill = Fill::default();
    let mut border = Border::default();
    let mut format_index = FormatIndex::default();

    match_xml_events!(reader => {
        Event::Start(event) if section == StyleSection::Outside => {
            section = match event.name() {
                TAG_CUSTOM_FORMATS => StyleSection::CustomFormats,
                TAG_FONTS => StyleSection::Fonts,
                TAG_FILLS => StyleSection::Fills,
                TAG_BORDERS => StyleSection::Borders,
                TAG_FORMAT_INDEXES => StyleSection::FormatIndexes,
                _ => StyleSection::Outside,
            };
        }
        Event::End(event) if is_section_end(section, event.name()) => section = StyleSection::Outside,

        Event::Start(event) if section == StyleSection::CustomFormats && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.parse_attribute_value::<u32>("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                custom_formats.insert(id, format.to_string());
            }
        }

        Event::Start(event) if section == StyleSection::Fonts => match event.name() {
            TAG_FONT => font = Font::default(),
            QName(b"b") => font.bold = event.get_attribute_flag("val")?.unwrap_or(true),
            QName(b"i") => font.italic = event.get_attribute_flag("val")?.unwrap_or(true),
            QName(b"sz") => font.size = event.parse_attribute_value::<f64>("val")?,
            QName(b"name") => font.name = event.get_attribute_string("val")?,
            QName(b"color") => font.color = parse_color(&event)?,
            _ => (),
        },
        Event::End(event) if section == StyleSection::Fonts && event.name() == TAG_FONT => {
            fonts.push(std::mem::take(&mut font));
        }

        Event::Start(event) if section == StyleSection::Fills => match event.name() {
            TAG_FILL => fill = Fill::default(),
            TAG_PATTERN_FILL => fill.pattern = event.get_attribute_string("patternType")?,
            TAG_FOREGROUND_COLOR => fill.foreground = parse_color(&event)?,
            _ => (),
        },
        Event::End(event) if section == StyleSection::Fills && event.name() == TAG_FILL => {
            fills.push(std::mem::take(&mut fill));
        }

        Event::Start(event) if section == StyleSection::Borders => {
            let style = || -> Result<Option<String>, SheetTablesError> {
                Ok(event.get_attribute_string("style")?.filter(|style| style != "none"))
            };
            match event.name() {
                TAG_BORDER => border = Border::default(),
                QName(b"left") | QName(b"start") => border.left = style()?,
                QName(b"right") | QName(b"end") => border.right = style()?,
                QName(b"top") => border.top = style()?,
                QName(b"bottom") => border.bottom = style()?,
                _ => (),
            }
        }
        Event::End(event) if section == StyleSection::Borders && event.name() == TAG_BORDER => {
            borders.push(std::mem::take(&mut border));
        }

        Event::Start(event) if section == StyleSection::FormatIndexes => match event.name() {
            TAG_FORMAT_INDEX => {
                format_index = FormatIndex {
                    number_format_id: event.parse_attribute_value("numFmtId")?.unwrap_or(0),
                    font_id: event.parse_attribute_value("fontId")?.unwrap_or(0),
                    fill_id: event.parse_attribute_value("fillId")?.unwrap_or(0),
                    border_id: event.parse_attribute_value("borderId")?.unwrap_or(0),
                    style_id: event.parse_attribute_value("xfId")?.unwrap_or(0),
                    ..FormatIndex::default()
                };
            }
            TAG_ALIGNMENT => format_index.alignment = parse_alignment(&event)?,
            TAG_PROTECTION => format_index.has_protection = true,
            _ => (),
        },
        Event::End(event) if section == StyleSection::FormatIndexes && event.name() == TAG_FORMAT_INDEX => {
            format_indexes.push(std::mem::take(&mut format_index));
        }
    });

    let formats = format_indexes
        .into_iter()
        .map(|index| resolve_format(index, &custom_formats, &fonts, &fills, &borders))
        .collect();
    Ok(formats)
}

fn is_section_end(section: StyleSection, name: QName) -> bool {
    match section {
        StyleSection::Outside => false,
        StyleSection::CustomFormats => name == TAG_CUSTOM_FORMATS,
        StyleSection::Fonts => name == TAG_FONTS,
        StyleSection::Fills => name == TAG_FILLS,
        StyleSection::Borders => name == TAG_BORDERS,
        StyleSection::FormatIndexes => name == TAG_FORMAT_INDEXES,
    }
}

/// Resolves one `xf` entry against the font/fill/border tables and number formats
fn resolve_format(
    index: FormatIndex,
    custom_formats: &HashMap<u32, String>,
    fonts: &[Font],
    fills: &[Fill],
    borders: &[Border],
) -> FormatRecord {
    let id = index.number_format_id;
    let (number_format, number_kind) = match custom_formats.get(&id) {
        Some(format) => (format.to_owned(), NumberKind::parse_custom_number_format(format)),
        None => (
            builtin_number_format(id).unwrap_or("General").to_owned(),
            NumberKind::parse_builtin_number_format_id(id).unwrap_or_default(),
        ),
    };
    let style = if index.is_default() {
        None
    } else {
        Some(CellStyle {
            font: fonts.get(index.font_id).cloned().unwrap_or_default(),
            fill: fills.get(index.fill_id).cloned().unwrap_or_default(),
            border: borders.get(index.border_id).cloned().unwrap_or_default(),
            alignment: index.alignment,
            number_format,
        })
    };
    FormatRecord { style, number_kind }
}

/// Reads a colour element (`color`, `fgColor`)
fn parse_color(event: &BytesStart) -> Result<Option<Color>, SheetTablesError> {
    let color = if let Some(rgb) = event.get_attribute_value("rgb")? {
        Some(Color::Rgb(rgb.to_string()))
    } else if let Some(theme) = event.parse_attribute_value::<u32>("theme")? {
        Some(Color::Theme(theme))
    } else if let Some(indexed) = event.parse_attribute_value::<u32>("indexed")? {
        Some(Color::Indexed(indexed))
    } else if event.get_attribute_flag("auto")?.unwrap_or(false) {
        Some(Color::Auto)
    } else {
        None
    };
    Ok(color)
}

/// Reads an `alignment` element of a cell format
fn parse_alignment(event: &BytesStart) -> Result<Alignment, SheetTablesError> {
    Ok(Alignment {
        horizontal: event.get_attribute_value("horizontal")?.and_then(|value| HorizontalAlignment::parse(&value)),
        vertical: event.get_attribute_value("vertical")?.and_then(|value| VerticalAlignment::parse(&value)),
        wrap_text: event.get_attribute_flag("wrapText")?,
        text_rotation: event.parse_attribute_value("textRotation")?.unwrap_or(0),
    })
}

/// Reads string value from XML content, handling text and CDATA sections
///
/// Extracts string content from XML elements, skipping phonetic text annotations
/// and properly handling both text nodes and CDATA sections.
///
/// # Arguments
/// * `reader` - XML reader positioned at the start of the string content
/// * `end_tag` - XML tag that marks the end of the string content
/// * `is_text_content` - Whether to treat the content as text by default
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, SheetTablesError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        event @ (Event::Text(_) | Event::CData(_) | Event::GeneralRef(_)) if is_text => text.push_event_text(&event)?,
    });
    Ok(text)
}
