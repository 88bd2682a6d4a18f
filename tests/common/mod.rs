//! In-memory `.xlsx` packages for the integration tests.
#![allow(dead_code)]

use sheet_tables::spreadsheet::XlsxWorkbook;
use std::io::Cursor;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const MAIN_NAMESPACE: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NAMESPACE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Style ids of [`STYLES`]
pub const BOLD: usize = 1;
pub const BOLD_WRAPPED: usize = 2;
pub const DATE: usize = 3;
pub const PERCENT: usize = 4;
pub const CURRENCY: usize = 5;
pub const DECORATED: usize = 6;

/// Cell formats: default, bold, bold + wrap, date, percent, currency, and a
/// coloured/bordered/rotated format.
pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1"><numFmt numFmtId="164" formatCode="&quot;$&quot;#,##0.00"/></numFmts>
  <fonts count="3">
    <font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/></font>
    <font><b/></font>
    <font><i/><sz val="9"/><color rgb="FFFF0000"/><name val="Arial"/></font>
  </fonts>
  <fills count="3">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FFD9D9D9"/><bgColor indexed="64"/></patternFill></fill>
  </fills>
  <borders count="2">
    <border><left/><right/><top/><bottom/><diagonal/></border>
    <border><left style="thin"><color auto="1"/></left><right/><top style="thin"/><bottom style="medium"/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="7">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>
    <xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"><alignment wrapText="1"/></xf>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
    <xf numFmtId="10" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
    <xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
    <xf numFmtId="0" fontId="2" fillId="2" borderId="1" xfId="0"><alignment horizontal="right" vertical="top" textRotation="45"/></xf>
  </cellXfs>
  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
  <dxfs count="1"><dxf><font><b/><color rgb="FF9C0006"/></font></dxf></dxfs>
</styleSheet>"#;

/// Worksheet contents written as `<sheetData>` rows plus merged ranges.
pub struct SheetXml {
    name: String,
    rows: String,
    merges: Vec<String>,
}

impl SheetXml {
    pub fn new(name: &str) -> Self {
        SheetXml {
            name: name.to_owned(),
            rows: String::new(),
            merges: Vec::new(),
        }
    }

    /// Appends a `<row>` from texts starting at column A.
    ///
    /// "" leaves the position out, texts that parse as numbers become numeric
    /// cells, and a leading `*` makes the cell bold.
    pub fn row(mut self, row: usize, values: &[&str]) -> Self {
        let mut cells = String::new();
        for (col, value) in values.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let (value, style) = match value.strip_prefix('*') {
                Some(value) => (value, BOLD),
                None => (*value, 0),
            };
            cells.push_str(&cell_xml(row, col, value, style));
        }
        self.raw_row(row, &cells)
    }

    /// Appends a `<row>` with hand-written `<c>` elements.
    pub fn raw_row(mut self, row: usize, cells: &str) -> Self {
        self.rows.push_str(&format!(r#"<row r="{}">{}</row>"#, row + 1, cells));
        self
    }

    pub fn merge(mut self, range: &str) -> Self {
        self.merges.push(range.to_owned());
        self
    }

    fn to_xml(&self) -> String {
        let merges = if self.merges.is_empty() {
            String::new()
        } else {
            let cells: String = self.merges.iter().map(|range| format!(r#"<mergeCell ref="{}"/>"#, range)).collect();
            format!(r#"<mergeCells count="{}">{}</mergeCells>"#, self.merges.len(), cells)
        };
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{}"><sheetData>{}</sheetData>{}</worksheet>"#,
            MAIN_NAMESPACE, self.rows, merges
        )
    }
}

/// One `<c>` element: numeric when the text parses as a number, inline string otherwise.
pub fn cell_xml(row: usize, col: usize, value: &str, style: usize) -> String {
    let reference = format!("{}{}", column_name(col), row + 1);
    let style = if style == 0 { String::new() } else { format!(r#" s="{}""#, style) };
    if value.parse::<f64>().is_ok() {
        format!(r#"<c r="{}"{}><v>{}</v></c>"#, reference, style, value)
    } else {
        format!(r#"<c r="{}"{} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#, reference, style, escape(value))
    }
}

fn column_name(col: usize) -> String {
    let mut col = col + 1;
    let mut name = Vec::new();
    while col > 0 {
        let remainder = (col - 1) % 26;
        name.push(b'A' + remainder as u8);
        col = (col - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Builds a whole package: workbook, relationships, styles, shared strings and sheets.
pub struct Package {
    sheets: Vec<SheetXml>,
    /// Raw `<si>` items
    shared_strings: Vec<String>,
    date1904: bool,
}

impl Package {
    pub fn new() -> Self {
        Package {
            sheets: Vec::new(),
            shared_strings: Vec::new(),
            date1904: false,
        }
    }

    pub fn sheet(mut self, sheet: SheetXml) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Appends plain shared strings.
    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        for string in strings {
            self.shared_strings.push(format!("<si><t>{}</t></si>", escape(string)));
        }
        self
    }

    /// Appends a hand-written `<si>` item (rich text runs, phonetic runs).
    pub fn raw_shared_string(mut self, item: &str) -> Self {
        self.shared_strings.push(item.to_owned());
        self
    }

    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut entries = Vec::<(String, String)>::new();

        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(index, sheet)| {
                format!(r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#, sheet.name, index + 1, index + 1)
            })
            .collect();
        let properties = if self.date1904 { r#"<workbookPr date1904="1"/>"# } else { "<workbookPr/>" };
        entries.push((
            "xl/workbook.xml".to_owned(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{}" xmlns:r="{}">{}<sheets>{}</sheets></workbook>"#,
                MAIN_NAMESPACE, RELATIONSHIP_NAMESPACE, properties, sheets
            ),
        ));

        let mut relationships: String = (0..self.sheets.len())
            .map(|index| {
                format!(
                    r#"<Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    index + 1,
                    RELATIONSHIP_NAMESPACE,
                    index + 1
                )
            })
            .collect();
        relationships.push_str(&format!(
            r#"<Relationship Id="rIdStyles" Type="{}/styles" Target="styles.xml"/>"#,
            RELATIONSHIP_NAMESPACE
        ));
        entries.push((
            "xl/_rels/workbook.xml.rels".to_owned(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                relationships
            ),
        ));

        entries.push(("xl/styles.xml".to_owned(), STYLES.to_owned()));
        if !self.shared_strings.is_empty() {
            let items = self.shared_strings.concat();
            entries.push((
                "xl/sharedStrings.xml".to_owned(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="{}" count="{}" uniqueCount="{}">{}</sst>"#,
                    MAIN_NAMESPACE,
                    self.shared_strings.len(),
                    self.shared_strings.len(),
                    items
                ),
            ));
        }
        for (index, sheet) in self.sheets.iter().enumerate() {
            entries.push((format!("xl/worksheets/sheet{}.xml", index + 1), sheet.to_xml()));
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub fn open(&self, name: &str) -> XlsxWorkbook<Cursor<Vec<u8>>> {
        XlsxWorkbook::from_reader(name, Cursor::new(self.to_bytes())).unwrap()
    }
}
