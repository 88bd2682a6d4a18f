//! Event-level helpers shared by the workbook part loaders
//! (relationships, shared strings, styles and worksheets).

use crate::error::SheetTablesError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Unknown entity '&{0};'")]
    UnknownEntity(String),

    #[error("Attribute '{name}' has invalid value '{value}'")]
    InvalidAttribute { name: String, value: String },
}

/// Pull reader over one package part.
/// Empty elements come back as start/end pairs and text is left untrimmed,
/// so `<b/>` and `<t xml:space="preserve"> </t>` need no special cases.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        let buffer = Vec::with_capacity(1024);
        XmlReader { reader, buffer }
    }

    /// Reads the next event, or `None` at the end of the part.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, SheetTablesError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(SheetTablesError::XmlError(error)),
        }
    }
}

/// Attribute access on start tags.
pub(crate) trait XmlNodeHelper<'a> {
    /// Unescaped attribute value, borrowed where possible.
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetTablesError>;

    /// Unescaped attribute value as an owned string.
    fn get_attribute_string(&'a self, name: &str) -> Result<Option<String>, SheetTablesError>;

    /// Attribute value parsed with `FromStr`; a value that does not parse is an error.
    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, SheetTablesError>;

    /// OOXML boolean attribute: "1" and "true" are set, anything else is clear.
    fn get_attribute_flag(&'a self, name: &str) -> Result<Option<bool>, SheetTablesError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetTablesError> {
        match self.try_get_attribute(name)? {
            Some(attribute) => Ok(Some(attribute.unescape_value()?)),
            None => Ok(None),
        }
    }

    fn get_attribute_string(&'a self, name: &str) -> Result<Option<String>, SheetTablesError> {
        Ok(self.get_attribute_value(name)?.map(Cow::into_owned))
    }

    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, SheetTablesError> {
        let Some(value) = self.get_attribute_value(name)? else {
            return Ok(None);
        };
        match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(XmlError::InvalidAttribute {
                name: name.to_owned(),
                value: value.into_owned(),
            })?,
        }
    }

    fn get_attribute_flag(&'a self, name: &str) -> Result<Option<bool>, SheetTablesError> {
        Ok(self.get_attribute_value(name)?
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true")))
    }
}

/// Collects character data while walking a part.
pub(crate) trait XmlTextContextHelper {
    /// Appends the text carried by a text, CDATA or reference event.
    /// Any other event is ignored.
    fn push_event_text(&mut self, event: &Event) -> Result<(), SheetTablesError>;
}

impl XmlTextContextHelper for String {
    fn push_event_text(&mut self, event: &Event) -> Result<(), SheetTablesError> {
        match event {
            Event::Text(text) => self.push_str(&text.xml_content()?),
            Event::CData(data) => self.push_str(&data.xml_content()?),
            Event::GeneralRef(reference) => push_reference(self, reference)?,
            _ => (),
        }
        Ok(())
    }
}

/// Resolves `&#160;`, `&#x41;` and the predefined entities.
/// Character references outside the Unicode range are dropped.
fn push_reference(text: &mut String, reference: &BytesRef) -> Result<(), SheetTablesError> {
    let raw = reference.xml_content()?;
    let Some(number) = raw.strip_prefix('#') else {
        let entity = resolve_xml_entity(&raw).ok_or_else(|| XmlError::UnknownEntity(raw.to_string()))?;
        text.push_str(entity);
        return Ok(());
    };
    let code = match number.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16)?,
        None => number.parse::<u32>()?,
    };
    text.extend(char::from_u32(code));
    Ok(())
}

#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_xml_events;
    use quick_xml::name::QName;

    fn collect_text(xml: &str) -> Result<String, SheetTablesError> {
        let mut reader = XmlReader::new(xml.as_bytes());
        let mut text = String::new();
        match_xml_events!(reader => {
            event @ (Event::Text(_) | Event::CData(_) | Event::GeneralRef(_)) => text.push_event_text(&event)?,
        });
        Ok(text)
    }

    #[test]
    fn resolves_character_references() {
        assert_eq!(collect_text("<t>a&#160;b&#x41;&amp;</t>").unwrap(), "a\u{a0}bA&");
        assert_eq!(collect_text("<t><![CDATA[R&D]]> plan</t>").unwrap(), "R&D plan");
    }

    #[test]
    fn rejects_unknown_entities() {
        let error = collect_text("<t>&bogus;</t>").unwrap_err();
        assert_eq!(error.to_string(), "Unknown entity '&bogus;'");
    }

    #[test]
    fn reads_attributes_from_expanded_empty_elements() -> Result<(), SheetTablesError> {
        let mut reader = XmlReader::new(r#"<root><b val="0"/><i/><sz val="11.5"/><name val="Times &amp; Co"/></root>"#.as_bytes());
        let mut flags = Vec::new();
        let mut size = None;
        let mut name = None;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == QName(b"b") || event.name() == QName(b"i") => {
                flags.push(event.get_attribute_flag("val")?);
            }
            Event::Start(event) if event.name() == QName(b"sz") => {
                size = event.parse_attribute_value::<f64>("val")?;
            }
            Event::Start(event) if event.name() == QName(b"name") => {
                name = event.get_attribute_string("val")?;
            }
        });
        assert_eq!(flags, vec![Some(false), None]);
        assert_eq!(size, Some(11.5));
        assert_eq!(name.as_deref(), Some("Times & Co"));
        Ok(())
    }

    #[test]
    fn invalid_attribute_values_name_the_attribute() -> Result<(), SheetTablesError> {
        let mut reader = XmlReader::new(r#"<c r="A1" s="bold"/>"#.as_bytes());
        let mut errors = Vec::new();
        match_xml_events!(reader => {
            Event::Start(event) => errors.push(event.parse_attribute_value::<usize>("s").unwrap_err().to_string()),
        });
        assert_eq!(errors, vec!["Attribute 's' has invalid value 'bold'"]);
        Ok(())
    }
}
