//! Format records attached to worksheet cells.
//!
//! Only the subset of formatting the table engine consumes is kept:
//! font, fill, border presence, alignment and the number format code.

/// Colour reference as declared in the workbook.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    /// Explicit ARGB/RGB hex value
    Rgb(String),
    /// Theme palette slot
    Theme(u32),
    /// Legacy indexed palette slot
    Indexed(u32),
    /// System automatic colour
    Auto,
}

impl Color {
    /// Returns true when the colour is an explicit rgb value equal to one of `defaults`.
    /// The alpha channel of an ARGB value is ignored.
    fn is_rgb_one_of(&self, defaults: &[&str]) -> bool {
        match self {
            Self::Rgb(value) => {
                let rgb = match value.len() {
                    8 => value.get(2..).unwrap_or(value),
                    _ => value.as_str(),
                };
                defaults.iter().any(|default| rgb.eq_ignore_ascii_case(default))
            }
            _ => false,
        }
    }
}

/// Font record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Font {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Color>,
}

impl Font {
    /// True when the font declares an explicit rgb colour other than black.
    pub fn has_non_black_color(&self) -> bool {
        matches!(&self.color, Some(color @ Color::Rgb(_)) if !color.is_rgb_one_of(&["000000"]))
    }
}

/// Fill record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fill {
    /// Pattern type (`solid`, `gray125`, `none`, ...)
    pub pattern: Option<String>,
    pub foreground: Option<Color>,
}

impl Fill {
    /// True when the fill is solid with an explicit rgb colour other than white.
    pub fn has_non_white_background(&self) -> bool {
        self.pattern.as_deref() == Some("solid")
            && matches!(&self.foreground, Some(color @ Color::Rgb(_)) if !color.is_rgb_one_of(&["FFFFFF"]))
    }
}

/// Border record; each side holds its line style when one is declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Border {
    pub left: Option<String>,
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub right: Option<String>,
}

/// Horizontal alignment values of the OOXML `ST_HorizontalAlignment` type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HorizontalAlignment {
    Center,
    CenterContinuous,
    Distributed,
    Fill,
    General,
    Justify,
    Left,
    Right,
}

impl HorizontalAlignment {
    /// Parses the attribute value; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "center" => Some(Self::Center),
            "centerContinuous" => Some(Self::CenterContinuous),
            "distributed" => Some(Self::Distributed),
            "fill" => Some(Self::Fill),
            "general" => Some(Self::General),
            "justify" => Some(Self::Justify),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Numeric code used in the table records.
    pub const fn code(&self) -> u8 {
        match self {
            Self::Center => 0,
            Self::CenterContinuous => 1,
            Self::Distributed => 2,
            Self::Fill => 3,
            Self::General => 4,
            Self::Justify => 5,
            Self::Left => 6,
            Self::Right => 7,
        }
    }
}

/// Vertical alignment values of the OOXML `ST_VerticalAlignment` type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
    Justify,
    Distributed,
}

impl VerticalAlignment {
    /// Parses the attribute value; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "center" => Some(Self::Center),
            "bottom" => Some(Self::Bottom),
            "justify" => Some(Self::Justify),
            "distributed" => Some(Self::Distributed),
            _ => None,
        }
    }

    /// Numeric code used in the table records.
    pub const fn code(&self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Center => 1,
            Self::Bottom => 2,
            Self::Justify => 3,
            Self::Distributed => 4,
        }
    }
}

/// Alignment record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Alignment {
    pub horizontal: Option<HorizontalAlignment>,
    pub vertical: Option<VerticalAlignment>,
    pub wrap_text: Option<bool>,
    pub text_rotation: i32,
}

/// Complete format record of a cell (one `cellXfs` entry resolved).
#[derive(Clone, Debug, PartialEq)]
pub struct CellStyle {
    pub font: Font,
    pub fill: Fill,
    pub border: Border,
    pub alignment: Alignment,
    pub number_format: String,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            font: Font::default(),
            fill: Fill::default(),
            border: Border::default(),
            alignment: Alignment::default(),
            number_format: "General".to_owned(),
        }
    }
}

impl CellStyle {
    /// Shorthand for a style whose only declared attribute is a bold font.
    pub fn bold() -> Self {
        let mut style = Self::default();
        style.font.bold = true;
        style
    }
}
