use crate::error::SheetTablesError;
use crate::spreadsheet::style::CellStyle;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::TimeDelta;
use std::fmt::Display;

const SECONDS_PER_DAY: f64 = 86_400.0;
/// Day count beyond which no serial maps to a representable date
const MAX_SERIAL_DAYS: f64 = 1e9;

/// How a numeric cell should be read, decided by its number format.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum NumberKind {
    /// Plain numeric values
    #[default]
    Number,
    /// Serial date/time values
    DateTime,
}

impl NumberKind {
    /// Parses built-in Excel number format IDs to determine the number kind.
    pub(crate) fn parse_builtin_number_format_id(id: u32) -> Option<Self> {
        match id {
            14..=22 | 45..=47 => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine the number kind.
    /// Analyzes format codes for date/time patterns, skipping literals, escapes and colour sections.
    pub(crate) fn parse_custom_number_format(format: &str) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' if !is_escaped => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_literal && !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_bracket && !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' | 'H' | 'h' | 'S' | 's' => return Self::DateTime,
                _ => (),
            }
        }
        Self::Number
    }

    /// Converts the raw `<v>` text of a numeric cell into a typed value.
    pub(crate) fn to_value(self, raw: &str, is_1904: bool) -> Result<CellValue, SheetTablesError> {
        match self {
            Self::Number => parse_number(raw),
            Self::DateTime => from_serial(raw.trim().parse::<f64>()?, is_1904),
        }
    }
}

/// Built-in number format codes by format id.
pub(crate) fn builtin_number_format(id: u32) -> Option<&'static str> {
    let code = match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        5 => "\"$\"#,##0_);(\"$\"#,##0)",
        6 => "\"$\"#,##0_);[Red](\"$\"#,##0)",
        7 => "\"$\"#,##0.00_);(\"$\"#,##0.00)",
        8 => "\"$\"#,##0.00_);[Red](\"$\"#,##0.00)",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0_);(#,##0)",
        38 => "#,##0_);[Red](#,##0)",
        39 => "#,##0.00_);(#,##0.00)",
        40 => "#,##0.00_);[Red](#,##0.00)",
        41 => "_(* #,##0_);_(* \\(#,##0\\);_(* \"-\"_);_(@_)",
        42 => "_(\"$\"* #,##0_);_(\"$\"* \\(#,##0\\);_(\"$\"* \"-\"_);_(@_)",
        43 => "_(* #,##0.00_);_(* \\(#,##0.00\\);_(* \"-\"??_);_(@_)",
        44 => "_(\"$\"* #,##0.00_)_(\"$\"* \\(#,##0.00\\)_(\"$\"* \"-\"??_)_(@_)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    };
    Some(code)
}

/// Parses a numeric literal:
/// a decimal point or exponent makes it a float, otherwise an integer.
fn parse_number(raw: &str) -> Result<CellValue, SheetTablesError> {
    let raw = raw.trim();
    if !raw.contains(['.', 'e', 'E']) {
        if let Ok(integer) = raw.parse::<i64>() {
            return Ok(CellValue::Integer(integer));
        }
    }
    Ok(CellValue::Float(raw.parse::<f64>()?))
}

/// Converts an Excel serial number to a date/time value.
/// Values within the first day become plain times; the 1900 system carries the Lotus 1-2-3 leap year bug.
/// Serials outside the calendar chrono can represent are an error, not a panic.
pub(crate) fn from_serial(serial: f64, is_1904: bool) -> Result<CellValue, SheetTablesError> {
    let out_of_range = || SheetTablesError::WithContextError(format!("serial date {} out of range", serial));
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return Err(out_of_range());
    }
    let days = serial.floor();
    let milliseconds = ((serial - days) * SECONDS_PER_DAY * 1_000.0).round() as i64;
    let fraction = TimeDelta::milliseconds(milliseconds);
    if (0.0..1.0).contains(&serial) && fraction < TimeDelta::days(1) {
        let time = NaiveTime::MIN + fraction;
        return Ok(CellValue::Time(time));
    }
    let offset = if is_1904 {
        1_462
    } else if (0.0..60.0).contains(&serial) {
        1
    } else {
        0
    };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| SheetTablesError::WithContextError("invalid serial date epoch".to_owned()))?;
    let datetime = (days as i64)
        .checked_add(offset)
        .and_then(TimeDelta::try_days)
        .and_then(|days| epoch.checked_add_signed(days))
        .and_then(|datetime| datetime.checked_add_signed(fraction))
        .ok_or_else(out_of_range)?;
    Ok(CellValue::DateTime(datetime))
}

/// Typed value of a worksheet cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    /// Shared, inline or formula string
    Text(String),
    /// Numeric literal without decimal point or exponent
    Integer(i64),
    /// Any other numeric literal
    Float(f64),
    /// Serial number under a date format
    DateTime(NaiveDateTime),
    /// Serial number under a date format within the first day
    Time(NaiveTime),
    /// Boolean cell
    Boolean(bool),
    /// Error literal such as `#N/A`
    Error(String),
}

impl CellValue {
    /// Returns true for integer and float values.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    /// Returns true for date-time and time values.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::DateTime(_) | Self::Time(_))
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) | Self::Error(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 => {
                write!(f, "{:.1}", value)
            }
            Self::Float(value) => write!(f, "{}", value),
            Self::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            Self::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
            Self::Boolean(true) => write!(f, "True"),
            Self::Boolean(false) => write!(f, "False"),
        }
    }
}

/// One cell of a worksheet: its value (if any) and its format record (if not the default).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetCell {
    pub value: Option<CellValue>,
    pub style: Option<CellStyle>,
}

impl SheetCell {
    /// Creates an unstyled cell holding a value.
    pub fn new(value: CellValue) -> Self {
        Self {
            value: Some(value),
            style: None,
        }
    }

    /// Creates an unstyled text cell.
    pub fn text(value: &str) -> Self {
        Self::new(CellValue::Text(value.to_owned()))
    }

    /// Attaches a format record.
    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Returns true if the cell has no value.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// String form of the value; absent values render as the literal `None`.
    pub fn text_value(&self) -> String {
        match &self.value {
            Some(value) => value.to_string(),
            None => "None".to_owned(),
        }
    }
}
