//! Per-cell attribute extraction.
use crate::spreadsheet::CellValue;
use crate::spreadsheet::SheetCell;
use crate::table::model::CellAttributes;
use crate::table::model::DataType;

/// Derives the attribute bundle of one cell.
///
/// Unstyled cells keep the defaults of [`CellAttributes`]; only their data
/// type is derived from the value.
///
/// # Arguments
/// * `cell` - Worksheet cell (value and optional format record)
///
/// # Returns
/// The complete attribute set written next to the cell texts
pub fn extract_attributes(cell: &SheetCell) -> CellAttributes {
    let mut attributes = CellAttributes {
        data_type: data_type(cell).code(),
        ..CellAttributes::default()
    };
    let Some(style) = &cell.style else {
        return attributes;
    };

    let font = &style.font;
    attributes.font_name = font.name.clone();
    attributes.font_size = font.size;
    attributes.bold = font.bold as u8;
    attributes.italic = font.italic as u8;
    attributes.font_color = font.has_non_black_color() as u8;
    attributes.background_color = style.fill.has_non_white_background() as u8;

    let alignment = &style.alignment;
    attributes.wrap_text = alignment.wrap_text;
    attributes.orientation = Some(alignment.text_rotation);
    attributes.horizontal_alignment = alignment.horizontal.map_or(0, |horizontal| horizontal.code());
    attributes.vertical_alignment = alignment.vertical.map_or(1, |vertical| vertical.code());

    let border = &style.border;
    attributes.left_border = border.left.is_some() as u8;
    attributes.top_border = border.top.is_some() as u8;
    attributes.bottom_border = border.bottom.is_some() as u8;
    attributes.right_border = border.right.is_some() as u8;

    attributes.number_format = style.number_format.clone();
    attributes
}

/// Classifies the value of a cell.
/// Numbers are split by the characters of their rendered value only; the
/// number format is reported separately as `NS`.
pub fn data_type(cell: &SheetCell) -> DataType {
    match &cell.value {
        Some(CellValue::Text(_)) => DataType::Text,
        Some(value) if value.is_temporal() => DataType::Date,
        Some(value) if value.is_number() => {
            let text = value.to_string();
            if text.contains('%') {
                DataType::Percentage
            } else if text.contains('$') {
                DataType::Currency
            } else {
                DataType::Number
            }
        }
        _ => DataType::Unknown,
    }
}
