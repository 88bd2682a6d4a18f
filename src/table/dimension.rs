//! Range address recalculation.
use regex::Regex;
use std::sync::LazyLock;

/// Cell reference bound: column letters followed by a row number
static BOUND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)").expect("Hardcode regex pattern"));

/// Rewrites the end row of an A1 range ("A1:D148") so the range spans `row_count` rows.
///
/// Start row and both column letters are kept. A range that cannot be parsed is
/// returned unchanged.
pub fn recalculate_dimensions(original: &str, row_count: usize) -> String {
    let Some((start, end)) = original.split_once(':') else {
        return original.to_owned();
    };
    let (Some(start), Some(end)) = (BOUND.captures(start), BOUND.captures(end)) else {
        return original.to_owned();
    };
    let Ok(start_row) = start[2].parse::<usize>() else {
        return original.to_owned();
    };
    let end_row = (start_row + row_count).saturating_sub(1).max(start_row);
    format!("{}{}:{}{}", &start[1], start_row, &end[1], end_row)
}
