//! Conversions between A1-style references and zero-based indexes.

/// Converts column letters ("A", "AB") to a zero-based column index.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for character in letters.chars() {
        if !character.is_ascii_alphabetic() {
            return None;
        }
        let digit = (character.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// Converts a one-based row number ("12") to a zero-based row index.
pub(crate) fn row_to_index(digits: &str) -> Option<usize> {
    digits.parse::<usize>().ok().filter(|row| *row > 0).map(|row| row - 1)
}

/// Converts a zero-based column index to column letters.
pub(crate) fn index_to_col(col: usize) -> String {
    let mut column = col + 1;
    let mut letters = Vec::new();
    while column > 0 {
        column -= 1;
        letters.push((b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    letters.iter().rev().collect()
}

/// Splits a cell reference ("B12") into a zero-based (row, col) pair.
/// Absolute markers ("$B$12") are accepted.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.replace('$', "");
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    Some((row_to_index(digits)?, col_to_index(letters)?))
}

/// Converts a zero-based (row, col) pair to a cell reference ("B12").
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", index_to_col(col), row + 1)
}

/// Splits a range reference ("B2:C3") into zero-based (first_row, first_col, last_row, last_col).
/// A single cell reference is treated as a one-cell range.
pub(crate) fn range_to_index(range: &str) -> Option<(usize, usize, usize, usize)> {
    match range.split_once(':') {
        Some((start, end)) => {
            let (first_row, first_col) = reference_to_index(start)?;
            let (last_row, last_col) = reference_to_index(end)?;
            Some((first_row, first_col, last_row, last_col))
        }
        None => {
            let (row, col) = reference_to_index(range)?;
            Some((row, col, row, col))
        }
    }
}
