//! Header tree induction.
//!
//! Both trees hang off a (-1, -1) root and hold table coordinates. The top
//! tree follows the column headers left to right, using merged regions to find
//! two-level headers. The left tree follows the first column top to bottom,
//! using bold cells to open a second level.
use crate::table::model::Cell;
use crate::table::model::MergedRegion;
use crate::table::model::TreeNode;
use crate::table::TableError;

fn node(cell: &Cell) -> TreeNode {
    let (row, col) = cell.coordinates;
    TreeNode::leaf(row, col)
}

fn has_value(cell: &&Cell) -> bool {
    cell.value != "None"
}

/// Number of top header rows: 2 when cells A1:A2 are merged, else 1.
pub fn top_header_rows(regions: &[MergedRegion]) -> usize {
    let stub = MergedRegion {
        first_row: 0,
        last_row: 1,
        first_column: 0,
        last_column: 0,
    };
    if regions.contains(&stub) {
        2
    } else {
        1
    }
}

/// Builds the column header tree.
///
/// # Arguments
/// * `cells` - Table rows
/// * `regions` - Merged regions in table coordinates
///
/// # Returns
/// Tuple of (top header row count, tree root)
pub fn build_top_tree(cells: &[Vec<Cell>], regions: &[MergedRegion]) -> Result<(usize, TreeNode), TableError> {
    let header_rows = top_header_rows(regions);
    let mut root = TreeNode::root();
    let top_row = cells.first().map(Vec::as_slice).unwrap_or_default();

    if header_rows == 1 {
        root.children = top_row.iter().skip(1).map(node).collect();
    } else {
        root.children = top_row.iter().skip(1).filter(has_value).map(node).collect();
        let second_row = cells.get(1).map(Vec::as_slice).unwrap_or_default();
        let top_merges: Vec<&MergedRegion> = regions
            .iter()
            .filter(|region| region.first_row == 0 && region.last_row == 0)
            .collect();

        if top_merges.is_empty() {
            // Column 1 of the second row sits under the first header, the rest under the root
            for cell in second_row.iter().skip(1).filter(has_value) {
                let child = node(cell);
                match root.children.first_mut() {
                    Some(parent) if cell.coordinates.1 == 1 => parent.children.push(child),
                    _ => root.children.push(child),
                }
            }
        } else {
            for cell in second_row.iter().skip(1) {
                let col = cell.coordinates.1;
                let parent = top_merges
                    .iter()
                    .find(|region| region.contains_column(col))
                    .and_then(|region| {
                        root.children
                            .iter()
                            .position(|child| child.row == 0 && region.contains_column(child.col as usize))
                    });
                match parent {
                    Some(index) => root.children[index].children.push(node(cell)),
                    None => root.children.push(node(cell)),
                }
            }
        }
    }

    let first = root.children.first().ok_or(TableError::EmptyTopTree)?;
    let (row, first_col) = (first.row as usize, first.col as usize);
    for col in (0..first_col).rev() {
        root.children.insert(0, TreeNode::leaf(row, col));
    }
    Ok((header_rows, root))
}

/// Builds the row header tree from the first column below the top header rows.
///
/// # Arguments
/// * `cells` - Table rows
/// * `header_rows` - Number of top header rows to skip
///
/// # Returns
/// Tuple of (left header column count, tree root)
pub fn build_left_tree(cells: &[Vec<Cell>], header_rows: usize) -> Result<(usize, TreeNode), TableError> {
    let mut header_columns = 1;
    let mut has_seen_bold = false;
    let mut root = TreeNode::root();

    for cell in cells.iter().skip(header_rows).filter_map(|row| row.first()) {
        let child = node(cell);
        if cell.attributes.bold == 1 {
            root.children.push(child);
            has_seen_bold = true;
            header_columns = 2;
        } else if !has_seen_bold {
            root.children.push(child);
        } else if let Some(parent) = root.children.last_mut() {
            parent.children.push(child);
        }
    }

    let first = root.children.first().ok_or(TableError::EmptyLeftTree)?;
    let (first_row, col) = (first.row as usize, first.col as usize);
    for row in (0..first_row).rev() {
        root.children.insert(0, TreeNode::leaf(row, col));
    }
    Ok((header_columns, root))
}
