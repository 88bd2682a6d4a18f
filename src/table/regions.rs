//! Merged region reconciliation against the rows removed by noise filtering.
use crate::spreadsheet::reference::range_to_index;
use crate::table::model::MergedRegion;

/// Converts the worksheet's merged ranges into table coordinates.
///
/// Ranges are made relative to the worksheet `origin`. When a single blank row
/// was removed, regions lying entirely below it move up by one; a region
/// spanning the removed row keeps its bounds. Regions that end up outside the
/// table (e.g. inside removed footnote rows) are dropped.
///
/// # Arguments
/// * `ranges` - Merged ranges in A1 notation ("B2:C3")
/// * `origin` - Zero-based (row, col) of the worksheet's first used cell
/// * `removed_blank_row` - Grid index of the removed blank row, if any
/// * `row_count` - Number of table rows after filtering
/// * `column_count` - Number of table columns
pub fn resolve_merged_regions(
    ranges: &[String],
    origin: (usize, usize),
    removed_blank_row: Option<usize>,
    row_count: usize,
    column_count: usize,
) -> Vec<MergedRegion> {
    ranges
        .iter()
        .filter_map(|range| to_table_region(range, origin))
        .map(|region| match removed_blank_row {
            Some(removed) if region.first_row > removed && region.last_row > removed => MergedRegion {
                first_row: region.first_row - 1,
                last_row: region.last_row - 1,
                ..region
            },
            _ => region,
        })
        .filter(|region| region.last_row < row_count && region.last_column < column_count)
        .collect()
}

fn to_table_region(range: &str, (origin_row, origin_col): (usize, usize)) -> Option<MergedRegion> {
    let (first_row, first_col, last_row, last_col) = range_to_index(range)?;
    let region = MergedRegion {
        first_row: first_row.checked_sub(origin_row)?,
        last_row: last_row.checked_sub(origin_row)?,
        first_column: first_col.checked_sub(origin_col)?,
        last_column: last_col.checked_sub(origin_col)?,
    };
    (region.first_row <= region.last_row && region.first_column <= region.last_column).then_some(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn region(first_row: usize, last_row: usize, first_column: usize, last_column: usize) -> MergedRegion {
        MergedRegion {
            first_row,
            last_row,
            first_column,
            last_column,
        }
    }

    #[test]
    fn converts_ranges() {
        let regions = resolve_merged_regions(&ranges(&["A1:A2", "B1:C1"]), (0, 0), None, 10, 3);
        assert_eq!(regions, vec![region(0, 1, 0, 0), region(0, 0, 1, 2)]);
    }

    #[test]
    fn shifts_regions_below_removed_row() {
        let regions = resolve_merged_regions(&ranges(&["A1:A2", "B5:C6", "A7:B8", "C6:C7"]), (0, 0), Some(5), 7, 3);
        assert_eq!(
            regions,
            vec![region(0, 1, 0, 0), region(4, 5, 1, 2), region(5, 6, 0, 1), region(5, 6, 2, 2)]
        );
    }

    #[test]
    fn shifts_below_removed_first_row() {
        let regions = resolve_merged_regions(&ranges(&["A2:A3"]), (0, 0), Some(0), 4, 2);
        assert_eq!(regions, vec![region(0, 1, 0, 0)]);
    }

    #[test]
    fn drops_regions_outside_table() {
        let regions = resolve_merged_regions(&ranges(&["A9:B9", "A1:D1", "A2:B3"]), (0, 0), None, 8, 3);
        assert_eq!(regions, vec![region(1, 2, 0, 1)]);
    }

    #[test]
    fn translates_by_origin() {
        let regions = resolve_merged_regions(&ranges(&["B2:B3", "Z1:Z1", "bogus"]), (1, 1), None, 5, 5);
        assert_eq!(regions, vec![region(0, 1, 0, 0)]);
    }
}
