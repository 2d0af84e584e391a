//! Course extraction from a whole timetable.
//!
//! Layout assumed for every file:
//! - rows 0 and 1 are headers (title, weekday names)
//! - columns 0 and 1 hold period and time labels
//! - columns 2.. are the weekdays

use coursecat_shared::RawCourse;

use crate::cell::extract_cell;

/// Number of leading header rows that never hold courses.
pub const HEADER_ROWS: usize = 2;

/// Index of the first weekday column.
pub const FIRST_WEEKDAY_COLUMN: usize = 2;

/// Largest row length that is still skipped; schedule rows are longer.
pub const MAX_SKIPPED_ROW_CELLS: usize = 3;

/// Extract every course occurrence from a table, in reading order.
pub fn parse_table(rows: &[Vec<String>]) -> Vec<RawCourse> {
    rows.iter()
        .skip(HEADER_ROWS)
        .filter(|row| row.len() > MAX_SKIPPED_ROW_CELLS)
        .flat_map(|row| row.iter().skip(FIRST_WEEKDAY_COLUMN))
        .filter(|cell| !cell.trim().is_empty())
        .flat_map(|cell| extract_cell(cell))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    fn header_rows() -> Vec<Vec<String>> {
        vec![
            row(&["软件工程2025级课表", "", "", "", ""]),
            row(&["节次", "时间", "星期一", "星期二", "星期三"]),
        ]
    }

    #[test]
    fn header_rows_are_always_skipped() {
        let rows = vec![
            row(&["x", "y", "线性代数Linear Algebra/BDIC1001J/", "", ""]),
            row(&["x", "y", "高等数学Calculus/0009287-2/", "", ""]),
        ];
        assert!(parse_table(&rows).is_empty());
    }

    #[test]
    fn label_columns_are_never_parsed() {
        let mut rows = header_rows();
        rows.push(row(&[
            "线性代数Linear Algebra/BDIC1001J/",
            "高等数学Calculus/0009287-2/",
            "",
            "",
            "",
        ]));
        assert!(parse_table(&rows).is_empty());
    }

    #[test]
    fn short_rows_are_skipped() {
        let mut rows = header_rows();
        rows.push(row(&["第1-2节", "08:00", "线性代数Linear Algebra/BDIC1001J/"]));
        assert!(parse_table(&rows).is_empty());
    }

    #[test]
    fn four_cell_row_is_the_shortest_parsed() {
        let mut rows = header_rows();
        rows.push(row(&["第1-2节", "08:00", "线性代数Linear Algebra/BDIC1001J/"]));
        rows.push(row(&["第3-4节", "10:00", "高等数学Calculus/0009287-2/", ""]));

        let codes: Vec<_> = parse_table(&rows).into_iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["0009287-2"]);
    }

    #[test]
    fn collects_in_reading_order() {
        let mut rows = header_rows();
        rows.push(row(&[
            "第1-2节",
            "08:00-09:35",
            "线性代数Linear Algebra/BDIC1001J/",
            "  ",
            "高等数学Calculus/0009287-2/\n大学物理Physics/0011223/",
        ]));
        rows.push(row(&[
            "第3-4节",
            "10:00-11:35",
            "",
            "形势与政策7/0012345/",
            "教学楼A-301",
        ]));

        let codes: Vec<_> = parse_table(&rows).into_iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["BDIC1001J", "0009287-2", "0011223", "0012345"]);
    }

    #[test]
    fn repeated_occurrences_are_kept() {
        let mut rows = header_rows();
        rows.push(row(&[
            "第1-2节",
            "08:00",
            "线性代数Linear Algebra/BDIC1001J/",
            "线性代数Linear Algebra/BDIC1001J/",
        ]));
        assert_eq!(parse_table(&rows).len(), 2);
    }
}
