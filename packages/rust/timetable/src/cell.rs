//! Course extraction from a single timetable cell.
//!
//! A cell holds zero or more entries, one per line:
//!
//! ```text
//! 学术英语-阅读 College English 3/BDIC1036J/
//! 高等数学Calculus/0009287-2/
//! ```
//!
//! Lines without a delimited code (rooms, weeks, notes) are ignored.

use coursecat_shared::RawCourse;

use crate::names::split_name;
use crate::patterns::find_code;

/// Extract every course entry from one cell's text.
pub fn extract_cell(text: &str) -> Vec<RawCourse> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(extract_line)
        .collect()
}

fn extract_line(line: &str) -> Option<RawCourse> {
    let (start, code) = find_code(line)?;

    let raw_name = line[..start].trim();
    if raw_name.is_empty() {
        tracing::trace!(line, code, "code without a course name, skipping");
        return None;
    }

    let (name_cn, name_en) = split_name(raw_name);
    Some(RawCourse {
        name_cn,
        name_en,
        code: code.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_entries_one_per_code_shape() {
        let cell = "学术英语-阅读 College English 3/BDIC1036J/\n高等数学Calculus/0009287-2/";
        let courses = extract_cell(cell);

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].code, "BDIC1036J");
        assert_eq!(courses[0].name_cn, "学术英语-阅读");
        assert_eq!(courses[0].name_en, "College English 3");
        assert_eq!(courses[1].code, "0009287-2");
        assert_eq!(courses[1].name_cn, "高等数学");
        assert_eq!(courses[1].name_en, "Calculus");
    }

    #[test]
    fn bare_code_line_is_skipped() {
        let courses = extract_cell("/BDIC1036J/\n高等数学Calculus/0009287-2/");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].code, "0009287-2");
    }

    #[test]
    fn annotation_only_cell_is_empty() {
        assert!(extract_cell("教学楼A-301\n1-16周").is_empty());
        assert!(extract_cell("").is_empty());
    }

    #[test]
    fn trailing_annotation_after_code_is_ignored() {
        let courses = extract_cell("数据结构Data Structures/COMP2003J/ 1-16周 A-301");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name_en, "Data Structures");
        assert_eq!(courses[0].code, "COMP2003J");
    }

    #[test]
    fn crlf_and_blank_lines() {
        let cell = "\r\n形势与政策7/0012345/\r\n\r\n教学楼B-201\r\n";
        let courses = extract_cell(cell);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name_cn, "形势与政策7");
        assert_eq!(courses[0].name_en, "");
        assert_eq!(courses[0].code, "0012345");
    }

    #[test]
    fn spaced_delimiters_still_yield_a_course() {
        let courses = extract_cell("高等数学Calculus/ 0009287-2 /\n学术英语-阅读 College English 3 / BDIC1036J/");
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].code, "0009287-2");
        assert_eq!(courses[0].name_cn, "高等数学");
        assert_eq!(courses[0].name_en, "Calculus");
        assert_eq!(courses[1].code, "BDIC1036J");
        assert_eq!(courses[1].name_en, "College English 3");
    }

    #[test]
    fn undelimited_code_is_not_a_course() {
        assert!(extract_cell("高等数学 0009287-2").is_empty());
    }
}
