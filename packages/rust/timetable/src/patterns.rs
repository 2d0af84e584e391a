//! Lexical patterns for course codes.
//!
//! A code is only recognized between two `/` delimiters, e.g.
//! `高等数学Calculus/0009287-2/`. Whitespace between a delimiter and the
//! code is allowed (`/ 0009287-2 /`). Two shapes are accepted:
//! - department-style: 3–5 uppercase letters, 3–4 digits, trailing `J`
//! - generic numeric: 6–8 digits, optionally `-` and a section number

use std::sync::LazyLock;

use regex::Regex;

/// Department-style code, e.g. `BDIC1036J`.
pub const DEPARTMENT_CODE: &str = r"[A-Z]{3,5}[0-9]{3,4}J";

/// Generic numeric code, e.g. `0009287` or `0009287-2`.
pub const NUMERIC_CODE: &str = r"[0-9]{6,8}(?:-[0-9]+)?";

/// Slash-delimited code token; group 1 is the code itself.
pub(crate) static COURSE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"/\s*({DEPARTMENT_CODE}|{NUMERIC_CODE})\s*/"))
        .expect("course code regex")
});

static DEPARTMENT_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{DEPARTMENT_CODE}$")).expect("department code regex")
});

static NUMERIC_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NUMERIC_CODE}$")).expect("numeric code regex"));

/// Which of the accepted shapes a code has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Department,
    Numeric,
}

/// Classify a bare code (no delimiters). `None` if it has neither shape.
pub fn code_kind(code: &str) -> Option<CodeKind> {
    if DEPARTMENT_CODE_RE.is_match(code) {
        Some(CodeKind::Department)
    } else if NUMERIC_CODE_RE.is_match(code) {
        Some(CodeKind::Numeric)
    } else {
        None
    }
}

/// Find the first delimited code in `line`.
///
/// Returns the byte offset of the opening `/` and the code text.
pub(crate) fn find_code(line: &str) -> Option<(usize, &str)> {
    let caps = COURSE_CODE_RE.captures(line)?;
    let whole = caps.get(0)?;
    let code = caps.get(1)?;
    Some((whole.start(), code.as_str()))
}
