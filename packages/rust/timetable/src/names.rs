//! Splitting bilingual course names.

/// Split a raw course name into its Chinese and Latin parts.
///
/// The split point is the first ASCII letter: `学术英语-阅读 College English 3`
/// becomes `("学术英语-阅读", "College English 3")`. Digits and punctuation do
/// not count, so `形势与政策7` stays whole with an empty Latin part. A name that
/// starts with a Latin letter is returned entirely as the Latin part.
pub fn split_name(raw: &str) -> (String, String) {
    let trimmed = raw.trim();

    match trimmed.find(|c: char| c.is_ascii_alphabetic()) {
        None => (trimmed.to_string(), String::new()),
        Some(0) => (String::new(), trimmed.to_string()),
        Some(idx) => {
            let (cn, en) = trimmed.split_at(idx);
            (cn.trim().to_string(), en.trim().to_string())
        }
    }
}
