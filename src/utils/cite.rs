//! Citation summary formatting.
//!
//! Renders a [`Citation`] as `First Last (Source Year) Title` and strips the
//! characters that are not allowed in file names, so the summary can be pasted
//! straight into a "save as" dialog.

use crate::models::Citation;

/// Characters removed from every summary
pub const UNSAFE_FILENAME_CHARS: [char; 9] = ['\\', '/', ':', '?', '.', '"', '<', '>', '|'];

/// Format a citation as `{first} {last} ({source} {year}) {title}`.
///
/// Empty parts are dropped together with their separating space, so a single
/// author renders as `Smith (Nature 2020) Title` and an empty citation as `" () "`.
pub fn format_summary(citation: &Citation) -> String {
    let authors = join_present(&citation.first_author, &citation.last_author);
    let venue = join_present(&citation.source, &citation.year);

    let summary = format!("{} ({}) {}", authors, venue, citation.title);
    remove_special_characters(&summary)
}

/// Remove every character in [`UNSAFE_FILENAME_CHARS`]
pub fn remove_special_characters(input: &str) -> String {
    input
        .chars()
        .filter(|c| !UNSAFE_FILENAME_CHARS.contains(c))
        .collect()
}

fn join_present(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (false, false) => format!("{} {}", left, right),
        (false, true) => left.to_string(),
        (true, false) => right.to_string(),
        (true, true) => String::new(),
    }
}
