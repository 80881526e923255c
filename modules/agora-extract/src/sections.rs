//! Section heading detection and body capture.
//!
//! Generated text is treated line-by-line. A heading is `Label:` at the
//! start of a line, optionally bold (`**Label:**`), with any inline
//! remainder after the colon belonging to the section body. A section body
//! runs until the next recognized heading or a blank line, whichever comes
//! first — text after that boundary is never captured.

use std::sync::LazyLock;

use regex::Regex;

/// Every label the extractor recognizes as a section boundary, across all
/// fields. Lowercase.
const KNOWN_LABELS: &[&str] = &[
    "name",
    "bio",
    "biography",
    "about",
    "background",
    "papers",
    "publications",
    "major works",
    "events",
    "appearances",
    "connections",
    "influences",
    "related academics",
    "taxonomies",
    "categories",
    "classifications",
];

// The closing `**` of a bold label may land before or after the colon
// (`**Papers**:` vs `**Papers:**`); both forms are accepted.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\*\*)?\s*([A-Za-z][A-Za-z ]*?)\s*(?:\*\*)?\s*:\s*(?:\*\*)?\s*(.*)$").unwrap()
});

/// A recognized heading line, pre-parsed.
#[derive(Debug, Clone)]
pub(crate) struct Heading<'t> {
    pub line_idx: usize,
    pub label: String,
    pub bold: bool,
    /// Inline text after the colon, possibly empty.
    pub rest: &'t str,
}

/// Parse every recognized heading out of the line list.
pub(crate) fn parse_headings<'t>(lines: &[&'t str]) -> Vec<Heading<'t>> {
    let mut headings = Vec::new();
    for (line_idx, line) in lines.iter().enumerate() {
        if let Some(caps) = HEADING_RE.captures(line) {
            let label = caps[2].trim().to_lowercase();
            if KNOWN_LABELS.contains(&label.as_str()) {
                headings.push(Heading {
                    line_idx,
                    label,
                    bold: caps.get(1).is_some(),
                    rest: caps
                        .get(3)
                        .map(|m| m.as_str().trim().trim_matches('*').trim())
                        .unwrap_or(""),
                });
            }
        }
    }
    headings
}

/// First-match-wins over label variants: for each variant in order, prefer
/// a plain-label heading over a bold one, and return the first hit. New
/// variants are added to the list, not to control flow.
pub(crate) fn find_heading<'h, 't>(
    headings: &'h [Heading<'t>],
    variants: &[&str],
) -> Option<&'h Heading<'t>> {
    for variant in variants {
        for bold in [false, true] {
            if let Some(h) = headings
                .iter()
                .find(|h| h.label == *variant && h.bold == bold)
            {
                return Some(h);
            }
        }
    }
    None
}

/// Whether a line is itself a recognized section heading.
pub(crate) fn is_heading(line: &str) -> bool {
    HEADING_RE
        .captures(line)
        .map(|caps| KNOWN_LABELS.contains(&caps[2].trim().to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Capture the body of the section opened by `heading`: the inline
/// remainder plus following lines, stopping at the next recognized heading
/// or blank line.
pub(crate) fn section_body(lines: &[&str], heading: &Heading<'_>) -> Vec<String> {
    let mut body = Vec::new();
    if !heading.rest.is_empty() {
        body.push(heading.rest.to_string());
    }
    for line in &lines[heading.line_idx + 1..] {
        if line.trim().is_empty() || is_heading(line) {
            break;
        }
        body.push(line.trim().to_string());
    }
    body
}
