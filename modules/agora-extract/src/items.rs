//! List-item parsing for papers, events, and connections.
//!
//! Year recognition is deliberately narrow: exactly `(YYYY)` or `, YYYY`.
//! Any other date phrasing is ignored and the year stays unknown.

use std::sync::LazyLock;

use regex::Regex;

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*•]\s+").unwrap());
static ORDINAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s+").unwrap());
static PAREN_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*(\d{4})\s*\)").unwrap());
static COMMA_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*(\d{4})\b").unwrap());
static WITH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)[,\s(]with\s+").unwrap());
static AND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+and\s+").unwrap());

/// Split a section body into items. Bulleted lines each form one item;
/// a body with no bullets at all treats every line as an item.
pub(crate) fn split_items(body: &[String]) -> Vec<String> {
    body.iter()
        .map(|line| BULLET_RE.replace(line, "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Split a connections body: bullets if present, else commas on each line.
pub(crate) fn split_connection_items(body: &[String]) -> Vec<String> {
    let bulleted = body.iter().any(|line| BULLET_RE.is_match(line));
    let raw: Vec<String> = if bulleted {
        split_items(body)
    } else {
        body.iter()
            .flat_map(|line| line.split(','))
            .map(|part| part.trim().to_string())
            .collect()
    };
    raw.into_iter()
        .map(|item| strip_ordinal(&item))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Strip leading ordinal numbering ("1. " / "2) ") from an item.
pub(crate) fn strip_ordinal(item: &str) -> String {
    ORDINAL_RE.replace(item, "").trim().to_string()
}

/// Extract a publication year from an item. Recognizes `(YYYY)` first,
/// then `, YYYY`; the matched token is removed from the returned text.
pub(crate) fn take_year(item: &str) -> (String, Option<i32>) {
    for re in [&*PAREN_YEAR_RE, &*COMMA_YEAR_RE] {
        if let Some(caps) = re.captures(item) {
            let year = caps[1].parse().ok();
            let full = caps.get(0).unwrap();
            let rest = format!(
                "{}{}",
                item[..full.start()].trim_end(),
                &item[full.end()..]
            );
            return (rest.trim().trim_end_matches(',').trim().to_string(), year);
        }
    }
    (item.trim().to_string(), None)
}

/// Detect a `with <names>` coauthor clause. Names split on commas and
/// "and"; the clause is removed from the returned title.
pub(crate) fn take_coauthors(item: &str) -> (String, Vec<String>) {
    let Some(m) = WITH_RE.find(item) else {
        return (item.trim().to_string(), Vec::new());
    };
    let title = item[..m.start()]
        .trim_end_matches(['(', ','])
        .trim()
        .to_string();
    let clause = item[m.end()..].trim().trim_end_matches(')').trim();
    let coauthors = clause
        .split(',')
        .flat_map(|part| AND_RE.split(part))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    (title, coauthors)
}

/// Peel a trailing location off an event item: the final comma-separated
/// segment, provided it contains no digits.
pub(crate) fn take_location(item: &str) -> (String, Option<String>) {
    let Some((head, tail)) = item.rsplit_once(',') else {
        return (item.trim().to_string(), None);
    };
    let tail = tail.trim();
    if tail.is_empty() || tail.chars().any(|c| c.is_ascii_digit()) {
        return (item.trim().to_string(), None);
    }
    (head.trim().to_string(), Some(tail.to_string()))
}
