//! The extraction cascade.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use agora_common::{Academic, EventRecord, Paper, TaxonomyCategory};

use crate::items::{
    split_connection_items, split_items, take_coauthors, take_location, take_year,
};
use crate::sections::{find_heading, parse_headings, section_body, Heading};

const BIO_LABELS: &[&str] = &["bio", "biography", "about", "background"];
const PAPER_LABELS: &[&str] = &["papers", "publications", "major works"];
const EVENT_LABELS: &[&str] = &["events", "appearances"];
const CONNECTION_LABELS: &[&str] = &["connections", "influences", "related academics"];
const TAXONOMY_LABELS: &[&str] = &["taxonomies", "categories", "classifications"];

static FENCED_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap());

static TAXONOMY_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*•]?\s*(?:\*\*)?\s*([A-Za-z]+)(?:\*\*)?\s*:\s*(.+)$").unwrap()
});

/// Parse generated text into a candidate record.
///
/// Returns `None` only when no name can be determined; every other field
/// degrades to an empty container.
pub fn extract(text: &str) -> Option<Academic> {
    if let Some(academic) = fenced_json(text) {
        debug!(name = %academic.name, "extracted from fenced JSON block");
        return Some(academic);
    }
    from_headings(text)
}

/// Fast path: a fenced code block holding a JSON record with a non-empty
/// name is returned verbatim, bypassing all heading heuristics.
fn fenced_json(text: &str) -> Option<Academic> {
    let caps = FENCED_JSON_RE.captures(text)?;
    match serde_json::from_str::<Academic>(&caps[1]) {
        Ok(academic) if !academic.name.trim().is_empty() => Some(academic),
        Ok(_) => None,
        Err(err) => {
            debug!(error = %err, "fenced block did not parse as a record");
            None
        }
    }
}

fn from_headings(text: &str) -> Option<Academic> {
    let lines: Vec<&str> = text.lines().collect();
    let headings = parse_headings(&lines);

    let name = find_heading(&headings, &["name"])
        .map(|h| h.rest.to_string())
        .filter(|name| !name.is_empty())
        .or_else(|| first_line_without_colon(&lines))?;

    let mut academic = Academic::new(name);

    if let Some(h) = find_heading(&headings, BIO_LABELS) {
        academic.bio = section_body(&lines, h).join(" ");
    }
    if let Some(h) = find_heading(&headings, PAPER_LABELS) {
        academic.papers = parse_papers(&lines, h);
    }
    if let Some(h) = find_heading(&headings, EVENT_LABELS) {
        academic.events = parse_events(&lines, h);
    }
    if let Some(h) = find_heading(&headings, CONNECTION_LABELS) {
        academic.connections = split_connection_items(&section_body(&lines, h));
    }
    if let Some(h) = find_heading(&headings, TAXONOMY_LABELS) {
        parse_taxonomies(&section_body(&lines, h), &mut academic);
    }

    debug!(name = %academic.name, "extracted from labeled sections");
    Some(academic)
}

/// Name fallback: the first non-empty line that contains no colon, with
/// markdown decoration stripped.
fn first_line_without_colon(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .filter(|line| !line.trim_start().starts_with("```"))
        .map(|line| line.trim().trim_matches(['#', '*', '-', ' ']).trim())
        .find(|line| !line.is_empty() && !line.contains(':'))
        .map(str::to_string)
}

fn parse_papers(lines: &[&str], heading: &Heading<'_>) -> Vec<Paper> {
    split_items(&section_body(lines, heading))
        .into_iter()
        .map(|item| {
            let (rest, year) = take_year(&item);
            let (title, coauthors) = take_coauthors(&rest);
            Paper {
                title,
                year,
                coauthors,
            }
        })
        .filter(|paper| !paper.title.is_empty())
        .collect()
}

fn parse_events(lines: &[&str], heading: &Heading<'_>) -> Vec<EventRecord> {
    split_items(&section_body(lines, heading))
        .into_iter()
        .map(|item| {
            let (rest, year) = take_year(&item);
            let (title, location) = take_location(&rest);
            EventRecord {
                title,
                year,
                location,
            }
        })
        .filter(|event| !event.title.is_empty())
        .collect()
}

/// Taxonomy body lines look like `discipline: Philosophy, Ethics`.
/// Values accumulate when a category repeats; deduplication is the merge
/// engine's concern, not the extractor's.
fn parse_taxonomies(body: &[String], academic: &mut Academic) {
    for line in body {
        let Some(caps) = TAXONOMY_LINE_RE.captures(line) else {
            continue;
        };
        let Some(category) = TaxonomyCategory::parse(&caps[1]) else {
            continue;
        };
        let values = caps[2]
            .split(',')
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        academic.taxonomies.entry(category).or_default().extend(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- fenced JSON tests ---

    #[test]
    fn fenced_json_wins_over_headings() {
        let text = r#"Here is the record:
```json
{"name": "Gilles Deleuze", "bio": "French philosopher of difference."}
```
Name: Wrong Name
"#;
        let academic = extract(text).unwrap();
        assert_eq!(academic.name, "Gilles Deleuze");
        assert_eq!(academic.bio, "French philosopher of difference.");
    }

    #[test]
    fn fenced_json_without_name_falls_back() {
        let text = "```json\n{\"bio\": \"orphaned\"}\n```\nName: Judith Butler";
        let academic = extract(text).unwrap();
        assert_eq!(academic.name, "Judith Butler");
    }

    #[test]
    fn malformed_fenced_json_falls_back() {
        let text = "```json\n{not json}\n```\nName: Judith Butler";
        let academic = extract(text).unwrap();
        assert_eq!(academic.name, "Judith Butler");
    }

    #[test]
    fn untagged_fence_is_accepted() {
        let text = "```\n{\"name\": \"Axel Honneth\"}\n```";
        assert_eq!(extract(text).unwrap().name, "Axel Honneth");
    }

    // --- name resolution tests ---

    #[test]
    fn name_heading_wins() {
        let academic = extract("Name: Jacques Rancière\nOther text").unwrap();
        assert_eq!(academic.name, "Jacques Rancière");
    }

    #[test]
    fn bold_name_heading() {
        let academic = extract("**Name:** Jacques Rancière").unwrap();
        assert_eq!(academic.name, "Jacques Rancière");
    }

    #[test]
    fn first_colonless_line_fallback() {
        let academic = extract("## Maurice Merleau-Ponty\nBio: Phenomenologist.").unwrap();
        assert_eq!(academic.name, "Maurice Merleau-Ponty");
    }

    #[test]
    fn no_name_is_extraction_failure() {
        assert!(extract("Bio: someone\nPapers: something").is_none());
        assert!(extract("").is_none());
    }

    // --- field tests ---

    #[test]
    fn bio_captures_until_blank_line() {
        let text = "Name: A\nBio: First.\nSecond.\n\nThird is outside.";
        let academic = extract(text).unwrap();
        assert_eq!(academic.bio, "First. Second.");
    }

    #[test]
    fn papers_with_years_and_coauthors() {
        let text = "\
Name: Gilles Deleuze
Papers:
- Anti-Oedipus (1972), with Félix Guattari
- Difference and Repetition, 1968
";
        let academic = extract(text).unwrap();
        assert_eq!(academic.papers.len(), 2);
        assert_eq!(academic.papers[0].title, "Anti-Oedipus");
        assert_eq!(academic.papers[0].year, Some(1972));
        assert_eq!(academic.papers[0].coauthors, vec!["Félix Guattari"]);
        assert_eq!(academic.papers[1].title, "Difference and Repetition");
        assert_eq!(academic.papers[1].year, Some(1968));
        assert!(academic.papers[1].coauthors.is_empty());
    }

    #[test]
    fn events_with_location() {
        let text = "\
Name: Michel Foucault
Events:
- Debate on Human Nature (1971), Eindhoven
- Inaugural lecture at the Collège de France
";
        let academic = extract(text).unwrap();
        assert_eq!(academic.events.len(), 2);
        assert_eq!(academic.events[0].title, "Debate on Human Nature");
        assert_eq!(academic.events[0].year, Some(1971));
        assert_eq!(academic.events[0].location.as_deref(), Some("Eindhoven"));
        assert_eq!(academic.events[1].year, None);
        assert_eq!(academic.events[1].location, None);
    }

    #[test]
    fn influences_label_variant_fills_connections() {
        let text = "Name: A\nInfluences: Baruch Spinoza, Henri Bergson";
        let academic = extract(text).unwrap();
        assert_eq!(
            academic.connections,
            vec!["Baruch Spinoza", "Henri Bergson"]
        );
    }

    #[test]
    fn taxonomy_lines_parse_into_categories() {
        let text = "\
Name: A
Taxonomies:
- Discipline: Philosophy
- Traditions: Post-structuralism, Continental
- Vibe: unknown category ignored
";
        let academic = extract(text).unwrap();
        assert_eq!(
            academic.taxonomies[&TaxonomyCategory::Discipline],
            vec!["Philosophy"]
        );
        assert_eq!(
            academic.taxonomies[&TaxonomyCategory::Tradition],
            vec!["Post-structuralism", "Continental"]
        );
        assert_eq!(academic.taxonomies.len(), 2);
    }

    #[test]
    fn repeated_taxonomy_category_appends() {
        let text = "Name: A\nCategories:\nTheme: Power\nTheme: Knowledge";
        let academic = extract(text).unwrap();
        assert_eq!(
            academic.taxonomies[&TaxonomyCategory::Theme],
            vec!["Power", "Knowledge"]
        );
    }

    #[test]
    fn text_after_section_boundary_is_never_captured() {
        let text = "\
Name: A
Papers:
- Real Paper (1990)

- Stray item after blank line
";
        let academic = extract(text).unwrap();
        assert_eq!(academic.papers.len(), 1);
        assert_eq!(academic.papers[0].title, "Real Paper");
    }
}
