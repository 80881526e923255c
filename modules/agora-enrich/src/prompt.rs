//! Prompt construction for the text-generation provider.

use std::fmt;
use std::str::FromStr;

const BASE_INSTRUCTION: &str = "You are an academic catalog assistant. \
Provide factual, encyclopedic information about the requested philosopher \
or theorist. Do not invent works or relationships.";

const SECTION_REQUEST: &str = "Structure your answer with exactly these six \
labeled sections, each starting on its own line:\n\
Name:\nBio:\nPapers:\nEvents:\nConnections:\nTaxonomies:\n\
List papers and events as bulleted items with the year in parentheses. \
Under Taxonomies, use one line per category \
(discipline, tradition, era, methodology, theme) with comma-separated values.";

/// How much detail to ask the provider for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    Basic,
    #[default]
    Medium,
    Deep,
}

impl Depth {
    fn modifier(self) -> &'static str {
        match self {
            Depth::Basic => "Keep it brief: only the most essential facts, \
two or three items per section.",
            Depth::Medium => "Give a moderately detailed account: the major \
works, events, and relationships.",
            Depth::Deep => "Go deep: include lesser-known works, minor \
appearances, and indirect intellectual connections.",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Basic => write!(f, "basic"),
            Depth::Medium => write!(f, "medium"),
            Depth::Deep => write!(f, "deep"),
        }
    }
}

impl FromStr for Depth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Depth::Basic),
            "medium" => Ok(Depth::Medium),
            "deep" => Ok(Depth::Deep),
            other => Err(format!("unknown depth '{other}' (basic|medium|deep)")),
        }
    }
}

/// Assemble the full prompt: base instruction, depth modifier, one
/// exclusion clause per active filter, then the fixed six-section request.
pub fn build_prompt(topic: &str, depth: Depth, exclusions: &[String]) -> String {
    let mut prompt = format!(
        "{BASE_INSTRUCTION}\n\nTell me about the academic \"{topic}\".\n{}",
        depth.modifier()
    );
    for exclusion in exclusions {
        prompt.push_str(&format!(
            "\nDo not mention or connect to {exclusion}; they are already covered."
        ));
    }
    prompt.push_str("\n\n");
    prompt.push_str(SECTION_REQUEST);
    prompt
}
