//! Normalized record keys.
//!
//! The catalog is keyed by a normalization of the display name: lowercase,
//! whitespace runs collapsed to a single hyphen, everything outside
//! word characters and hyphens stripped. The mapping is pure and
//! deterministic so the same name always resolves to the same record.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w-]").unwrap());

/// Derive the store key for a display name.
pub fn normalized_key(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let hyphened = WHITESPACE_RE.replace_all(&lowered, "-");
    NON_WORD_RE.replace_all(&hyphened, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_hyphens() {
        assert_eq!(normalized_key("Michel Foucault"), "michel-foucault");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(normalized_key("Michel   Foucault"), "michel-foucault");
        assert_eq!(normalized_key("Michel\t Foucault"), "michel-foucault");
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(normalized_key("W.V.O. Quine"), "wvo-quine");
        assert_eq!(normalized_key("G.E.M. Anscombe!"), "gem-anscombe");
    }

    #[test]
    fn leading_and_trailing_whitespace_trimmed() {
        assert_eq!(normalized_key("  Hannah Arendt  "), "hannah-arendt");
    }

    #[test]
    fn accented_names_keep_their_letters() {
        assert_eq!(normalized_key("Émile Durkheim"), "émile-durkheim");
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            normalized_key("Jacques Derrida"),
            normalized_key("Jacques Derrida")
        );
    }

    #[test]
    fn empty_name_yields_empty_key() {
        assert_eq!(normalized_key(""), "");
        assert_eq!(normalized_key("   "), "");
    }
}
