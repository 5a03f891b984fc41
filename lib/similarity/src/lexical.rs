//! Lexical matcher
//!
//! Finds the longest catalog name that appears as whole words in a query.
//! Names are checked longest first so "metformin hcl" wins over "metformin"
//! when both occur.

use rxlink_core::text::contains_word;
use std::cmp::Ordering;

/// Catalog names pre-sorted for longest-match-wins lookup.
///
/// Build once per catalog and reuse across queries.
#[derive(Debug, Clone, Default)]
pub struct LexicalMatcher {
    names: Vec<String>,
}

impl LexicalMatcher {
    /// Names are expected to be normalized (lower-cased, trimmed); empty
    /// names are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|n: &String| !n.is_empty())
            .collect();
        names.sort_by(|a, b| longest_first(a, b));
        names.dedup();
        Self { names }
    }

    /// The longest name occurring in `query` on word boundaries,
    /// compared case-insensitively.
    pub fn find(&self, query: &str) -> Option<&str> {
        let query = query.to_lowercase();
        self.names
            .iter()
            .find(|name| contains_word(&query, name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One-shot form of [`LexicalMatcher::find`]
pub fn find_longest_match<I, S>(query: &str, names: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    LexicalMatcher::new(names).find(query).map(str::to_string)
}

// Descending character length, then alphabetical so equal-length ties are
// deterministic.
fn longest_first(a: &str, b: &str) -> Ordering {
    b.chars()
        .count()
        .cmp(&a.chars().count())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match_wins() {
        let matcher = LexicalMatcher::new(["metformin", "metformin hcl"]);
        assert_eq!(matcher.find("tell me about Metformin HCl"), Some("metformin hcl"));
        assert_eq!(matcher.find("is metformin safe?"), Some("metformin"));
    }

    #[test]
    fn test_substring_name_prefers_longer() {
        let matcher = LexicalMatcher::new(["aspirin", "aspirin ec"]);
        assert_eq!(matcher.find("Should I take ASPIRIN EC daily"), Some("aspirin ec"));
    }

    #[test]
    fn test_word_boundary_required() {
        let matcher = LexicalMatcher::new(["ibuprofen"]);
        assert_eq!(matcher.find("what is ibuprofenate"), None);
        assert_eq!(matcher.find("ibuprofen, 200mg"), Some("ibuprofen"));
    }

    #[test]
    fn test_full_name_inside_longer_word_only_if_listed() {
        let matcher = LexicalMatcher::new(["ibuprofen", "ibuprofenate"]);
        assert_eq!(matcher.find("what is ibuprofenate"), Some("ibuprofenate"));
    }

    #[test]
    fn test_no_match() {
        let matcher = LexicalMatcher::new(["lisinopril"]);
        assert_eq!(matcher.find("how do I sleep better"), None);
        assert_eq!(matcher.find(""), None);
    }

    #[test]
    fn test_empty_names_ignored() {
        let matcher = LexicalMatcher::new(["", "zoloft"]);
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.find("anything"), None);
    }

    #[test]
    fn test_equal_length_tie_is_deterministic() {
        // both five chars and both present: alphabetical order decides
        let a = find_longest_match("advil or motrn", ["motrn", "advil"]);
        let b = find_longest_match("advil or motrn", ["advil", "motrn"]);
        assert_eq!(a.as_deref(), Some("advil"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_name_resolves_in_context() {
        let names = ["zoloft", "lipitor", "tylenol pm", "prozac"];
        let matcher = LexicalMatcher::new(names);
        for name in names {
            let query = format!("text containing {}", name);
            assert_eq!(matcher.find(&query), Some(name));
        }
    }
}
