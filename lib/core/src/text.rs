// Text helpers shared by the catalog and the matchers

/// Normalize a catalog key: trimmed and lower-cased
#[inline]
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Word characters as understood by a regex `\b`
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True if byte offset `idx` of `text` sits on a word boundary, i.e. the
/// characters on either side differ in wordness. String ends count as
/// non-word.
pub fn is_word_boundary(text: &str, idx: usize) -> bool {
    let before = text[..idx].chars().next_back().is_some_and(is_word_char);
    let after = text[idx..].chars().next().is_some_and(is_word_char);
    before != after
}

/// Finds `needle` in `haystack` with both ends anchored on word boundaries.
///
/// Equivalent to searching for `\b<escaped needle>\b`. Callers handle case
/// folding; the comparison here is exact.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    // step one char past each rejected hit so overlapping occurrences are tried
    let step = needle.chars().next().map_or(1, char::len_utf8);
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        if is_word_boundary(haystack, start) && is_word_boundary(haystack, start + needle.len()) {
            return true;
        }
        from = start + step;
    }
    false
}

/// Lower-cased whitespace-delimited tokens
pub fn query_tokens(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Metformin HCl "), "metformin hcl");
        assert_eq!(normalize_key("   "), "");
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("tell me about ibuprofen", "ibuprofen"));
        assert!(contains_word("ibuprofen?", "ibuprofen"));
        assert!(contains_word("ibuprofen", "ibuprofen"));
        assert!(!contains_word("ibuprofenate dosage", "ibuprofen"));
        assert!(!contains_word("paracetamol", "acetam"));
        assert!(!contains_word("anything", ""));
    }

    #[test]
    fn test_contains_word_later_occurrence() {
        // first hit is embedded in a longer word, second stands alone
        assert!(contains_word("aspirinx or aspirin", "aspirin"));
    }

    #[test]
    fn test_contains_word_overlapping_occurrence() {
        // "ab ab" first appears inside "xab ab", the standalone hit overlaps it
        assert!(contains_word("xab ab ab", "ab ab"));
        assert!(contains_word("sal sal sal", "sal sal"));
        assert!(!contains_word("xab ab abx", "ab ab"));
    }

    #[test]
    fn test_needle_with_punctuation_edges() {
        // like `\b`, a non-word first char needs a word char before it
        assert!(!contains_word("take (b12) daily", "(b12)"));
        assert!(contains_word("vitamin b-12 dose", "b-12"));
    }

    #[test]
    fn test_query_tokens() {
        assert_eq!(query_tokens("Severe  Dizziness"), vec!["severe", "dizziness"]);
        assert!(query_tokens("   ").is_empty());
    }
}
