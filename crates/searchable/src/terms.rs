//! Search term sanitization.
//!
//! Turns raw user input into terms that are safe to feed to PostgreSQL's
//! `to_tsquery`. Characters with meaning in the tsquery syntax are removed,
//! whitespace runs collapse to a single separator, and every remaining word
//! gets a prefix-match marker:
//!
//! - `"hello world"` → `["hello:*", "world:*"]`
//! - `"(foo | bar)!"` → `["foo:*", "bar:*"]`
//! - `"  @#  "` → `[]`

use std::sync::LazyLock;

use regex::Regex;

/// Characters reserved by the tsquery syntax, plus whitespace.
///
/// `\x1C-\x1F` (the ASCII information separators) are listed explicitly:
/// they are not Unicode `White_Space`, but must still split words.
static RESERVED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[():|&!*@#\s\x1C-\x1F]+").expect("reserved character pattern is valid")
});

/// Marker appended to each term so it matches any word starting with it.
pub const DEFAULT_WILDCARD: &str = ":*";

/// Separator used to AND terms together in the bound `term` parameter.
pub const TERM_SEPARATOR: &str = " & ";

/// An ordered set of sanitized search terms.
///
/// Every term is non-empty and free of reserved characters apart from the
/// trailing wildcard marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    terms: Vec<String>,
}

impl SearchTerms {
    /// Returns true if there is nothing to search for.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Iterates over the terms in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.terms.iter()
    }

    /// Returns the terms as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.terms
    }

    /// Consumes the set, returning the terms.
    pub fn into_vec(self) -> Vec<String> {
        self.terms
    }

    /// Joins the terms with `" & "`, the value bound to the `term` parameter.
    pub fn joined(&self) -> String {
        self.terms.join(TERM_SEPARATOR)
    }
}

impl<'a> IntoIterator for &'a SearchTerms {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl IntoIterator for SearchTerms {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

/// Sanitizes a search query using the default `:*` prefix marker.
pub fn safe_search_terms(query: &str) -> SearchTerms {
    safe_search_terms_with_wildcard(query, DEFAULT_WILDCARD)
}

/// Sanitizes a search query, appending `wildcard` to every term.
pub fn safe_search_terms_with_wildcard(query: &str, wildcard: &str) -> SearchTerms {
    let cleaned = RESERVED_CHARS.replace_all(query, " ");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return SearchTerms::default();
    }

    let terms = cleaned
        .split(' ')
        .map(|term| format!("{}{}", term, wildcard))
        .collect();

    SearchTerms { terms }
}
