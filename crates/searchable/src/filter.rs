//! Search filter predicates.
//!
//! Builds the `WHERE` condition that matches a table's search vector against
//! the bound `:term` parameter. Only the caller-trusted table and language
//! are interpolated; user input always travels through the parameter.

/// Name of the tsvector column searched by filters.
pub const SEARCH_VECTOR_COLUMN: &str = "search_vector";

/// Name of the parameter bound to the joined search terms.
pub const TERM_PARAM: &str = "term";

/// Adds double quotes to the given identifier.
///
/// PostgreSQL is the only supported dialect, so no dialect-specific quoting
/// is needed.
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

/// Builds the search predicate for `tablename`.
///
/// With a language the configuration is passed to `to_tsquery`:
///
/// ```
/// use pg_searchable::filter::search_filter;
///
/// assert_eq!(
///     search_filter("users", None),
///     r#""users".search_vector @@ to_tsquery(:term)"#
/// );
/// assert_eq!(
///     search_filter("users", Some("english")),
///     r#""users".search_vector @@ to_tsquery('english', :term)"#
/// );
/// ```
pub fn search_filter(tablename: &str, language: Option<&str>) -> String {
    match language {
        None => format!(
            "{}.{} @@ to_tsquery(:{})",
            quote_identifier(tablename),
            SEARCH_VECTOR_COLUMN,
            TERM_PARAM
        ),
        Some(language) => format!(
            "{}.{} @@ to_tsquery('{}', :{})",
            quote_identifier(tablename),
            SEARCH_VECTOR_COLUMN,
            language,
            TERM_PARAM
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "\"users\"");
        assert_eq!(quote_identifier("text_item"), "\"text_item\"");
    }

    #[test]
    fn test_filter_without_language() {
        assert_eq!(
            search_filter("users", None),
            "\"users\".search_vector @@ to_tsquery(:term)"
        );
    }

    #[test]
    fn test_filter_with_language() {
        assert_eq!(
            search_filter("users", Some("english")),
            "\"users\".search_vector @@ to_tsquery('english', :term)"
        );
        assert_eq!(
            search_filter("article", Some("finnish")),
            "\"article\".search_vector @@ to_tsquery('finnish', :term)"
        );
    }
}
