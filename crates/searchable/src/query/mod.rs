//! Attaching full-text search filters to queries.
//!
//! [`SearchQuery`] is the capability a host query type provides: it can take
//! an extra `WHERE` condition, a named parameter binding, and can (usually)
//! tell which searchable table it targets. [`search`] combines the term
//! sanitizer and the filter builder on top of it.
//!
//! # Example
//!
//! ```
//! use pg_searchable::model::SearchableModel;
//! use pg_searchable::query::{SearchQueryExt, SelectQuery, SqlParam};
//! use pg_searchable::registry::SearchableRegistry;
//!
//! let registry = SearchableRegistry::from_models([
//!     SearchableModel::new("TextItem", "textitem").with_columns(["name", "content"]),
//! ])
//! .unwrap()
//! .into_shared();
//!
//! let query = SelectQuery::for_model(&registry, "TextItem")
//!     .search("hello world", None, None)
//!     .unwrap();
//!
//! assert_eq!(
//!     query.conditions(),
//!     [r#""textitem".search_vector @@ to_tsquery(:term)"#]
//! );
//! assert_eq!(query.param("term"), Some(&SqlParam::text("hello:* & world:*")));
//! ```

mod fragment;
mod select;

pub use fragment::{SqlFragment, SqlParam, to_positional};
pub use select::SelectQuery;

use tracing::debug;

use crate::error::SearchError;
use crate::filter::{self, TERM_PARAM};
use crate::terms::safe_search_terms;

/// A query that search filters can be attached to.
pub trait SearchQuery: Sized {
    /// Adds a condition, ANDed with the existing ones.
    fn filter(self, condition: String) -> Self;

    /// Binds a value to a `:name` placeholder.
    fn bind(self, name: &str, value: SqlParam) -> Self;

    /// Determines the searchable table this query targets.
    fn searchable_table(&self) -> Result<String, SearchError>;

    /// Builds the search predicate for `tablename`.
    ///
    /// Override to customize the predicate for a query type.
    fn search_filter(&self, tablename: &str, language: Option<&str>) -> String {
        filter::search_filter(tablename, language)
    }
}

/// Filters `query` by a full-text search for `search_query`.
///
/// Returns the query untouched when the search string is empty or contains
/// nothing searchable. When `tablename` is `None` the target table is taken
/// from [`SearchQuery::searchable_table`]; if that fails the error is
/// returned rather than skipping the filter.
pub fn search<Q: SearchQuery>(
    query: Q,
    search_query: &str,
    tablename: Option<&str>,
    language: Option<&str>,
) -> Result<Q, SearchError> {
    if search_query.is_empty() {
        return Ok(query);
    }

    let terms = safe_search_terms(search_query);
    if terms.is_empty() {
        return Ok(query);
    }

    let tablename = match tablename {
        Some(table) => table.to_string(),
        None => query.searchable_table()?,
    };

    let condition = query.search_filter(&tablename, language);
    debug!(table = %tablename, terms = terms.len(), "Attaching search filter");

    Ok(query
        .filter(condition)
        .bind(TERM_PARAM, SqlParam::Text(terms.joined())))
}

/// Method-call form of [`search`] for any [`SearchQuery`].
pub trait SearchQueryExt: SearchQuery {
    /// See [`search`].
    fn search(
        self,
        search_query: &str,
        tablename: Option<&str>,
        language: Option<&str>,
    ) -> Result<Self, SearchError> {
        crate::query::search(self, search_query, tablename, language)
    }
}

impl<Q: SearchQuery> SearchQueryExt for Q {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal query context recording what gets attached.
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Recorder {
        table: Option<String>,
        conditions: Vec<String>,
        params: Vec<(String, SqlParam)>,
    }

    impl SearchQuery for Recorder {
        fn filter(mut self, condition: String) -> Self {
            self.conditions.push(condition);
            self
        }

        fn bind(mut self, name: &str, value: SqlParam) -> Self {
            self.params.push((name.to_string(), value));
            self
        }

        fn searchable_table(&self) -> Result<String, SearchError> {
            self.table.clone().ok_or_else(|| SearchError::TableNotInferred {
                entity: "Recorder".to_string(),
            })
        }
    }

    /// Query type overriding the predicate.
    #[derive(Debug, Default)]
    struct CustomFilter(Recorder);

    impl SearchQuery for CustomFilter {
        fn filter(self, condition: String) -> Self {
            CustomFilter(self.0.filter(condition))
        }

        fn bind(self, name: &str, value: SqlParam) -> Self {
            CustomFilter(self.0.bind(name, value))
        }

        fn searchable_table(&self) -> Result<String, SearchError> {
            self.0.searchable_table()
        }

        fn search_filter(&self, tablename: &str, _language: Option<&str>) -> String {
            format!("{}.fts @@ to_tsquery('simple', :term)", tablename)
        }
    }

    fn inferring(table: &str) -> Recorder {
        Recorder {
            table: Some(table.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_search_is_identity() {
        let query = inferring("users");
        let result = search(query.clone(), "", None, None).unwrap();
        assert_eq!(result, query);
    }

    #[test]
    fn test_unsearchable_input_is_identity() {
        let query = inferring("users");
        let result = search(query.clone(), " ()|&!*@# ", None, None).unwrap();
        assert_eq!(result, query);
    }

    #[test]
    fn test_no_terms_skips_inference() {
        // A query that cannot infer its table is still fine when there is
        // nothing to search for.
        let query = Recorder::default();
        assert!(search(query, "  ", None, None).is_ok());
    }

    #[test]
    fn test_search_with_inferred_table() {
        let result = search(inferring("users"), "hello world", None, None).unwrap();
        assert_eq!(
            result.conditions,
            vec!["\"users\".search_vector @@ to_tsquery(:term)".to_string()]
        );
        assert_eq!(
            result.params,
            vec![("term".to_string(), SqlParam::text("hello:* & world:*"))]
        );
    }

    #[test]
    fn test_search_with_explicit_table_and_language() {
        let result =
            search(Recorder::default(), "hello", Some("article"), Some("english")).unwrap();
        assert_eq!(
            result.conditions,
            vec!["\"article\".search_vector @@ to_tsquery('english', :term)".to_string()]
        );
        assert_eq!(result.params[0].1, SqlParam::text("hello:*"));
    }

    #[test]
    fn test_search_without_inferable_table_fails() {
        let err = search(Recorder::default(), "hello", None, None).unwrap_err();
        assert_eq!(
            err,
            SearchError::TableNotInferred {
                entity: "Recorder".to_string()
            }
        );
    }

    #[test]
    fn test_search_uses_overridden_filter() {
        let result = CustomFilter(inferring("docs"))
            .search("rust", None, None)
            .unwrap();
        assert_eq!(
            result.0.conditions,
            vec!["docs.fts @@ to_tsquery('simple', :term)".to_string()]
        );
    }

    #[test]
    fn test_search_ext_matches_free_function() {
        let a = inferring("users").search("foo bar", None, None).unwrap();
        let b = search(inferring("users"), "foo bar", None, None).unwrap();
        assert_eq!(a, b);
    }
}
