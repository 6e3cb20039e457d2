//! PostgreSQL full-text search for mapped models.
//!
//! This crate adds `tsvector`-based search to tables described by
//! [`SearchableModel`](model::SearchableModel) declarations. It covers two
//! concerns:
//!
//! - **Schema provisioning**: registering a model yields the DDL that adds a
//!   `search_vector` column, a GIN index over it, and a trigger that keeps
//!   the vector in sync with the model's text columns.
//! - **Search filters**: a free-text query is sanitized into prefix-matched
//!   terms and attached to a query as a `to_tsquery` predicate, with the
//!   terms passed as the bound parameter `:term`.
//!
//! # Architecture
//!
//! - [`terms`] - Sanitizes raw search strings into tsquery terms
//! - [`filter`] - Builds the `search_vector @@ to_tsquery(...)` predicate
//! - [`query`] - The query-context trait, [`search`](query::search) and a `SELECT` builder
//! - [`model`] - Searchable model declarations and their DDL
//! - [`registry`] - Explicit model registration and table inference
//! - [`backends`] - PostgreSQL execution (feature `postgres`)
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use pg_searchable::model::SearchableModel;
//! use pg_searchable::query::{SearchQueryExt, SelectQuery, SqlParam};
//! use pg_searchable::registry::SearchableRegistry;
//!
//! let registry = SearchableRegistry::from_models([
//!     SearchableModel::new("TextItem", "textitem").with_columns(["name", "content"]),
//!     SearchableModel::new("Article", "article").inherits("TextItem"),
//! ])
//! .unwrap();
//!
//! // DDL to run once the tables exist
//! for statement in registry.ddl_statements().unwrap() {
//!     println!("{};", statement);
//! }
//!
//! // Searching an inherited model filters on the parent's vector
//! let registry = registry.into_shared();
//! let query = SelectQuery::for_model(&registry, "Article")
//!     .search("joined inheritance", None, Some("english"))
//!     .unwrap();
//!
//! assert_eq!(
//!     query.param("term"),
//!     Some(&SqlParam::text("joined:* & inheritance:*"))
//! );
//! ```
//!
//! # Searching
//!
//! An empty search, or one made only of tsquery operators, leaves the query
//! untouched. A search whose target table cannot be determined is an error,
//! never a silent no-op:
//!
//! ```
//! use pg_searchable::error::SearchError;
//! use pg_searchable::query::{SearchQueryExt, SelectQuery};
//!
//! let query = SelectQuery::from_table("users");
//! let unchanged = query.clone().search("  !!  ", None, None).unwrap();
//! assert_eq!(unchanged.sql(), query.sql());
//!
//! let err = query.search("hello", None, None).unwrap_err();
//! assert!(matches!(err, SearchError::TableNotInferred { .. }));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod error;
pub mod filter;
pub mod model;
pub mod query;
pub mod registry;
pub mod terms;

pub use error::{SearchableError, SearchableResult};
pub use query::search;
pub use terms::safe_search_terms;
