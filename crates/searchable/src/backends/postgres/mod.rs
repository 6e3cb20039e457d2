//! PostgreSQL backend implementation.
//!
//! Provisions search vectors for registered models and executes
//! [`SelectQuery`](crate::query::SelectQuery) searches through a
//! deadpool-postgres connection pool.
//!
//! # Example
//!
//! ```no_run
//! use pg_searchable::backends::SearchStore;
//! use pg_searchable::backends::postgres::{PostgresConfig, SearchableBackend};
//! use pg_searchable::model::SearchableModel;
//! use pg_searchable::query::{SearchQueryExt, SelectQuery};
//! use pg_searchable::registry::SearchableRegistry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SearchableRegistry::from_models([
//!     SearchableModel::new("TextItem", "textitem").with_columns(["name", "content"]),
//! ])?;
//!
//! let backend = SearchableBackend::new(PostgresConfig::default()).await?;
//! backend.install_search_schema(&registry).await?;
//!
//! let registry = registry.into_shared();
//! let query = SelectQuery::for_model(&registry, "TextItem").search("rust postgres", None, None)?;
//! let rows = backend.fetch(&query).await?;
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! For a model mapped to `textitem` with columns `name` and `content`:
//!
//! ```sql
//! ALTER TABLE textitem ADD COLUMN search_vector tsvector;
//! CREATE INDEX textitem_search_index ON textitem USING gin(search_vector);
//! CREATE TRIGGER textitem_search_update BEFORE UPDATE OR INSERT ON textitem
//!     FOR EACH ROW EXECUTE PROCEDURE
//!     tsvector_update_trigger(search_vector, 'pg_catalog.english', name, content);
//! ```

mod backend;
mod schema;
mod store;

pub use backend::{PostgresConfig, PostgresSslMode, SearchableBackend};
