//! Database backends that provision search schema and run searches.
//!
//! Only PostgreSQL is supported; it is gated behind the `postgres` feature
//! (enabled by default).
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | PostgreSQL | `postgres` | tsvector columns, GIN indexes, `tsvector_update_trigger` |

use async_trait::async_trait;

use crate::error::SearchableResult;
use crate::model::SearchableModel;
use crate::query::SelectQuery;
use crate::registry::SearchableRegistry;

#[cfg(feature = "postgres")]
pub mod postgres;

/// Storage that can provision search vectors and execute search queries.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Row type returned by [`fetch`](Self::fetch).
    type Row: Send;

    /// Runs the provisioning DDL for one model.
    ///
    /// Returns `false` if the model was already provisioned or owns no
    /// search vector.
    async fn install_model(&self, model: &SearchableModel) -> SearchableResult<bool>;

    /// Removes the search vector, index and trigger of one model.
    async fn uninstall_model(&self, model: &SearchableModel) -> SearchableResult<()>;

    /// Provisions every registered model, returning how many were installed.
    async fn install_search_schema(
        &self,
        registry: &SearchableRegistry,
    ) -> SearchableResult<usize> {
        let mut installed = 0;
        for model in registry.models() {
            if self.install_model(model).await? {
                installed += 1;
            }
        }
        Ok(installed)
    }

    /// Executes a query and returns its rows.
    async fn fetch(&self, query: &SelectQuery) -> SearchableResult<Vec<Self::Row>>;

    /// Counts the rows a query matches.
    async fn count(&self, query: &SelectQuery) -> SearchableResult<u64>;
}
