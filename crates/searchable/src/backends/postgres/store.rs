//! Query execution for the PostgreSQL backend.

use async_trait::async_trait;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracing::debug;

use crate::backends::SearchStore;
use crate::error::{BackendError, SearchableError, SearchableResult};
use crate::model::SearchableModel;
use crate::query::{SelectQuery, SqlParam};

use super::backend::SearchableBackend;

/// Converts bound values into boxed driver parameters.
fn to_driver_params(params: &[SqlParam]) -> Vec<Box<dyn ToSql + Sync + Send>> {
    params
        .iter()
        .map(|param| -> Box<dyn ToSql + Sync + Send> {
            match param {
                SqlParam::Text(s) => Box::new(s.clone()),
                SqlParam::Float(f) => Box::new(*f),
                SqlParam::Integer(i) => Box::new(*i),
                SqlParam::Bool(b) => Box::new(*b),
                SqlParam::Timestamp(dt) => Box::new(*dt),
                SqlParam::Null => Box::new(Option::<String>::None),
            }
        })
        .collect()
}

fn query_error(message: String) -> SearchableError {
    SearchableError::Backend(BackendError::QueryError { message })
}

#[async_trait]
impl SearchStore for SearchableBackend {
    type Row = Row;

    async fn install_model(&self, model: &SearchableModel) -> SearchableResult<bool> {
        self.install_model_ddl(model).await
    }

    async fn uninstall_model(&self, model: &SearchableModel) -> SearchableResult<()> {
        self.uninstall_model_ddl(model).await
    }

    async fn fetch(&self, query: &SelectQuery) -> SearchableResult<Vec<Row>> {
        let (sql, params) = query.to_positional()?;
        let params = to_driver_params(&params);
        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        debug!(sql = %sql, params = param_refs.len(), "Executing search query");

        let client = self.get_client().await?;
        client
            .query(&sql, &param_refs)
            .await
            .map_err(|e| query_error(format!("Failed to execute search query: {}", e)))
    }

    async fn count(&self, query: &SelectQuery) -> SearchableResult<u64> {
        let (sql, params) = query.count_positional()?;
        let params = to_driver_params(&params);
        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let client = self.get_client().await?;
        let row = client
            .query_one(&sql, &param_refs)
            .await
            .map_err(|e| query_error(format!("Failed to execute count query: {}", e)))?;

        let count: i64 = row.get(0);
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_params_preserve_order_and_arity() {
        let params = to_driver_params(&[
            SqlParam::text("hello:*"),
            SqlParam::Integer(3),
            SqlParam::Null,
        ]);
        assert_eq!(params.len(), 3);
    }
}
