//! Provisioning of search vectors, GIN indexes and update triggers.

use tracing::{debug, info, warn};

use crate::error::{BackendError, SearchableError, SearchableResult};
use crate::model::SearchableModel;

use super::backend::{SearchableBackend, internal_error};

impl SearchableBackend {
    /// Checks whether the model's search vector column already exists.
    pub async fn search_schema_exists(&self, model: &SearchableModel) -> SearchableResult<bool> {
        let client = self.get_client().await?;

        let row = client
            .query_opt(
                "SELECT 1 FROM information_schema.columns
                 WHERE table_schema = ANY(current_schemas(false))
                   AND table_name = lower($1)
                   AND column_name = lower($2)",
                &[&model.table_name, &model.search_vector_name],
            )
            .await
            .map_err(|e| internal_error(format!("Failed to inspect search vector column: {}", e)))?;

        Ok(row.is_some())
    }

    /// Runs the model's provisioning DDL in a single transaction.
    pub(crate) async fn install_model_ddl(
        &self,
        model: &SearchableModel,
    ) -> SearchableResult<bool> {
        if !model.is_root() {
            debug!(model = %model.name, "Model inherits its search vector; nothing to install");
            return Ok(false);
        }

        let statements = model.ddl_statements()?;

        if self.search_schema_exists(model).await? {
            warn!(
                model = %model.name,
                table = %model.table_name,
                "Search vector already present; skipping installation"
            );
            return Ok(false);
        }

        let mut client = self.get_client().await?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        // Dropping `tx` on an early return rolls the whole install back.
        for sql in &statements {
            tx.execute(sql.as_str(), &[])
                .await
                .map_err(|e| install_error(model, e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| install_error(model, format!("commit failed: {}", e)))?;

        info!(
            model = %model.name,
            table = %model.table_name,
            index = %model.index_name(),
            trigger = %model.trigger_name(),
            "Installed search vector"
        );
        Ok(true)
    }

    /// Drops the model's trigger, index and search vector column.
    pub(crate) async fn uninstall_model_ddl(
        &self,
        model: &SearchableModel,
    ) -> SearchableResult<()> {
        let client = self.get_client().await?;
        for sql in model.drop_statements() {
            client
                .execute(sql.as_str(), &[])
                .await
                .map_err(|e| install_error(model, e.to_string()))?;
        }
        info!(model = %model.name, "Removed search vector");
        Ok(())
    }
}

fn install_error(model: &SearchableModel, message: String) -> SearchableError {
    SearchableError::Backend(BackendError::SchemaInstallFailed {
        model: model.name.clone(),
        message,
    })
}
