//! Searchable DDL CLI
//!
//! Prints (and optionally applies) the search vector DDL for a set of
//! searchable models described in a JSON file.
//!
//! # Usage
//!
//! ```bash
//! # Print the DDL
//! searchable-ddl models.json
//!
//! # Apply it to the database configured by SEARCHABLE_PG_*
//! SEARCHABLE_APPLY=1 searchable-ddl models.json
//! ```
//!
//! The model file is a JSON array of model declarations:
//!
//! ```json
//! [
//!   {"name": "TextItem", "table_name": "textitem", "searchable_columns": ["name", "content"]},
//!   {"name": "Article", "table_name": "article", "searchable_parent": "TextItem"}
//! ]
//! ```
//!
//! # Environment Variables
//!
//! - `SEARCHABLE_APPLY` - Apply the DDL instead of only printing it
//!   (requires the `postgres` feature)
//! - `SEARCHABLE_PG_HOST`, `SEARCHABLE_PG_PORT`, `SEARCHABLE_PG_DBNAME`,
//!   `SEARCHABLE_PG_USER`, `SEARCHABLE_PG_PASSWORD` - Database connection

use pg_searchable::error::SchemaError;
use pg_searchable::model::SearchableModel;
use pg_searchable::registry::SearchableRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn load_registry(path: &str) -> Result<SearchableRegistry, SchemaError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SchemaError::InvalidDefinition {
        message: format!("failed to read {}: {}", path, e),
    })?;

    let models: Vec<SearchableModel> =
        serde_json::from_str(&contents).map_err(|e| SchemaError::InvalidDefinition {
            message: format!("failed to parse {}: {}", path, e),
        })?;

    SearchableRegistry::from_models(models)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pg_searchable=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: searchable-ddl <models.json>");
        std::process::exit(2);
    };

    let registry = load_registry(&path)?;
    tracing::info!("Loaded {} searchable models from {}", registry.len(), path);

    let apply = std::env::var("SEARCHABLE_APPLY").is_ok_and(|v| v == "1" || v == "true");
    if apply {
        return apply_ddl(&registry).await;
    }

    for statement in registry.ddl_statements()? {
        println!("{};", statement);
    }

    Ok(())
}

#[cfg(feature = "postgres")]
async fn apply_ddl(registry: &SearchableRegistry) -> Result<(), Box<dyn std::error::Error>> {
    use pg_searchable::backends::SearchStore;
    use pg_searchable::backends::postgres::SearchableBackend;

    let backend = SearchableBackend::from_env().await?;
    let installed = backend.install_search_schema(registry).await?;
    tracing::info!("Installed search vectors for {} models", installed);
    Ok(())
}

#[cfg(not(feature = "postgres"))]
async fn apply_ddl(_registry: &SearchableRegistry) -> Result<(), Box<dyn std::error::Error>> {
    Err("SEARCHABLE_APPLY requires the `postgres` feature".into())
}
