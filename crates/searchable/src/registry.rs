//! Searchable model registry.
//!
//! Models are registered once during schema setup. The registry validates
//! each declaration, hands out the DDL to run after the tables are created,
//! and resolves which table a search against a given model should target.
//!
//! ```
//! use pg_searchable::model::SearchableModel;
//! use pg_searchable::registry::SearchableRegistry;
//!
//! let mut registry = SearchableRegistry::new();
//! registry
//!     .register(SearchableModel::new("TextItem", "textitem").with_columns(["name", "content"]))
//!     .unwrap();
//! registry
//!     .register(SearchableModel::new("Article", "article").inherits("TextItem"))
//!     .unwrap();
//!
//! assert_eq!(registry.searchable_table("Article").unwrap(), "textitem");
//! assert_eq!(registry.ddl_statements().unwrap().len(), 3);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{SchemaError, SearchError};
use crate::model::SearchableModel;

/// Registry shared between queries and the backend.
pub type SharedRegistry = Arc<RwLock<SearchableRegistry>>;

/// In-memory registry of searchable models, in registration order.
#[derive(Debug, Default, Clone)]
pub struct SearchableRegistry {
    models: Vec<SearchableModel>,
    by_name: HashMap<String, usize>,
}

impl SearchableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from models, registering them in order.
    pub fn from_models<I>(models: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = SearchableModel>,
    {
        let mut registry = Self::new();
        for model in models {
            registry.register(model)?;
        }
        Ok(registry)
    }

    /// Wraps the registry for shared use.
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Registers a model.
    ///
    /// Fails if the model has no searchable columns (and no parent), if the
    /// name is taken, or if its parent has not been registered yet.
    pub fn register(&mut self, model: SearchableModel) -> Result<(), SchemaError> {
        if self.by_name.contains_key(&model.name) {
            return Err(SchemaError::DuplicateModel { model: model.name });
        }

        if let Some(parent) = &model.searchable_parent {
            if !self.by_name.contains_key(parent) {
                return Err(SchemaError::UnknownParent {
                    model: model.name.clone(),
                    parent: parent.clone(),
                });
            }
        }

        model.validate()?;

        debug!(
            model = %model.name,
            table = %model.table_name,
            parent = ?model.searchable_parent,
            "Registered searchable model"
        );

        self.by_name.insert(model.name.clone(), self.models.len());
        self.models.push(model);
        Ok(())
    }

    /// Looks up a model by name.
    pub fn get(&self, name: &str) -> Option<&SearchableModel> {
        self.by_name.get(name).map(|&i| &self.models[i])
    }

    /// Returns true if a model with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registered models in registration order.
    pub fn models(&self) -> &[SearchableModel] {
        &self.models
    }

    /// Returns the root model owning the search vector for `name`.
    pub fn searchable_root(&self, name: &str) -> Option<&SearchableModel> {
        let mut current = self.get(name)?;
        while let Some(parent) = &current.searchable_parent {
            current = self.get(parent)?;
        }
        Some(current)
    }

    /// Resolves the table a search against model `name` should filter on.
    ///
    /// The nearest explicit `search_tablename` in the chain from `name` up to
    /// its root wins, so children inherit an ancestor's override. Otherwise
    /// the table of the root model is used.
    pub fn searchable_table(&self, name: &str) -> Result<String, SearchError> {
        let not_inferred = || SearchError::TableNotInferred {
            entity: name.to_string(),
        };

        let mut current = self.get(name).ok_or_else(not_inferred)?;
        loop {
            if let Some(table) = &current.search_tablename {
                return Ok(table.clone());
            }
            match &current.searchable_parent {
                Some(parent) => current = self.get(parent).ok_or_else(not_inferred)?,
                None => return Ok(current.table_name.clone()),
            }
        }
    }

    /// All provisioning DDL, in registration order.
    pub fn ddl_statements(&self) -> Result<Vec<String>, SchemaError> {
        let mut statements = Vec::new();
        for model in &self.models {
            statements.extend(model.ddl_statements()?);
        }
        Ok(statements)
    }
}
