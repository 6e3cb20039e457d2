//! Searchable model declarations.
//!
//! A [`SearchableModel`] describes a mapped table whose rows carry a
//! `tsvector` column kept in sync by a trigger. Registering it (see
//! [`crate::registry`]) yields the DDL that provisions the column, its GIN
//! index and the update trigger.
//!
//! # Joined inheritance
//!
//! A model that extends a searchable parent declares it explicitly with
//! [`SearchableModel::inherits`]. Such a model provisions nothing itself:
//! searches against it use the parent's table and vector.
//!
//! ```
//! use pg_searchable::model::SearchableModel;
//!
//! let article = SearchableModel::new("Article", "article")
//!     .with_columns(["name", "content"]);
//!
//! let ddl = article.ddl_statements().unwrap();
//! assert_eq!(ddl[0], "ALTER TABLE article ADD COLUMN search_vector tsvector");
//! assert_eq!(ddl[1], "CREATE INDEX article_search_index ON article USING gin(search_vector)");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Declaration of a searchable model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableModel {
    /// Model name used for registration and table inference.
    pub name: String,

    /// Table the model is mapped to.
    pub table_name: String,

    /// Text columns that feed the search vector.
    #[serde(default)]
    pub searchable_columns: Vec<String>,

    /// Name of the tsvector column.
    #[serde(default = "default_search_vector_name")]
    pub search_vector_name: String,

    /// Text search configuration passed to `tsvector_update_trigger`.
    #[serde(default = "default_search_catalog")]
    pub search_catalog: String,

    /// Trigger name; defaults to `<table>_search_update`.
    #[serde(default)]
    pub search_trigger_name: Option<String>,

    /// Index name; defaults to `<table>_search_index`.
    #[serde(default)]
    pub search_index_name: Option<String>,

    /// Searchable parent model in a joined inheritance hierarchy.
    #[serde(default)]
    pub searchable_parent: Option<String>,

    /// Table searched by filters, overriding inference.
    #[serde(default)]
    pub search_tablename: Option<String>,

    /// Column joining this table to its searchable parent.
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
}

fn default_search_vector_name() -> String {
    "search_vector".to_string()
}

fn default_search_catalog() -> String {
    "pg_catalog.english".to_string()
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl SearchableModel {
    /// Creates a model mapped to `table_name` with default search options.
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            searchable_columns: Vec::new(),
            search_vector_name: default_search_vector_name(),
            search_catalog: default_search_catalog(),
            search_trigger_name: None,
            search_index_name: None,
            searchable_parent: None,
            search_tablename: None,
            primary_key: default_primary_key(),
        }
    }

    /// Sets the columns that feed the search vector.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a single searchable column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.searchable_columns.push(column.into());
        self
    }

    /// Sets the tsvector column name.
    pub fn with_vector_name(mut self, name: impl Into<String>) -> Self {
        self.search_vector_name = name.into();
        self
    }

    /// Sets the text search configuration.
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.search_catalog = catalog.into();
        self
    }

    /// Sets the trigger name.
    pub fn with_trigger_name(mut self, name: impl Into<String>) -> Self {
        self.search_trigger_name = Some(name.into());
        self
    }

    /// Sets the index name.
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.search_index_name = Some(name.into());
        self
    }

    /// Declares a searchable parent for joined inheritance.
    pub fn inherits(mut self, parent: impl Into<String>) -> Self {
        self.searchable_parent = Some(parent.into());
        self
    }

    /// Overrides the table used by search filters.
    pub fn with_search_tablename(mut self, table: impl Into<String>) -> Self {
        self.search_tablename = Some(table.into());
        self
    }

    /// Sets the column joining this table to its parent.
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Returns true if the model owns its search vector.
    pub fn is_root(&self) -> bool {
        self.searchable_parent.is_none()
    }

    /// Effective trigger name.
    pub fn trigger_name(&self) -> String {
        self.search_trigger_name
            .clone()
            .unwrap_or_else(|| format!("{}_search_update", self.table_name))
    }

    /// Effective index name.
    pub fn index_name(&self) -> String {
        self.search_index_name
            .clone()
            .unwrap_or_else(|| format!("{}_search_index", self.table_name))
    }

    /// Checks that a root model has columns to index.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.is_root() && self.searchable_columns.is_empty() {
            return Err(SchemaError::NoSearchableColumns {
                model: self.name.clone(),
            });
        }
        Ok(())
    }

    /// DDL that provisions the search vector, run after the table is created.
    ///
    /// Models with a searchable parent produce no statements.
    pub fn ddl_statements(&self) -> Result<Vec<String>, SchemaError> {
        if !self.is_root() {
            return Ok(Vec::new());
        }
        self.validate()?;

        let table = &self.table_name;
        let vector = &self.search_vector_name;

        let mut trigger_args = vec![vector.clone(), format!("'{}'", self.search_catalog)];
        trigger_args.extend(self.searchable_columns.iter().cloned());

        Ok(vec![
            format!("ALTER TABLE {} ADD COLUMN {} tsvector", table, vector),
            format!(
                "CREATE INDEX {} ON {} USING gin({})",
                self.index_name(),
                table,
                vector
            ),
            format!(
                "CREATE TRIGGER {} BEFORE UPDATE OR INSERT ON {} FOR EACH ROW EXECUTE PROCEDURE tsvector_update_trigger({})",
                self.trigger_name(),
                table,
                trigger_args.join(", ")
            ),
        ])
    }

    /// DDL that removes everything [`ddl_statements`](Self::ddl_statements) created.
    pub fn drop_statements(&self) -> Vec<String> {
        if !self.is_root() {
            return Vec::new();
        }
        let table = &self.table_name;
        vec![
            format!("DROP TRIGGER IF EXISTS {} ON {}", self.trigger_name(), table),
            format!("DROP INDEX IF EXISTS {}", self.index_name()),
            format!(
                "ALTER TABLE {} DROP COLUMN IF EXISTS {}",
                table, self.search_vector_name
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_item() -> SearchableModel {
        SearchableModel::new("TextItem", "textitem").with_columns(["name", "content"])
    }

    #[test]
    fn test_defaults() {
        let model = text_item();
        assert_eq!(model.search_vector_name, "search_vector");
        assert_eq!(model.search_catalog, "pg_catalog.english");
        assert_eq!(model.trigger_name(), "textitem_search_update");
        assert_eq!(model.index_name(), "textitem_search_index");
        assert_eq!(model.primary_key, "id");
        assert!(model.is_root());
    }

    #[test]
    fn test_ddl_statements() {
        let ddl = text_item().ddl_statements().unwrap();
        assert_eq!(
            ddl,
            vec![
                "ALTER TABLE textitem ADD COLUMN search_vector tsvector".to_string(),
                "CREATE INDEX textitem_search_index ON textitem USING gin(search_vector)"
                    .to_string(),
                "CREATE TRIGGER textitem_search_update BEFORE UPDATE OR INSERT ON textitem FOR EACH ROW EXECUTE PROCEDURE tsvector_update_trigger(search_vector, 'pg_catalog.english', name, content)"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_custom_names() {
        let model = text_item()
            .with_vector_name("fts")
            .with_catalog("pg_catalog.finnish")
            .with_trigger_name("tr")
            .with_index_name("ix");
        let ddl = model.ddl_statements().unwrap();
        assert_eq!(ddl[0], "ALTER TABLE textitem ADD COLUMN fts tsvector");
        assert_eq!(ddl[1], "CREATE INDEX ix ON textitem USING gin(fts)");
        assert!(ddl[2].starts_with("CREATE TRIGGER tr BEFORE UPDATE OR INSERT ON textitem"));
        assert!(
            ddl[2].ends_with("tsvector_update_trigger(fts, 'pg_catalog.finnish', name, content)")
        );
    }

    #[test]
    fn test_no_columns_is_error() {
        let model = SearchableModel::new("Empty", "empty");
        assert_eq!(
            model.ddl_statements(),
            Err(SchemaError::NoSearchableColumns {
                model: "Empty".to_string()
            })
        );
    }

    #[test]
    fn test_child_model_has_no_ddl() {
        // Children of a searchable parent need no columns of their own.
        let child = SearchableModel::new("Article", "article").inherits("TextItem");
        assert!(child.validate().is_ok());
        assert!(child.ddl_statements().unwrap().is_empty());
        assert!(child.drop_statements().is_empty());
    }

    #[test]
    fn test_drop_statements() {
        let drops = text_item().drop_statements();
        assert_eq!(
            drops,
            vec![
                "DROP TRIGGER IF EXISTS textitem_search_update ON textitem".to_string(),
                "DROP INDEX IF EXISTS textitem_search_index".to_string(),
                "ALTER TABLE textitem DROP COLUMN IF EXISTS search_vector".to_string(),
            ]
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"name": "TextItem", "table_name": "textitem", "searchable_columns": ["name"]}"#;
        let model: SearchableModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.search_vector_name, "search_vector");
        assert_eq!(model.search_catalog, "pg_catalog.english");
        assert!(model.searchable_parent.is_none());
        assert_eq!(model.searchable_columns, vec!["name".to_string()]);
    }
}
