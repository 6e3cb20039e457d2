//! A minimal `SELECT` builder over searchable models.

use crate::error::SearchError;
use crate::filter::quote_identifier;
use crate::registry::SharedRegistry;

use super::SearchQuery;
use super::fragment::{SqlParam, bind_param, lookup, to_positional};

/// A `SELECT` over one table, with conditions and named parameters.
///
/// Built for a registered model, the table to search is inferred from the
/// registry, including joined inheritance chains. Built for a bare table,
/// there is nothing to infer from and searches must name the table.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    entity: Option<String>,
    from: String,
    columns: Vec<String>,
    conditions: Vec<String>,
    params: Vec<(String, SqlParam)>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    registry: Option<SharedRegistry>,
}

impl SelectQuery {
    /// Selects from a table that is not backed by a registered model.
    pub fn from_table(table: &str) -> Self {
        Self::with_from(None, quote_identifier(table), None)
    }

    /// Selects rows of the registered model `entity`.
    ///
    /// For a model with searchable ancestors the ancestor tables are joined
    /// on the primary key, so their search vectors can be filtered on. An
    /// unregistered entity is selected by name, and any search without an
    /// explicit table fails with [`SearchError::TableNotInferred`].
    pub fn for_model(registry: &SharedRegistry, entity: &str) -> Self {
        let from = {
            let reg = registry.read();
            match reg.get(entity) {
                Some(model) => {
                    let mut from = quote_identifier(&model.table_name);
                    let mut child = model;
                    while let Some(parent) = child
                        .searchable_parent
                        .as_deref()
                        .and_then(|name| reg.get(name))
                    {
                        from.push_str(&format!(
                            " JOIN {parent} ON {parent}.{parent_pk} = {child}.{child_pk}",
                            parent = quote_identifier(&parent.table_name),
                            parent_pk = parent.primary_key,
                            child = quote_identifier(&child.table_name),
                            child_pk = child.primary_key,
                        ));
                        child = parent;
                    }
                    from
                }
                None => quote_identifier(entity),
            }
        };

        Self::with_from(Some(entity.to_string()), from, Some(SharedRegistry::clone(registry)))
    }

    fn with_from(entity: Option<String>, from: String, registry: Option<SharedRegistry>) -> Self {
        Self {
            entity,
            from,
            columns: Vec::new(),
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            registry,
        }
    }

    /// Sets the selected columns; defaults to `*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an `ORDER BY` expression.
    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by.push(expr.into());
        self
    }

    /// Sets `LIMIT`.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets `OFFSET`.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// The model this query selects, if any.
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Conditions in the order they were added.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Bound parameters in binding order.
    pub fn params(&self) -> &[(String, SqlParam)] {
        &self.params
    }

    /// The value bound to `name`.
    pub fn param(&self, name: &str) -> Option<&SqlParam> {
        lookup(&self.params, name)
    }

    fn where_clause(&self) -> String {
        match self.conditions.as_slice() {
            [] => String::new(),
            [single] => format!(" WHERE {}", single),
            many => format!(
                " WHERE {}",
                many.iter()
                    .map(|c| format!("({})", c))
                    .collect::<Vec<_>>()
                    .join(" AND ")
            ),
        }
    }

    /// Renders the query with `:name` placeholders.
    pub fn sql(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}{}", columns, self.from, self.where_clause());
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
        sql
    }

    /// Renders a `COUNT(*)` over the same rows, with `:name` placeholders.
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {}{}", self.from, self.where_clause())
    }

    /// Renders the query for execution, with `$N` placeholders.
    pub fn to_positional(&self) -> Result<(String, Vec<SqlParam>), SearchError> {
        to_positional(&self.sql(), &self.params)
    }

    /// Renders the count query for execution, with `$N` placeholders.
    pub fn count_positional(&self) -> Result<(String, Vec<SqlParam>), SearchError> {
        to_positional(&self.count_sql(), &self.params)
    }
}

impl SearchQuery for SelectQuery {
    fn filter(mut self, condition: String) -> Self {
        self.conditions.push(condition);
        self
    }

    fn bind(mut self, name: &str, value: SqlParam) -> Self {
        bind_param(&mut self.params, name.to_string(), value);
        self
    }

    fn searchable_table(&self) -> Result<String, SearchError> {
        match (&self.entity, &self.registry) {
            (Some(entity), Some(registry)) => registry.read().searchable_table(entity),
            _ => Err(SearchError::TableNotInferred {
                entity: self.from.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchableModel;
    use crate::query::SearchQueryExt;
    use crate::registry::SearchableRegistry;

    fn registry() -> SharedRegistry {
        SearchableRegistry::from_models([
            SearchableModel::new("TextItem", "textitem").with_columns(["name", "content"]),
            SearchableModel::new("Article", "article").inherits("TextItem"),
        ])
        .unwrap()
        .into_shared()
    }

    #[test]
    fn test_plain_select() {
        let query = SelectQuery::from_table("users");
        assert_eq!(query.sql(), "SELECT * FROM \"users\"");
        assert_eq!(query.count_sql(), "SELECT COUNT(*) FROM \"users\"");
    }

    #[test]
    fn test_select_with_clauses() {
        let query = SelectQuery::from_table("users")
            .columns(["id", "name"])
            .filter("active = :active".to_string())
            .bind("active", SqlParam::Bool(true))
            .order_by("name")
            .limit(10)
            .offset(20);
        assert_eq!(
            query.sql(),
            "SELECT id, name FROM \"users\" WHERE active = :active ORDER BY name LIMIT 10 OFFSET 20"
        );
        let (sql, params) = query.to_positional().unwrap();
        assert_eq!(
            sql,
            "SELECT id, name FROM \"users\" WHERE active = $1 ORDER BY name LIMIT 10 OFFSET 20"
        );
        assert_eq!(params, vec![SqlParam::Bool(true)]);
    }

    #[test]
    fn test_search_on_registered_model() {
        let query = SelectQuery::for_model(&registry(), "TextItem")
            .search("hello world", None, None)
            .unwrap();
        assert_eq!(
            query.sql(),
            "SELECT * FROM \"textitem\" WHERE \"textitem\".search_vector @@ to_tsquery(:term)"
        );
        assert_eq!(query.param("term"), Some(&SqlParam::text("hello:* & world:*")));

        let (sql, params) = query.to_positional().unwrap();
        assert!(sql.ends_with("to_tsquery($1)"));
        assert_eq!(params, vec![SqlParam::text("hello:* & world:*")]);
    }

    #[test]
    fn test_search_on_child_model_joins_parent() {
        let query = SelectQuery::for_model(&registry(), "Article")
            .search("rust", None, Some("english"))
            .unwrap();
        assert_eq!(
            query.sql(),
            "SELECT * FROM \"article\" JOIN \"textitem\" ON \"textitem\".id = \"article\".id WHERE \"textitem\".search_vector @@ to_tsquery('english', :term)"
        );
    }

    #[test]
    fn test_search_on_grandchild_joins_every_ancestor() {
        let registry = SearchableRegistry::from_models([
            SearchableModel::new("TextItem", "textitem").with_columns(["name", "content"]),
            SearchableModel::new("Article", "article").inherits("TextItem"),
            SearchableModel::new("NewsArticle", "news_article")
                .inherits("Article")
                .with_primary_key("article_id"),
        ])
        .unwrap()
        .into_shared();

        let query = SelectQuery::for_model(&registry, "NewsArticle")
            .search("breaking", None, None)
            .unwrap();
        assert_eq!(
            query.sql(),
            "SELECT * FROM \"news_article\" \
             JOIN \"article\" ON \"article\".id = \"news_article\".article_id \
             JOIN \"textitem\" ON \"textitem\".id = \"article\".id \
             WHERE \"textitem\".search_vector @@ to_tsquery(:term)"
        );
    }

    #[test]
    fn test_search_combines_with_existing_filters() {
        let query = SelectQuery::for_model(&registry(), "TextItem")
            .filter("\"textitem\".id > :min_id".to_string())
            .bind("min_id", SqlParam::Integer(5))
            .search("foo", None, None)
            .unwrap();
        let (sql, params) = query.count_positional().unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM \"textitem\" WHERE (\"textitem\".id > $1) AND (\"textitem\".search_vector @@ to_tsquery($2))"
        );
        assert_eq!(
            params,
            vec![SqlParam::Integer(5), SqlParam::text("foo:*")]
        );
    }

    #[test]
    fn test_empty_search_leaves_query_alone() {
        let query = SelectQuery::for_model(&registry(), "TextItem");
        let before = query.sql();
        let after = query.search("", None, None).unwrap();
        assert_eq!(after.sql(), before);
        assert!(after.params().is_empty());
    }

    #[test]
    fn test_bare_table_cannot_infer() {
        let err = SelectQuery::from_table("users")
            .search("hello", None, None)
            .unwrap_err();
        assert!(matches!(err, SearchError::TableNotInferred { .. }));

        let ok = SelectQuery::from_table("users")
            .search("hello", Some("users"), None)
            .unwrap();
        assert_eq!(ok.conditions().len(), 1);
    }

    #[test]
    fn test_unregistered_entity_cannot_infer() {
        let err = SelectQuery::for_model(&registry(), "Order")
            .search("hello", None, None)
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::TableNotInferred {
                entity: "Order".to_string()
            }
        );
    }
}
