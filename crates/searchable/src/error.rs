//! Error types for searchable models and search filters.
//!
//! Errors are split by the phase in which they occur: schema definition
//! (registering models and generating DDL), search filter construction,
//! and execution against the database backend.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Error, Debug)]
pub enum SearchableError {
    /// Schema definition errors
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Search filter errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors raised while declaring searchable models.
///
/// These indicate a configuration mistake and are not recoverable at runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A root searchable model declares no columns to index.
    #[error("no searchable columns defined for model {model}")]
    NoSearchableColumns { model: String },

    /// A model with the same name has already been registered.
    #[error("searchable model already registered: {model}")]
    DuplicateModel { model: String },

    /// A model names a searchable parent that is not registered.
    #[error("model {model} declares unknown searchable parent {parent}")]
    UnknownParent { model: String, parent: String },

    /// A model definition file could not be read.
    #[error("invalid model definition: {message}")]
    InvalidDefinition { message: String },
}

/// Errors raised while attaching a search filter to a query.
///
/// "No terms" is never an error: it is reported by returning the query
/// unchanged. These variants mean the query cannot be searched at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The searchable table could not be determined for the query's entity.
    #[error("cannot determine searchable table for {entity}")]
    TableNotInferred { entity: String },

    /// A `:name` placeholder has no bound value.
    #[error("no value bound for parameter :{name}")]
    UnboundParameter { name: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema installation error.
    #[error("schema installation failed for {model}: {message}")]
    SchemaInstallFailed { model: String, message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },
}

/// Result type for operations in this crate.
pub type SearchableResult<T> = Result<T, SearchableError>;
