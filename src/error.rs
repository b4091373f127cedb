//! Error taxonomy for store, operation and container failures.
//!
//! Store-level faults (storage, evaluation, loading) are kept as distinct
//! variants from caller programming errors (malformed operation text,
//! category mismatches) so callers can handle each consciously instead of
//! matching on strings.

use oxigraph::sparql::EvaluationError;
use oxigraph::store::{LoaderError, StorageError};
use thiserror::Error;

/// Errors produced by the resource store, operation builder and containers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation text could not be parsed as SPARQL.
    ///
    /// Raised at build time, before any store interaction.
    #[error("malformed SPARQL operation: {message}")]
    MalformedSyntax { message: String },

    /// The parsed operation category differs from the one the caller
    /// declared. Always a caller programming error, never retried.
    #[error("Query is a SPARQL {actual} query. Expected a {expected} query.")]
    UnexpectedCategory {
        actual: &'static str,
        expected: &'static str,
    },

    /// Low-level storage failure from the underlying store.
    #[error("store access failed: {0}")]
    Storage(#[from] StorageError),

    /// Failure while evaluating a prepared operation against the store.
    #[error("operation evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    /// Failure while loading serialized RDF into the store.
    #[error("RDF load failed: {0}")]
    Load(#[from] LoaderError),

    /// Internal invariant violated.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

/// Crate-level result type.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
