//! Resource store backed by Oxigraph.
//!
//! Provides the graph-store connection the rest of the crate runs against:
//! persistent (RocksDB) or in-memory storage, subject-pattern reads across
//! all named graphs, and transactional commits of whole statement sets into
//! a single named graph.
//!
//! # Storage
//!
//! Pass a path to `open()` for durable storage; use `in_memory()` for tests
//! and ephemeral sessions. The store is cheap to clone; clones share the
//! same underlying backend.
//!
//! # Named graphs
//!
//! Containers keep each member kind's statements in its own named graph
//! (see [`crate::container::partition_graph`]), which keeps member content,
//! container bookkeeping and provenance from bleeding into each other.

use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{Graph, GraphName, NamedNodeRef, QuadRef, Triple};
use oxigraph::store::Store;
use tracing::debug;

use crate::error::{Result, StoreError};

/// Graph-store connection used by operations and containers.
///
/// # Example
///
/// ```ignore
/// use graphvault::store::ResourceStore;
///
/// let store = ResourceStore::in_memory()?;
/// store.load_turtle(
///     "<https://example.com/a> <https://example.com/p> <https://example.com/b> .",
///     &oxigraph::model::GraphName::DefaultGraph,
/// )?;
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Clone)]
pub struct ResourceStore {
    inner: Store,
}

impl std::fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("len", &self.len())
            .finish()
    }
}

impl ResourceStore {
    /// Opens or creates a persistent store at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened (permission denied,
    /// corrupted database, already locked by another process).
    pub fn open(path: &Path) -> Result<Self> {
        let inner = Store::open(path)?;
        Ok(Self { inner })
    }

    /// Creates an in-memory store (non-persistent).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be created.
    pub fn in_memory() -> Result<Self> {
        let inner = Store::new()?;
        Ok(Self { inner })
    }

    pub(crate) fn raw(&self) -> &Store {
        &self.inner
    }

    /// Returns whether any statement with the given subject exists, in any
    /// named graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store read fails.
    pub fn has_statements_about(&self, subject: NamedNodeRef<'_>) -> Result<bool> {
        let mut quads = self
            .inner
            .quads_for_pattern(Some(subject.into()), None, None, None);
        Ok(quads.next().transpose()?.is_some())
    }

    /// Reads all statements with the given subject, across all named graphs.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store read fails.
    pub fn statements_about(&self, subject: NamedNodeRef<'_>) -> Result<Graph> {
        let mut graph = Graph::new();
        for quad in self
            .inner
            .quads_for_pattern(Some(subject.into()), None, None, None)
        {
            let quad = quad?;
            graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(graph)
    }

    /// Reads all statements with the given subject and predicate, across
    /// all named graphs.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store read fails.
    pub fn statements_matching(
        &self,
        subject: NamedNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> Result<Graph> {
        let mut graph = Graph::new();
        for quad in
            self.inner
                .quads_for_pattern(Some(subject.into()), Some(predicate), None, None)
        {
            let quad = quad?;
            graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(graph)
    }

    /// Reads the full contents of one named graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store read fails.
    pub fn graph_statements(&self, graph_name: &GraphName) -> Result<Graph> {
        let mut graph = Graph::new();
        for quad in self
            .inner
            .quads_for_pattern(None, None, None, Some(graph_name.as_ref()))
        {
            let quad = quad?;
            graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(graph)
    }

    /// Commits a statement set into the given named graph as one unit.
    ///
    /// Either every statement lands or none does: the insert runs inside a
    /// single store transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; no statements are applied
    /// in that case.
    pub fn commit(&self, statements: &Graph, graph_name: &GraphName) -> Result<()> {
        debug!(statements = statements.len(), graph = %graph_name, "committing statement set");
        self.inner.transaction(|mut txn| {
            for triple in statements.iter() {
                txn.insert(QuadRef::new(
                    triple.subject,
                    triple.predicate,
                    triple.object,
                    graph_name.as_ref(),
                ))?;
            }
            Ok::<_, StoreError>(())
        })
    }

    /// Loads Turtle data into the given named graph.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or insertion fails.
    pub fn load_turtle(&self, turtle: &str, graph_name: &GraphName) -> Result<()> {
        let parser =
            RdfParser::from_format(RdfFormat::Turtle).with_default_graph(graph_name.clone());
        self.inner.load_from_reader(parser, turtle.as_bytes())?;
        Ok(())
    }

    /// Counts the statements in the store, across all named graphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len().unwrap_or(0)
    }

    /// Returns true if the store holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
