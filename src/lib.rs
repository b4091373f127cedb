//! LDP-style resource containers and typed SPARQL operations over an
//! Oxigraph store.
//!
//! Two subsystems make up the crate:
//!
//! - [`operation`]: a typed operation builder. It classifies raw SPARQL
//!   text into one of four categories (tuple, boolean, graph, update) after
//!   substituting placeholder tokens with concrete identifiers, and only
//!   prepares an executable operation when the classified category matches
//!   the caller-declared one.
//! - [`container`]: generic hierarchical containers. A container bootstraps
//!   its own description and links every member with a containment
//!   statement; provenance attachment is an overridable hook, and each
//!   member kind's statements live in their own named-graph partition.
//!   [`assertions`] provides the built-in specialization for assertion-set
//!   resources.
//!
//! Both run against a [`store::ResourceStore`], a cheap-to-clone wrapper
//! over an Oxigraph store (persistent or in-memory).
//!
//! # Example
//!
//! ```ignore
//! use graphvault::assertions::assertion_sets_container;
//! use graphvault::operation::OperationBuilder;
//! use graphvault::store::ResourceStore;
//! use graphvault::PointedGraph;
//!
//! let store = ResourceStore::in_memory()?;
//! let container = assertion_sets_container(&store);
//! container.add(PointedGraph::new(anchor, statements))?;
//!
//! let op = OperationBuilder::boolean("ASK { ?? ?p ?o }")
//!     .resolve_this(container.iri().clone())
//!     .build(&store)?;
//! assert!(op.evaluate()?);
//! ```

pub mod assertions;
pub mod container;
pub mod error;
pub mod operation;
pub mod store;
pub mod vocab;

pub use container::{Container, PointedGraph};
pub use error::{Result, StoreError};
pub use operation::{Category, OperationBuilder};
pub use store::ResourceStore;
