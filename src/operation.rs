//! Typed SPARQL operation builder.
//!
//! Takes raw query/update text and prepares an executable operation against
//! a store. Placeholder tokens are substituted with concrete identifiers
//! first; the text is then parsed and its shape classified into one of four
//! operation categories, and the build fails unless the classified category
//! matches the one the caller declared.
//!
//! # Categories
//!
//! - [`TupleQuery`] for row-producing `SELECT` text
//! - [`BooleanQuery`] for single truth-value `ASK` text
//! - [`GraphQuery`] for statement-producing `CONSTRUCT` and `DESCRIBE` text
//! - [`SparqlUpdate`] for side-effecting updates with no result payload
//!
//! Classification is decided by parsing the text, never by the caller's
//! declaration; a mismatch fails the build before any store interaction.
//!
//! # Placeholders
//!
//! Two placeholder names are well known: `"this"` (token `??`, an anchored
//! context resource) and `"current-user"` (token `?__useruri__`, the acting
//! principal). Any other name maps to `?__{name}__` by the same convention.
//! A token left unbound is not an error: if it is a syntactically valid
//! variable it simply stays a free variable in the evaluated operation.
//!
//! # Example
//!
//! ```ignore
//! use graphvault::operation::OperationBuilder;
//! use graphvault::store::ResourceStore;
//!
//! let store = ResourceStore::in_memory()?;
//! let op = OperationBuilder::tuple("SELECT ?s WHERE { ?s ?p ?o } LIMIT 10").build(&store)?;
//! for row in op.evaluate()? {
//!     println!("{:?}", row?.get("s"));
//! }
//! ```

use std::collections::HashMap;
use std::marker::PhantomData;

use oxigraph::model::{NamedNode, Term, Triple};
use oxigraph::sparql::{QueryResults, QuerySolution, QuerySolutionIter, QueryTripleIter, Variable};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::ResourceStore;

/// Well-known placeholder name for the context-anchored resource (token `??`).
pub const PLACEHOLDER_THIS: &str = "this";

/// Well-known placeholder name for the acting principal (token `?__useruri__`).
pub const PLACEHOLDER_USER: &str = "current-user";

fn token_for(name: &str) -> String {
    match name {
        PLACEHOLDER_THIS => "??".to_owned(),
        PLACEHOLDER_USER => "?__useruri__".to_owned(),
        other => format!("?__{other}__"),
    }
}

/// Operation category, decided once at classification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Row-producing query.
    Tuple,
    /// Single truth-value query.
    Boolean,
    /// Statement-producing query (graph construction or resource description).
    Graph,
    /// Side-effecting update with no result payload.
    Update,
}

impl Category {
    /// Name used on the "expected" side of a category mismatch message.
    #[must_use]
    pub fn expectation(self) -> &'static str {
        match self {
            Self::Tuple => "tuple",
            Self::Boolean => "boolean",
            Self::Graph => "graph",
            Self::Update => "update",
        }
    }
}

/// Parsed shape of an operation text.
///
/// Finer-grained than [`Category`]: graph-construction and
/// resource-description forms are distinct shapes in the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationForm {
    Select,
    Ask,
    Construct,
    Describe,
    Update,
}

impl OperationForm {
    /// Classifies operation text by parsing it against the SPARQL grammar.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedSyntax`] if the text parses as neither
    /// a query nor an update.
    pub fn classify(text: &str) -> Result<Self> {
        match spargebra::Query::parse(text, None) {
            Ok(spargebra::Query::Select { .. }) => Ok(Self::Select),
            Ok(spargebra::Query::Ask { .. }) => Ok(Self::Ask),
            Ok(spargebra::Query::Construct { .. }) => Ok(Self::Construct),
            Ok(spargebra::Query::Describe { .. }) => Ok(Self::Describe),
            Err(query_error) => {
                if spargebra::Update::parse(text, None).is_ok() {
                    Ok(Self::Update)
                } else {
                    Err(StoreError::MalformedSyntax {
                        message: query_error.to_string(),
                    })
                }
            }
        }
    }

    /// The category this shape belongs to.
    #[must_use]
    pub fn category(self) -> Category {
        match self {
            Self::Select => Category::Tuple,
            Self::Ask => Category::Boolean,
            Self::Construct | Self::Describe => Category::Graph,
            Self::Update => Category::Update,
        }
    }

    /// Keyword used on the "actual" side of a category mismatch message.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Ask => "ASK",
            Self::Construct => "CONSTRUCT",
            Self::Describe => "DESCRIBE",
            Self::Update => "UPDATE",
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::TupleQuery {}
    impl Sealed for super::BooleanQuery {}
    impl Sealed for super::GraphQuery {}
    impl Sealed for super::SparqlUpdate {}
}

/// Executable operation kinds produced by [`OperationBuilder::build`].
///
/// Sealed: the four implementors mirror the four operation categories, so a
/// builder declared for one kind can only ever hand back that kind.
pub trait Operation: sealed::Sealed + Sized {
    /// Category this operation kind expects at build time.
    const CATEGORY: Category;

    #[doc(hidden)]
    fn prepare(store: ResourceStore, text: String) -> Self;
}

/// Row-producing query, prepared against a store.
#[derive(Debug)]
pub struct TupleQuery {
    store: ResourceStore,
    text: String,
}

impl TupleQuery {
    /// Evaluates the query and returns a single-pass row sequence.
    ///
    /// The underlying store cursor is released when the returned result is
    /// dropped, on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails in the store.
    pub fn evaluate(&self) -> Result<TupleResult> {
        match self.store.raw().query(self.text.as_str())? {
            QueryResults::Solutions(solutions) => Ok(TupleResult { inner: solutions }),
            _ => Err(StoreError::Invariant(
                "tuple-classified operation produced a non-tuple result".into(),
            )),
        }
    }
}

impl Operation for TupleQuery {
    const CATEGORY: Category = Category::Tuple;

    fn prepare(store: ResourceStore, text: String) -> Self {
        Self { store, text }
    }
}

/// Single truth-value query, prepared against a store.
#[derive(Debug)]
pub struct BooleanQuery {
    store: ResourceStore,
    text: String,
}

impl BooleanQuery {
    /// Evaluates the query. There is no resource to close.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails in the store.
    pub fn evaluate(&self) -> Result<bool> {
        match self.store.raw().query(self.text.as_str())? {
            QueryResults::Boolean(value) => Ok(value),
            _ => Err(StoreError::Invariant(
                "boolean-classified operation produced a non-boolean result".into(),
            )),
        }
    }
}

impl Operation for BooleanQuery {
    const CATEGORY: Category = Category::Boolean;

    fn prepare(store: ResourceStore, text: String) -> Self {
        Self { store, text }
    }
}

/// Statement-producing query, prepared against a store.
#[derive(Debug)]
pub struct GraphQuery {
    store: ResourceStore,
    text: String,
}

impl GraphQuery {
    /// Evaluates the query and returns a single-pass statement sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails in the store.
    pub fn evaluate(&self) -> Result<GraphResult> {
        match self.store.raw().query(self.text.as_str())? {
            QueryResults::Graph(triples) => Ok(GraphResult { inner: triples }),
            _ => Err(StoreError::Invariant(
                "graph-classified operation produced a non-graph result".into(),
            )),
        }
    }
}

impl Operation for GraphQuery {
    const CATEGORY: Category = Category::Graph;

    fn prepare(store: ResourceStore, text: String) -> Self {
        Self { store, text }
    }
}

/// Side-effecting update, prepared against a store.
#[derive(Debug)]
pub struct SparqlUpdate {
    store: ResourceStore,
    text: String,
}

impl SparqlUpdate {
    /// Executes the update. Success carries no payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects or fails the update.
    pub fn execute(&self) -> Result<()> {
        self.store.raw().update(self.text.as_str())?;
        Ok(())
    }
}

impl Operation for SparqlUpdate {
    const CATEGORY: Category = Category::Update;

    fn prepare(store: ResourceStore, text: String) -> Self {
        Self { store, text }
    }
}

/// Single-pass sequence of solution rows from a [`TupleQuery`].
pub struct TupleResult {
    inner: QuerySolutionIter,
}

impl TupleResult {
    /// Variable names projected by the query.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        self.inner.variables()
    }
}

impl Iterator for TupleResult {
    type Item = Result<QuerySolution>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.inner.next()?.map_err(StoreError::from))
    }
}

/// Single-pass sequence of statements from a [`GraphQuery`].
pub struct GraphResult {
    inner: QueryTripleIter,
}

impl Iterator for GraphResult {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.inner.next()?.map_err(StoreError::from))
    }
}

/// Serializable view of one bound value in a solution row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum BindingValue {
    /// IRI value.
    Iri(String),
    /// Plain string literal.
    Literal(String),
    /// Literal with an explicit datatype.
    TypedLiteral { value: String, datatype: String },
    /// Language-tagged literal.
    LangLiteral { value: String, language: String },
    /// Blank node.
    BlankNode(String),
    /// Variable not bound in this row.
    Unbound,
}

impl BindingValue {
    /// Converts a solution term into its serializable view.
    #[must_use]
    pub fn from_term(term: &Term) -> Self {
        match term {
            Term::NamedNode(node) => Self::Iri(node.as_str().to_owned()),
            Term::BlankNode(node) => Self::BlankNode(node.as_str().to_owned()),
            Term::Literal(literal) => {
                if let Some(language) = literal.language() {
                    Self::LangLiteral {
                        value: literal.value().to_owned(),
                        language: language.to_owned(),
                    }
                } else if literal.datatype() == oxigraph::model::vocab::xsd::STRING {
                    Self::Literal(literal.value().to_owned())
                } else {
                    Self::TypedLiteral {
                        value: literal.value().to_owned(),
                        datatype: literal.datatype().as_str().to_owned(),
                    }
                }
            }
            // embedded RDF-star triples keep their textual form
            Term::Triple(triple) => Self::Literal(triple.to_string()),
        }
    }

    /// The lexical form, without datatype or language annotations.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Iri(s) | Self::Literal(s) | Self::BlankNode(s) => s,
            Self::TypedLiteral { value, .. } | Self::LangLiteral { value, .. } => value,
            Self::Unbound => "",
        }
    }
}

/// Builder for one executable operation of kind `O`.
///
/// Create, record placeholder bindings, then [`build`](Self::build) against
/// a store. The builder is a single-owner value; it is not meant to be
/// mutated concurrently from several callers.
#[derive(Debug, Clone)]
pub struct OperationBuilder<O: Operation> {
    text: String,
    bindings: HashMap<String, NamedNode>,
    expected: PhantomData<O>,
}

impl OperationBuilder<TupleQuery> {
    /// Builder declared to produce a row-producing query.
    #[must_use]
    pub fn tuple(text: impl Into<String>) -> Self {
        Self::create(text)
    }
}

impl OperationBuilder<BooleanQuery> {
    /// Builder declared to produce a truth-value query.
    #[must_use]
    pub fn boolean(text: impl Into<String>) -> Self {
        Self::create(text)
    }
}

impl OperationBuilder<GraphQuery> {
    /// Builder declared to produce a statement-producing query.
    #[must_use]
    pub fn graph(text: impl Into<String>) -> Self {
        Self::create(text)
    }
}

impl OperationBuilder<SparqlUpdate> {
    /// Builder declared to produce an update.
    #[must_use]
    pub fn update(text: impl Into<String>) -> Self {
        Self::create(text)
    }
}

impl<O: Operation> OperationBuilder<O> {
    /// Creates a builder for the given operation text.
    ///
    /// Nothing is parsed until [`build`](Self::build).
    #[must_use]
    pub fn create(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bindings: HashMap::new(),
            expected: PhantomData,
        }
    }

    /// Records a placeholder binding. Rebinding the same name overwrites
    /// the earlier value; independent names do not interfere.
    #[must_use]
    pub fn bind(mut self, name: &str, value: NamedNode) -> Self {
        self.bindings.insert(name.to_owned(), value);
        self
    }

    /// Binds the `"this"` placeholder (token `??`).
    #[must_use]
    pub fn resolve_this(self, iri: NamedNode) -> Self {
        self.bind(PLACEHOLDER_THIS, iri)
    }

    /// Binds the `"current-user"` placeholder (token `?__useruri__`).
    #[must_use]
    pub fn resolve_user(self, iri: NamedNode) -> Self {
        self.bind(PLACEHOLDER_USER, iri)
    }

    fn substituted(&self) -> String {
        let mut text = self.text.clone();
        for (name, value) in &self.bindings {
            text = text.replace(&token_for(name), &format!("<{}>", value.as_str()));
        }
        text
    }

    /// Substitutes bindings, parses and classifies the text, and prepares
    /// the operation against the given store.
    ///
    /// No data is read or written during the build; store-level failures can
    /// only surface later, at evaluation time.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MalformedSyntax`] if the substituted text does not
    ///   parse.
    /// - [`StoreError::UnexpectedCategory`] if the classified category is
    ///   not the declared one.
    pub fn build(self, store: &ResourceStore) -> Result<O> {
        let text = self.substituted();
        let form = OperationForm::classify(&text)?;
        if form.category() != O::CATEGORY {
            return Err(StoreError::UnexpectedCategory {
                actual: form.keyword(),
                expected: O::CATEGORY.expectation(),
            });
        }
        debug!(form = form.keyword(), "prepared SPARQL operation");
        Ok(O::prepare(store.clone(), text))
    }
}
