//! Generic hierarchical resource containers.
//!
//! A [`Container`] is itself a resource in the store. It bootstraps its own
//! description (type, label) exactly once and links every added member with
//! one containment statement; provenance is attached by an overridable hook,
//! and each member kind's statements land in a context partition, the named
//! graph keyed by the member's declared resource type.
//!
//! Concrete container kinds are built by composition, not inheritance: the
//! resource type, provenance hook and containment hook are strategy values
//! supplied at construction (see [`crate::assertions`] for the built-in
//! specialization).

use std::fmt;

use chrono::Utc;
use oxigraph::model::vocab::{rdf, rdfs, xsd};
use oxigraph::model::{Graph, GraphName, Literal, NamedNode, TermRef, Triple};
use tracing::{debug, info};

use crate::error::Result;
use crate::store::ResourceStore;
use crate::vocab::{gv, ldp, prov};

/// A designated anchor resource plus a set of statements describing it.
///
/// The statement set submitted to a container must be interpretable as
/// describing the anchor, directly or transitively; the anchor becomes the
/// new member's identity.
#[derive(Debug, Clone)]
pub struct PointedGraph {
    anchor: NamedNode,
    graph: Graph,
}

impl PointedGraph {
    #[must_use]
    pub fn new(anchor: NamedNode, graph: Graph) -> Self {
        Self { anchor, graph }
    }

    #[must_use]
    pub fn anchor(&self) -> &NamedNode {
        &self.anchor
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[must_use]
    pub fn into_parts(self) -> (NamedNode, Graph) {
        (self.anchor, self.graph)
    }
}

/// Hook run over an incoming pointed graph before commit; may attach
/// provenance statements or pass the graph through untouched.
pub type ProvenanceHook = Box<dyn Fn(PointedGraph) -> PointedGraph + Send + Sync>;

/// Hook asserting containment from a container to a new member's anchor.
pub type ContainmentHook = Box<dyn Fn(&NamedNode, PointedGraph) -> PointedGraph + Send + Sync>;

/// Default provenance hook: stamps the anchor with its creation time.
#[must_use]
pub fn creation_timestamp(pointed: PointedGraph) -> PointedGraph {
    let (anchor, mut graph) = pointed.into_parts();
    let stamp = Literal::new_typed_literal(Utc::now().to_rfc3339(), xsd::DATE_TIME);
    graph.insert(&Triple::new(
        anchor.clone(),
        prov::GENERATED_AT_TIME,
        stamp,
    ));
    PointedGraph::new(anchor, graph)
}

/// Default containment hook: appends exactly one containment statement from
/// the container to the anchor.
#[must_use]
pub fn containment_link(container: &NamedNode, pointed: PointedGraph) -> PointedGraph {
    let (anchor, mut graph) = pointed.into_parts();
    graph.insert(&Triple::new(
        container.clone(),
        ldp::CONTAINS,
        anchor.clone(),
    ));
    PointedGraph::new(anchor, graph)
}

/// Provenance hook that attaches nothing.
///
/// For member kinds whose content is a bare, exact statement set (the set
/// itself is the object's meaning), mixing creation metadata into the same
/// statement space would change what the member is.
#[must_use]
pub fn identity(pointed: PointedGraph) -> PointedGraph {
    pointed
}

/// Context partition for members of the given resource type.
///
/// Deterministic: the same resource type always maps to the same named
/// graph.
///
/// # Panics
///
/// Panics if the derived IRI is invalid (cannot happen for a valid resource
/// type IRI, since the key characters are percent-encoded).
#[must_use]
pub fn partition_graph(resource_type: &NamedNode) -> GraphName {
    let encoded = resource_type
        .as_str()
        .replace('/', "%2F")
        .replace(':', "%3A")
        .replace('#', "%23");
    GraphName::NamedNode(
        NamedNode::new(format!("{}{encoded}", gv::CONTEXT_BASE_IRI))
            .expect("context partition IRI should be valid"),
    )
}

/// Generic resource container.
///
/// Lifecycle: created (identifier allocated) → initialized (idempotent
/// bootstrap write, triggered lazily on first access) → any number of
/// [`add`](Self::add) / [`get_model`](Self::get_model) calls.
pub struct Container {
    store: ResourceStore,
    iri: NamedNode,
    label: String,
    resource_type: NamedNode,
    provenance: ProvenanceHook,
    containment: ContainmentHook,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("iri", &self.iri)
            .field("resource_type", &self.resource_type)
            .finish_non_exhaustive()
    }
}

impl Container {
    /// Creates a container with the default strategies: members are typed
    /// `ldp:Resource`, provenance is a creation timestamp, containment is a
    /// single `ldp:contains` statement.
    #[must_use]
    pub fn new(store: &ResourceStore, iri: NamedNode, label: impl Into<String>) -> Self {
        Self {
            store: store.clone(),
            iri,
            label: label.into(),
            resource_type: ldp::RESOURCE.into_owned(),
            provenance: Box::new(creation_timestamp),
            containment: Box::new(containment_link),
        }
    }

    /// Declares the resource type members of this container are stored
    /// under; determines the context partition.
    #[must_use]
    pub fn with_resource_type(mut self, resource_type: NamedNode) -> Self {
        self.resource_type = resource_type;
        self
    }

    /// Replaces the provenance hook.
    #[must_use]
    pub fn with_provenance(
        mut self,
        hook: impl Fn(PointedGraph) -> PointedGraph + Send + Sync + 'static,
    ) -> Self {
        self.provenance = Box::new(hook);
        self
    }

    /// Replaces the containment hook. Rarely needed: the default already
    /// appends exactly one containment statement.
    #[must_use]
    pub fn with_containment(
        mut self,
        hook: impl Fn(&NamedNode, PointedGraph) -> PointedGraph + Send + Sync + 'static,
    ) -> Self {
        self.containment = Box::new(hook);
        self
    }

    /// The container's own identifier.
    #[must_use]
    pub fn iri(&self) -> &NamedNode {
        &self.iri
    }

    /// Resource type members are declared as; the context partition key.
    #[must_use]
    pub fn resource_type(&self) -> &NamedNode {
        &self.resource_type
    }

    /// Writes the bootstrap statement set (type, label) if and only if the
    /// store holds no statement about this container yet. No-op otherwise.
    ///
    /// Idempotent under sequential calls. Two callers racing past the
    /// existence check may both write; that converges only because the
    /// store deduplicates identical statements; do not rely on exactly one
    /// bootstrap write under concurrency.
    ///
    /// # Errors
    ///
    /// Returns an error if the existence check or the bootstrap commit
    /// fails.
    pub fn initialize(&self) -> Result<()> {
        if self.store.has_statements_about(self.iri.as_ref())? {
            return Ok(());
        }
        info!(container = %self.iri, "writing container bootstrap statements");
        let mut bootstrap = Graph::new();
        bootstrap.insert(&Triple::new(self.iri.clone(), rdf::TYPE, ldp::CONTAINER));
        bootstrap.insert(&Triple::new(self.iri.clone(), rdf::TYPE, ldp::RESOURCE));
        bootstrap.insert(&Triple::new(
            self.iri.clone(),
            rdfs::LABEL,
            Literal::new_simple_literal(&self.label),
        ));
        self.store
            .commit(&bootstrap, &partition_graph(&ldp::CONTAINER.into_owned()))
    }

    /// Adds a member: runs the provenance and containment hooks over the
    /// pointed graph, then commits the full augmented statement set into
    /// this container's context partition as one unit.
    ///
    /// Returns the new member's identifier (the pointed graph's anchor).
    ///
    /// # Errors
    ///
    /// Returns an error on store failure; in that case none of the
    /// augmented statements are applied.
    pub fn add(&self, pointed: PointedGraph) -> Result<NamedNode> {
        self.initialize()?;
        let pointed = (self.provenance)(pointed);
        let pointed = (self.containment)(&self.iri, pointed);
        let partition = partition_graph(&self.resource_type);
        debug!(
            container = %self.iri,
            member = %pointed.anchor(),
            partition = %partition,
            statements = pointed.graph().len(),
            "adding member"
        );
        let (anchor, graph) = pointed.into_parts();
        self.store.commit(&graph, &partition)?;
        Ok(anchor)
    }

    /// Aggregated view of the container: all statements with the container
    /// as subject, plus each contained member's label and descriptive
    /// comment, not the member's full content. Cost is bounded by the
    /// container's direct fan-out.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the store reads fails.
    pub fn get_model(&self) -> Result<Graph> {
        self.initialize()?;
        let mut model = self.store.statements_about(self.iri.as_ref())?;
        let members: Vec<NamedNode> = model
            .objects_for_subject_predicate(&self.iri, ldp::CONTAINS)
            .filter_map(|term| match term {
                TermRef::NamedNode(node) => Some(node.into_owned()),
                _ => None,
            })
            .collect();
        for member in &members {
            for predicate in [rdfs::LABEL, rdfs::COMMENT] {
                let statements = self.store.statements_matching(member.as_ref(), predicate)?;
                for triple in statements.iter() {
                    model.insert(triple);
                }
            }
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn test_container(store: &ResourceStore) -> Container {
        Container::new(
            store,
            node("https://example.com/container/things"),
            "Things",
        )
    }

    fn member_graph(member: &NamedNode) -> Graph {
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            member.clone(),
            node("https://example.com/ns#weight"),
            Literal::new_simple_literal("12"),
        ));
        graph
    }

    #[test]
    fn test_initialize_writes_bootstrap_once() {
        let store = ResourceStore::in_memory().unwrap();
        let container = test_container(&store);

        container.initialize().unwrap();
        container.initialize().unwrap();

        let own = store
            .statements_about(container.iri().as_ref())
            .unwrap();
        assert_eq!(own.len(), 3);
        assert!(own.contains(&Triple::new(
            container.iri().clone(),
            rdf::TYPE,
            ldp::CONTAINER
        )));
        assert!(own.contains(&Triple::new(
            container.iri().clone(),
            rdfs::LABEL,
            Literal::new_simple_literal("Things")
        )));
    }

    #[test]
    fn test_add_initializes_lazily_and_links_member_once() {
        let store = ResourceStore::in_memory().unwrap();
        let container = test_container(&store);
        let member = node("https://example.com/thing/1");

        let returned = container
            .add(PointedGraph::new(member.clone(), member_graph(&member)))
            .unwrap();
        assert_eq!(returned, member);

        let own = store
            .statements_about(container.iri().as_ref())
            .unwrap();
        // bootstrap happened without an explicit initialize() call
        assert!(own.contains(&Triple::new(
            container.iri().clone(),
            rdf::TYPE,
            ldp::CONTAINER
        )));
        // exactly one containment statement
        let links: Vec<_> = own
            .objects_for_subject_predicate(container.iri(), ldp::CONTAINS)
            .collect();
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_generic_container_attaches_provenance() {
        let store = ResourceStore::in_memory().unwrap();
        let container = test_container(&store);
        let member = node("https://example.com/thing/1");

        container
            .add(PointedGraph::new(member.clone(), member_graph(&member)))
            .unwrap();

        let about_member = store.statements_about(member.as_ref()).unwrap();
        let stamps: Vec<_> = about_member
            .objects_for_subject_predicate(&member, prov::GENERATED_AT_TIME)
            .collect();
        assert_eq!(stamps.len(), 1);
    }

    #[test]
    fn test_add_commits_into_the_type_partition() {
        let store = ResourceStore::in_memory().unwrap();
        let resource_type = node("https://example.com/ns#Widget");
        let container = test_container(&store).with_resource_type(resource_type.clone());
        let member = node("https://example.com/thing/1");

        container
            .add(PointedGraph::new(member.clone(), member_graph(&member)))
            .unwrap();

        let partition = store
            .graph_statements(&partition_graph(&resource_type))
            .unwrap();
        // member content + provenance + containment, nothing else
        assert_eq!(partition.len(), 3);
    }

    #[test]
    fn test_partition_graph_is_deterministic() {
        let widget = node("https://example.com/ns#Widget");
        let gadget = node("https://example.com/ns#Gadget");
        assert_eq!(partition_graph(&widget), partition_graph(&widget));
        assert_ne!(partition_graph(&widget), partition_graph(&gadget));
    }

    #[test]
    fn test_get_model_aggregates_member_labels_and_comments() {
        let store = ResourceStore::in_memory().unwrap();
        let container = test_container(&store);

        for i in 1..=2 {
            let member = node(&format!("https://example.com/thing/{i}"));
            let mut graph = member_graph(&member);
            graph.insert(&Triple::new(
                member.clone(),
                rdfs::LABEL,
                Literal::new_simple_literal(format!("Thing {i}")),
            ));
            graph.insert(&Triple::new(
                member.clone(),
                rdfs::COMMENT,
                Literal::new_simple_literal(format!("The thing number {i}")),
            ));
            container.add(PointedGraph::new(member, graph)).unwrap();
        }

        let model = container.get_model().unwrap();
        // 3 bootstrap + 2 containment + 2 labels + 2 comments
        assert_eq!(model.len(), 9);

        let member = node("https://example.com/thing/1");
        assert!(model.contains(&Triple::new(
            member.clone(),
            rdfs::LABEL,
            Literal::new_simple_literal("Thing 1")
        )));
        // member content and provenance stay out of the aggregate
        assert!(!model.contains(&Triple::new(
            member.clone(),
            node("https://example.com/ns#weight"),
            Literal::new_simple_literal("12")
        )));
        let stamps: Vec<_> = model
            .objects_for_subject_predicate(&member, prov::GENERATED_AT_TIME)
            .collect();
        assert!(stamps.is_empty());
    }

    #[test]
    fn test_custom_containment_hook_is_honored() {
        let store = ResourceStore::in_memory().unwrap();
        let relation = node("https://example.com/ns#holds");
        let container = {
            let relation = relation.clone();
            test_container(&store).with_containment(move |container, pointed| {
                let (anchor, mut graph) = pointed.into_parts();
                graph.insert(&Triple::new(
                    container.clone(),
                    relation.clone(),
                    anchor.clone(),
                ));
                PointedGraph::new(anchor, graph)
            })
        };
        let member = node("https://example.com/thing/1");

        container
            .add(PointedGraph::new(member.clone(), member_graph(&member)))
            .unwrap();

        let own = store
            .statements_about(container.iri().as_ref())
            .unwrap();
        assert!(own.contains(&Triple::new(
            container.iri().clone(),
            relation,
            member
        )));
    }
}
