//! End-to-end flows: containers feeding a store that is then queried
//! through the typed operation builder.

use anyhow::Result;
use graphvault::assertions::assertion_sets_container;
use graphvault::container::{Container, PointedGraph};
use graphvault::operation::{BindingValue, OperationBuilder};
use graphvault::store::ResourceStore;
use oxigraph::model::vocab::rdfs;
use oxigraph::model::{Graph, Literal, NamedNode, Triple};
use tempfile::TempDir;

fn node(iri: &str) -> Result<NamedNode> {
    Ok(NamedNode::new(iri)?)
}

fn assertion_set(anchor: &NamedNode, claim: &str) -> Result<Graph> {
    let mut graph = Graph::new();
    graph.insert(&Triple::new(
        anchor.clone(),
        node("https://example.com/ns#asserts")?,
        node(claim)?,
    ));
    Ok(graph)
}

#[test]
fn test_assertion_sets_queried_through_operations() -> Result<()> {
    let store = ResourceStore::in_memory()?;
    let container = assertion_sets_container(&store);

    for i in 1..=2 {
        let anchor = node(&format!("https://example.com/assertions/{i}"))?;
        let graph = assertion_set(&anchor, &format!("https://example.com/claim/{i}"))?;
        container.add(PointedGraph::new(anchor, graph))?;
    }

    // the containment statements are visible to a tuple query anchored on
    // the container via the "this" placeholder
    let op = OperationBuilder::tuple(
        "SELECT ?member WHERE { ?? <http://www.w3.org/ns/ldp#contains> ?member }",
    )
    .resolve_this(container.iri().clone())
    .build(&store)?;

    let mut members = Vec::new();
    for row in op.evaluate()? {
        let row = row?;
        let term = row.get("member").expect("member should be bound");
        members.push(BindingValue::from_term(term));
    }
    members.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(
        members,
        vec![
            BindingValue::Iri("https://example.com/assertions/1".to_owned()),
            BindingValue::Iri("https://example.com/assertions/2".to_owned()),
        ]
    );

    let op = OperationBuilder::boolean(
        "ASK { ?? <http://www.w3.org/ns/ldp#contains> <https://example.com/assertions/1> }",
    )
    .resolve_this(container.iri().clone())
    .build(&store)?;
    assert!(op.evaluate()?);

    Ok(())
}

#[test]
fn test_update_operation_clears_what_containers_wrote() -> Result<()> {
    let store = ResourceStore::in_memory()?;
    let container = assertion_sets_container(&store);

    let anchor = node("https://example.com/assertions/1")?;
    container.add(PointedGraph::new(
        anchor.clone(),
        assertion_set(&anchor, "https://example.com/claim/1")?,
    ))?;
    assert!(!store.is_empty());

    let op = OperationBuilder::update("DELETE WHERE { ?s ?p ?o }").build(&store)?;
    op.execute()?;

    assert!(store.is_empty());
    Ok(())
}

#[test]
fn test_container_survives_store_reopen() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("store");
    let container_iri = node("https://example.com/container/notes")?;
    let member = node("https://example.com/note/1")?;

    {
        let store = ResourceStore::open(&path)?;
        let container = Container::new(&store, container_iri.clone(), "Notes");

        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            member.clone(),
            rdfs::LABEL,
            Literal::new_simple_literal("First note"),
        ));
        graph.insert(&Triple::new(
            member.clone(),
            rdfs::COMMENT,
            Literal::new_simple_literal("Kept across restarts"),
        ));
        container.add(PointedGraph::new(member.clone(), graph))?;
    }

    {
        let store = ResourceStore::open(&path)?;
        let container = Container::new(&store, container_iri.clone(), "Notes");

        // initialize() sees the persisted bootstrap and does not duplicate it
        container.initialize()?;
        let own = store.statements_about(container_iri.as_ref())?;
        assert_eq!(own.len(), 4); // 3 bootstrap + 1 containment

        let model = container.get_model()?;
        assert!(model.contains(&Triple::new(
            member.clone(),
            rdfs::LABEL,
            Literal::new_simple_literal("First note")
        )));
        assert!(model.contains(&Triple::new(
            member.clone(),
            rdfs::COMMENT,
            Literal::new_simple_literal("Kept across restarts")
        )));
    }

    Ok(())
}
