//! Vocabulary constants for the container wire contract.
//!
//! The container surface speaks four predicates: a containment predicate
//! (`ldp:contains`), a type predicate (`rdf:type`), a label predicate
//! (`rdfs:label`) and a descriptive-comment predicate (`rdfs:comment`).
//! `rdf`, `rdfs` and `xsd` come from `oxigraph::model::vocab`; this module
//! adds the LDP and PROV terms plus the crate's own namespace.

/// [W3C Linked Data Platform](https://www.w3.org/ns/ldp) vocabulary.
pub mod ldp {
    use oxigraph::model::NamedNodeRef;

    /// `ldp:Container`.
    pub const CONTAINER: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#Container");
    /// `ldp:Resource`.
    pub const RESOURCE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#Resource");
    /// `ldp:contains`, linking a container to each of its members.
    pub const CONTAINS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ldp#contains");
}

/// [W3C PROV-O](https://www.w3.org/ns/prov) vocabulary.
pub mod prov {
    use oxigraph::model::NamedNodeRef;

    /// `prov:generatedAtTime`.
    pub const GENERATED_AT_TIME: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#generatedAtTime");
    /// `prov:wasAttributedTo`.
    pub const WAS_ATTRIBUTED_TO: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#wasAttributedTo");
}

/// Terms under the crate's own namespace.
pub mod gv {
    use oxigraph::model::NamedNodeRef;

    /// Base IRI for graphvault terms.
    pub const NAMESPACE: &str = "https://graphvault.dev/ontology/v1#";

    /// Base IRI under which context partition graph names are minted.
    pub const CONTEXT_BASE_IRI: &str = "https://graphvault.dev/context/";

    /// Resource type for assertion-set members.
    pub const ASSERTION_SET: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://graphvault.dev/ontology/v1#AssertionSet");

    /// Identifier of the built-in assertion-sets container.
    pub const ASSERTION_SETS_CONTAINER: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://graphvault.dev/container/assertionSets");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ldp_terms() {
        assert_eq!(ldp::CONTAINS.as_str(), "http://www.w3.org/ns/ldp#contains");
        assert_eq!(ldp::CONTAINER.as_str(), "http://www.w3.org/ns/ldp#Container");
        assert_eq!(ldp::RESOURCE.as_str(), "http://www.w3.org/ns/ldp#Resource");
    }

    #[test]
    fn test_prov_terms() {
        assert_eq!(
            prov::GENERATED_AT_TIME.as_str(),
            "http://www.w3.org/ns/prov#generatedAtTime"
        );
    }

    #[test]
    fn test_gv_terms_live_under_namespace() {
        assert!(gv::ASSERTION_SET.as_str().starts_with(gv::NAMESPACE));
        assert!(gv::CONTEXT_BASE_IRI.ends_with('/'));
    }
}
