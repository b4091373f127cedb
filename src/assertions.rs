//! Container specialization for assertion-set resources.
//!
//! An assertion set is a bare, order-insensitive statement set whose exact
//! composition is the object's meaning. Members therefore get their own
//! context partition and no provenance statements: anything attached in the
//! same statement space would become part of the set itself.

use crate::container::{identity, Container};
use crate::store::ResourceStore;
use crate::vocab::gv;

/// Builds the assertion-sets container over the given store.
///
/// Members are stored under the `gv:AssertionSet` partition; the provenance
/// hook is the identity.
#[must_use]
pub fn assertion_sets_container(store: &ResourceStore) -> Container {
    Container::new(
        store,
        gv::ASSERTION_SETS_CONTAINER.into_owned(),
        "Assertion Sets Container",
    )
    .with_resource_type(gv::ASSERTION_SET.into_owned())
    .with_provenance(identity)
}
