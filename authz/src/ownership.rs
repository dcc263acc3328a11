//! Ownership and visibility lookups used by the decision table.
//!
//! Two resolvers are provided:
//!
//! - [`StructuralContainment`] treats a resource as belonging to a caller when
//!   the resource id contains the caller id. This is a migration shim kept so
//!   that identifiers minted by the old demo keep working.
//! - [`OwnerIndex`] answers from an explicit owner/assignee relation keyed by
//!   resource id.

use crate::types::ResourceRef;
use std::collections::{BTreeSet, HashMap};

/// The token that marks a resource id as publicly readable under
/// [`StructuralContainment`].
pub const PUBLIC_MARKER: &str = "public";

/// Answers ownership questions about a resource for a given caller.
pub trait OwnershipResolver {
    /// Whether the caller owns the resource (created it).
    fn is_owner(&self, resource: &ResourceRef, caller_id: &str) -> bool;

    /// Whether the caller is involved with the resource as owner or assignee.
    fn is_associated(&self, resource: &ResourceRef, caller_id: &str) -> bool {
        self.is_owner(resource, caller_id)
    }

    /// Whether the resource is readable by callers who were not invited.
    fn is_public(&self, resource: &ResourceRef) -> bool;
}

impl<R: OwnershipResolver + ?Sized> OwnershipResolver for &R {
    fn is_owner(&self, resource: &ResourceRef, caller_id: &str) -> bool {
        (**self).is_owner(resource, caller_id)
    }

    fn is_associated(&self, resource: &ResourceRef, caller_id: &str) -> bool {
        (**self).is_associated(resource, caller_id)
    }

    fn is_public(&self, resource: &ResourceRef) -> bool {
        (**self).is_public(resource)
    }
}

/// Substring-based ownership: `"proj-u9-42"` belongs to `"u9"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralContainment;

impl OwnershipResolver for StructuralContainment {
    fn is_owner(&self, resource: &ResourceRef, caller_id: &str) -> bool {
        // An empty caller id would be contained in every resource.
        !caller_id.is_empty() && resource.as_str().contains(caller_id)
    }

    fn is_public(&self, resource: &ResourceRef) -> bool {
        resource.as_str().contains(PUBLIC_MARKER)
    }
}

/// The principals with a relation to one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOwners {
    /// Principals that own the resource.
    pub owners: BTreeSet<String>,
    /// Principals involved with the resource, owners included.
    pub associates: BTreeSet<String>,
    pub public: bool,
}

impl ResourceOwners {
    /// Starts an entry owned by a single principal.
    pub fn owned_by(owner: impl Into<String>) -> Self {
        let owner = owner.into();
        Self {
            owners: BTreeSet::from([owner.clone()]),
            associates: BTreeSet::from([owner]),
            public: false,
        }
    }

    /// Adds an associated principal such as an assignee.
    pub fn with_associate(mut self, principal: impl Into<String>) -> Self {
        self.associates.insert(principal.into());
        self
    }

    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

/// Explicit ownership relation keyed by resource id.
///
/// Resources absent from the index have no owners and are not public.
#[derive(Debug, Clone, Default)]
pub struct OwnerIndex {
    entries: HashMap<String, ResourceOwners>,
}

impl OwnerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the owners of a resource.
    pub fn insert(&mut self, resource_id: impl Into<String>, owners: ResourceOwners) {
        self.entries.insert(resource_id.into(), owners);
    }

    pub fn with_entry(mut self, resource_id: impl Into<String>, owners: ResourceOwners) -> Self {
        self.insert(resource_id, owners);
        self
    }

    pub fn get(&self, resource_id: &str) -> Option<&ResourceOwners> {
        self.entries.get(resource_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OwnershipResolver for OwnerIndex {
    fn is_owner(&self, resource: &ResourceRef, caller_id: &str) -> bool {
        self.get(resource.as_str())
            .is_some_and(|entry| entry.owners.contains(caller_id))
    }

    fn is_associated(&self, resource: &ResourceRef, caller_id: &str) -> bool {
        self.get(resource.as_str()).is_some_and(|entry| {
            entry.owners.contains(caller_id) || entry.associates.contains(caller_id)
        })
    }

    fn is_public(&self, resource: &ResourceRef) -> bool {
        self.get(resource.as_str()).is_some_and(|entry| entry.public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: &str) -> ResourceRef {
        ResourceRef::new(id).unwrap()
    }

    #[test]
    fn test_containment_matches_substring() {
        let shim = StructuralContainment;
        assert!(shim.is_owner(&resource("proj-u9-42"), "u9"));
        assert!(!shim.is_owner(&resource("proj-u7-42"), "u9"));
        assert!(shim.is_associated(&resource("task-u2"), "u2"));
    }

    #[test]
    fn test_containment_ignores_empty_caller() {
        assert!(!StructuralContainment.is_owner(&resource("anything"), ""));
    }

    #[test]
    fn test_containment_public_marker() {
        assert!(StructuralContainment.is_public(&resource("public-report-1")));
        assert!(!StructuralContainment.is_public(&resource("report-1")));
    }

    #[test]
    fn test_index_distinguishes_owner_and_associate() {
        let index = OwnerIndex::new().with_entry("t1", ResourceOwners::owned_by("u1").with_associate("u2"));

        assert!(index.is_owner(&resource("t1"), "u1"));
        assert!(!index.is_owner(&resource("t1"), "u2"));
        assert!(index.is_associated(&resource("t1"), "u2"));
        assert!(!index.is_associated(&resource("t1"), "u3"));
    }

    #[test]
    fn test_index_does_not_use_substrings() {
        let index = OwnerIndex::new().with_entry("1", ResourceOwners::owned_by("u1"));
        assert!(!index.is_owner(&resource("proj-u1"), "u1"));
        assert!(!index.is_public(&resource("public-report")));
    }

    #[test]
    fn test_index_public_flag() {
        let index = OwnerIndex::new().with_entry("3", ResourceOwners::owned_by("u2").with_public(true));
        assert!(index.is_public(&resource("3")));
        assert_eq!(index.len(), 1);
    }
}
