//! Role-based authorization engine for Taskboard.
//!
//! This crate decides whether an authenticated caller may perform an
//! [`Action`] on a resource. The decision depends only on the caller's
//! [`Role`], the action, the resource id and the caller id, plus whatever an
//! [`OwnershipResolver`] reports about who owns the resource.
//!
//! # Authorization flow
//!
//! 1. **Request arrives** at the API layer
//! 2. **Authentication** resolves the caller id and role
//! 3. **Permission guard** maps the HTTP verb to an [`Action`] and the path
//!    parameter to a [`ResourceRef`]
//! 4. **Evaluator** applies the decision table below
//! 5. **Decision** is returned: `Allow`, or `Deny` with a client-safe reason
//!
//! # Decision table
//!
//! Rules are checked top to bottom and the first match wins.
//!
//! | Role | Action | Outcome |
//! |---|---|---|
//! | `SUPER_ADMIN` | any | allow |
//! | `TEAM_LEAD` | `DELETE` | allow if owner, else "only own resources" |
//! | `TEAM_LEAD` | other | allow |
//! | `TEAM_MEMBER` | `DELETE` | "team members cannot delete" |
//! | `TEAM_MEMBER` | `WRITE`, `ADMIN` | allow if associated, else "only own resources" |
//! | `TEAM_MEMBER` | `READ` | allow |
//! | `EXTERNAL_PARTNER` | not `READ` | "read-only access" |
//! | `EXTERNAL_PARTNER` | `READ` | allow if public or associated, else "not invited" |
//! | unrecognized | any | "insufficient permissions" |
//!
//! Evaluation is pure and holds no state, so concurrent calls need no
//! coordination.

pub mod error;
pub mod ownership;
pub mod types;

use error::Result;
use ownership::{OwnershipResolver, StructuralContainment};
use tracing::{debug, warn};
use types::{Action, Decision, DenyReason, ResourceRef, Role};

pub use error::AuthzError;

/// Evaluates the decision table against an ownership resolver.
///
/// # Example
///
/// ```rust
/// use authz::{Evaluator, ownership::StructuralContainment};
/// use authz::types::{Action, Decision, ResourceRef, Role};
///
/// let evaluator = Evaluator::new(StructuralContainment);
/// let resource = ResourceRef::new("proj-u9-42").unwrap();
///
/// assert_eq!(
///     evaluator.evaluate(Role::TeamLead, Action::Delete, &resource, "u9"),
///     Decision::Allow
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Evaluator<R = StructuralContainment> {
    resolver: R,
}

impl<R: OwnershipResolver> Evaluator<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Decides whether `caller_id`, acting as `role`, may perform `action` on
    /// `resource`.
    pub fn evaluate(
        &self,
        role: Role,
        action: Action,
        resource: &ResourceRef,
        caller_id: &str,
    ) -> Decision {
        let decision = match (role, action) {
            (Role::SuperAdmin, _) => Decision::Allow,

            (Role::TeamLead, Action::Delete) => {
                if self.resolver.is_owner(resource, caller_id) {
                    Decision::Allow
                } else {
                    Decision::Deny(DenyReason::OnlyOwnResources)
                }
            }
            (Role::TeamLead, _) => Decision::Allow,

            (Role::TeamMember, Action::Delete) => Decision::Deny(DenyReason::MembersCannotDelete),
            (Role::TeamMember, Action::Write | Action::Admin) => {
                if self.resolver.is_associated(resource, caller_id) {
                    Decision::Allow
                } else {
                    Decision::Deny(DenyReason::OnlyOwnResources)
                }
            }
            (Role::TeamMember, Action::Read) => Decision::Allow,

            (Role::ExternalPartner, Action::Read) => {
                if self.resolver.is_public(resource)
                    || self.resolver.is_associated(resource, caller_id)
                {
                    Decision::Allow
                } else {
                    Decision::Deny(DenyReason::NotInvited)
                }
            }
            (Role::ExternalPartner, _) => Decision::Deny(DenyReason::ReadOnlyAccess),
        };

        debug!(
            role = %role,
            action = %action,
            resource = %resource,
            caller = caller_id,
            decision = %decision,
            "authorization evaluated"
        );

        decision
    }

    /// Evaluates a raw role claim.
    ///
    /// A claim that names no known role falls through to the default-deny
    /// rule. Upstream authentication should make this unreachable, so it is
    /// logged as an anomaly.
    pub fn evaluate_claim(
        &self,
        role_claim: &str,
        action: Action,
        resource: &ResourceRef,
        caller_id: &str,
    ) -> Decision {
        match role_claim.parse::<Role>() {
            Ok(role) => self.evaluate(role, action, resource, caller_id),
            Err(_) => {
                warn!(
                    role = role_claim,
                    action = %action,
                    resource = %resource,
                    caller = caller_id,
                    "unrecognized role reached the authorization evaluator"
                );
                Decision::Deny(DenyReason::InsufficientPermissions)
            }
        }
    }
}

/// Evaluates one request using structural containment for ownership.
pub fn evaluate(role: Role, action: Action, resource: &ResourceRef, caller_id: &str) -> Decision {
    Evaluator::new(StructuralContainment).evaluate(role, action, resource, caller_id)
}

/// Parses string inputs and evaluates them using structural containment.
///
/// Fails with [`AuthzError::InvalidRole`], [`AuthzError::InvalidAction`] or
/// [`AuthzError::MissingResource`] before any rule is applied.
pub fn evaluate_str(role: &str, action: &str, resource: &str, caller_id: &str) -> Result<Decision> {
    let role: Role = role.parse()?;
    let action: Action = action.parse()?;
    let resource = ResourceRef::new(resource)?;
    Ok(evaluate(role, action, &resource, caller_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ownership::{OwnerIndex, ResourceOwners};
    use rstest::rstest;

    fn resource(id: &str) -> ResourceRef {
        ResourceRef::new(id).unwrap()
    }

    const SAMPLE_RESOURCES: [&str; 6] = [
        "proj-u7-42",
        "proj-u9-42",
        "public-report-1",
        "t1",
        "u4-invite",
        "x",
    ];

    #[rstest]
    #[case(Role::TeamLead, Action::Delete, "proj-u7-42", "u9", Decision::Deny(DenyReason::OnlyOwnResources))]
    #[case(Role::TeamLead, Action::Delete, "proj-u9-42", "u9", Decision::Allow)]
    #[case(Role::TeamLead, Action::Write, "proj-u7-42", "u9", Decision::Allow)]
    #[case(Role::TeamLead, Action::Admin, "proj-u7-42", "u9", Decision::Allow)]
    #[case(Role::TeamLead, Action::Read, "proj-u7-42", "u9", Decision::Allow)]
    #[case(Role::TeamMember, Action::Delete, "proj-u2-1", "u2", Decision::Deny(DenyReason::MembersCannotDelete))]
    #[case(Role::TeamMember, Action::Write, "task-u2-1", "u2", Decision::Allow)]
    #[case(Role::TeamMember, Action::Admin, "task-u3-1", "u2", Decision::Deny(DenyReason::OnlyOwnResources))]
    #[case(Role::TeamMember, Action::Read, "task-u3-1", "u2", Decision::Allow)]
    #[case(Role::ExternalPartner, Action::Write, "public-report-1", "u4", Decision::Deny(DenyReason::ReadOnlyAccess))]
    #[case(Role::ExternalPartner, Action::Read, "public-report-1", "u4", Decision::Allow)]
    #[case(Role::ExternalPartner, Action::Read, "invite-u4-7", "u4", Decision::Allow)]
    #[case(Role::ExternalPartner, Action::Read, "report-9", "u4", Decision::Deny(DenyReason::NotInvited))]
    fn test_decision_table(
        #[case] role: Role,
        #[case] action: Action,
        #[case] resource_id: &str,
        #[case] caller: &str,
        #[case] expected: Decision,
    ) {
        assert_eq!(evaluate(role, action, &resource(resource_id), caller), expected);
    }

    #[test]
    fn test_super_admin_always_allowed() {
        for action in Action::ALL {
            for id in SAMPLE_RESOURCES {
                assert_eq!(
                    evaluate(Role::SuperAdmin, action, &resource(id), "nobody"),
                    Decision::Allow,
                    "super admin should be allowed to {} {}",
                    action,
                    id
                );
            }
        }
    }

    #[test]
    fn test_member_write_follows_containment() {
        for id in SAMPLE_RESOURCES {
            let decision = evaluate(Role::TeamMember, Action::Write, &resource(id), "u9");
            assert_eq!(decision.is_allowed(), id.contains("u9"), "resource {}", id);
        }
    }

    #[test]
    fn test_member_never_deletes() {
        for id in SAMPLE_RESOURCES {
            assert_eq!(
                evaluate(Role::TeamMember, Action::Delete, &resource(id), "u9"),
                Decision::Deny(DenyReason::MembersCannotDelete)
            );
        }
    }

    #[test]
    fn test_partner_denied_everything_but_read() {
        for action in [Action::Write, Action::Delete, Action::Admin] {
            for id in SAMPLE_RESOURCES {
                assert_eq!(
                    evaluate(Role::ExternalPartner, action, &resource(id), "u4"),
                    Decision::Deny(DenyReason::ReadOnlyAccess)
                );
            }
        }
    }

    #[test]
    fn test_repeated_evaluation_is_stable() {
        let evaluator = Evaluator::new(StructuralContainment);
        for role in Role::ALL {
            for action in Action::ALL {
                for id in SAMPLE_RESOURCES {
                    let first = evaluator.evaluate(role, action, &resource(id), "u9");
                    let second = evaluator.evaluate(role, action, &resource(id), "u9");
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn test_unrecognized_claim_falls_to_default_deny() {
        let evaluator = Evaluator::new(StructuralContainment);
        assert_eq!(
            evaluator.evaluate_claim("JANITOR", Action::Read, &resource("public-1"), "u1"),
            Decision::Deny(DenyReason::InsufficientPermissions)
        );
        assert_eq!(
            evaluator.evaluate_claim("SUPER_ADMIN", Action::Delete, &resource("x"), "u1"),
            Decision::Allow
        );
    }

    #[test]
    fn test_evaluate_str_validates_inputs() {
        assert_eq!(
            evaluate_str("GUEST", "READ", "t1", "u1"),
            Err(AuthzError::InvalidRole("GUEST".to_string()))
        );
        assert_eq!(
            evaluate_str("TEAM_LEAD", "PURGE", "t1", "u1"),
            Err(AuthzError::InvalidAction("PURGE".to_string()))
        );
        assert_eq!(
            evaluate_str("TEAM_LEAD", "READ", "", "u1"),
            Err(AuthzError::MissingResource)
        );
        assert_eq!(
            evaluate_str("EXTERNAL_PARTNER", "READ", "public-report-1", "u4"),
            Ok(Decision::Allow)
        );
    }

    #[test]
    fn test_index_resolver_uses_relations() {
        let index = OwnerIndex::new()
            .with_entry("1", ResourceOwners::owned_by("u1").with_associate("u2"))
            .with_entry("3", ResourceOwners::owned_by("u2").with_public(true));
        let evaluator = Evaluator::new(index);

        // Lead may delete only what they created.
        assert_eq!(evaluator.evaluate(Role::TeamLead, Action::Delete, &resource("1"), "u1"), Decision::Allow);
        assert_eq!(
            evaluator.evaluate(Role::TeamLead, Action::Delete, &resource("3"), "u1"),
            Decision::Deny(DenyReason::OnlyOwnResources)
        );

        // Assignees may write but are not owners.
        assert_eq!(evaluator.evaluate(Role::TeamMember, Action::Write, &resource("1"), "u2"), Decision::Allow);
        assert_eq!(
            evaluator.evaluate(Role::TeamMember, Action::Write, &resource("1"), "u3"),
            Decision::Deny(DenyReason::OnlyOwnResources)
        );

        // Partners read public or invited resources only.
        assert_eq!(evaluator.evaluate(Role::ExternalPartner, Action::Read, &resource("3"), "u4"), Decision::Allow);
        assert_eq!(
            evaluator.evaluate(Role::ExternalPartner, Action::Read, &resource("1"), "u4"),
            Decision::Deny(DenyReason::NotInvited)
        );
    }

    #[test]
    fn test_unknown_resource_in_index_is_not_owned() {
        let evaluator = Evaluator::new(OwnerIndex::new());
        assert_eq!(
            evaluator.evaluate(Role::TeamLead, Action::Delete, &resource("proj-u1"), "u1"),
            Decision::Deny(DenyReason::OnlyOwnResources)
        );
    }
}
