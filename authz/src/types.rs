//! Core authorization types.
//!
//! Roles and actions are closed sets. Their wire form is the upper snake case
//! name (`TEAM_LEAD`, `DELETE`) used by the front end and in tokens.

use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The role of an authenticated caller.
///
/// A caller's role is fixed for the duration of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    TeamLead,
    TeamMember,
    ExternalPartner,
}

impl Role {
    /// Every role, in descending order of privilege.
    pub const ALL: [Role; 4] = [
        Role::SuperAdmin,
        Role::TeamLead,
        Role::TeamMember,
        Role::ExternalPartner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::TeamLead => "TEAM_LEAD",
            Role::TeamMember => "TEAM_MEMBER",
            Role::ExternalPartner => "EXTERNAL_PARTNER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AuthzError::InvalidRole(s.to_string()))
    }
}

/// The operation a caller intends to perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Read,
    Write,
    Delete,
    Admin,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Read, Action::Write, Action::Delete, Action::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "READ",
            Action::Write => "WRITE",
            Action::Delete => "DELETE",
            Action::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| AuthzError::InvalidAction(s.to_string()))
    }
}

/// An opaque identifier for the resource being acted upon.
///
/// The identifier is never empty. Whether it belongs to a caller is decided by
/// an [`crate::ownership::OwnershipResolver`], not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceRef(String);

impl ResourceRef {
    /// Creates a resource reference, rejecting empty or blank identifiers.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AuthzError::MissingResource);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceRef {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceRef::new(s)
    }
}

/// Why a request was denied.
///
/// The reason strings describe policy, not data, and are safe to return to
/// the caller verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    OnlyOwnResources,
    MembersCannotDelete,
    ReadOnlyAccess,
    NotInvited,
    InsufficientPermissions,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::OnlyOwnResources => "only own resources",
            DenyReason::MembersCannotDelete => "team members cannot delete",
            DenyReason::ReadOnlyAccess => "read-only access",
            DenyReason::NotInvited => "not invited",
            DenyReason::InsufficientPermissions => "insufficient permissions",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DenyReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The outcome of one authorization evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// The denial reason, or `None` when the request is allowed.
    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("ALLOW"),
            Decision::Deny(reason) => write!(f, "DENY({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_wire_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "team_lead".parse::<Role>().unwrap_err();
        assert_eq!(err, AuthzError::InvalidRole("team_lead".to_string()));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert_eq!(
            "PATCH".parse::<Action>().unwrap_err(),
            AuthzError::InvalidAction("PATCH".to_string())
        );
        assert_eq!("WRITE".parse::<Action>().unwrap(), Action::Write);
    }

    #[test]
    fn test_role_serde_uses_wire_name() {
        let json = serde_json::to_string(&Role::ExternalPartner).unwrap();
        assert_eq!(json, "\"EXTERNAL_PARTNER\"");
        let role: Role = serde_json::from_str("\"TEAM_LEAD\"").unwrap();
        assert_eq!(role, Role::TeamLead);
    }

    #[test]
    fn test_resource_ref_rejects_blank_ids() {
        assert_eq!(ResourceRef::new(""), Err(AuthzError::MissingResource));
        assert_eq!(ResourceRef::new("   "), Err(AuthzError::MissingResource));
        assert_eq!(ResourceRef::new("t1").unwrap().as_str(), "t1");
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(Decision::Allow.to_string(), "ALLOW");
        assert_eq!(
            Decision::Deny(DenyReason::NotInvited).to_string(),
            "DENY(not invited)"
        );
    }

    #[test]
    fn test_decision_serializes_with_reason() {
        let allow = serde_json::to_value(Decision::Allow).unwrap();
        assert_eq!(allow, serde_json::json!({ "decision": "ALLOW" }));

        let deny = serde_json::to_value(Decision::Deny(DenyReason::ReadOnlyAccess)).unwrap();
        assert_eq!(
            deny,
            serde_json::json!({ "decision": "DENY", "reason": "read-only access" })
        );
    }
}
