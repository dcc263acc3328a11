//! Tests for the authentication and authorization middleware helpers
//!
//! The full middleware stack is exercised through the router in
//! `tests/routes.rs`; these cover the pure pieces.

#[cfg(test)]
mod tests {
    use super::super::middleware_hooks::*;
    use crate::{error::ApiError, AppState, ApiConfig};
    use authz::types::Action;
    use axum::http::Method;
    use store::{ResourceKind, Store};

    fn unauthorized_message(result: Result<&str, ApiError>) -> String {
        match result {
            Err(ApiError::Unauthorized(message)) => message,
            other => panic!("expected 401, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_action_from_method() {
        assert_eq!(extract_action_from_method(&Method::GET, false), Action::Read);
        assert_eq!(extract_action_from_method(&Method::HEAD, false), Action::Read);
        assert_eq!(extract_action_from_method(&Method::POST, false), Action::Write);
        assert_eq!(extract_action_from_method(&Method::PUT, false), Action::Write);
        assert_eq!(extract_action_from_method(&Method::PATCH, false), Action::Write);
        assert_eq!(
            extract_action_from_method(&Method::DELETE, false),
            Action::Delete
        );
    }

    #[test]
    fn test_admin_routes_map_writes_to_admin() {
        assert_eq!(extract_action_from_method(&Method::PUT, true), Action::Admin);
        assert_eq!(extract_action_from_method(&Method::POST, true), Action::Admin);
        assert_eq!(extract_action_from_method(&Method::GET, true), Action::Read);
        assert_eq!(
            extract_action_from_method(&Method::DELETE, true),
            Action::Delete
        );
    }

    #[test]
    fn test_user_id_from_valid_token() {
        let id = user_id_from_authorization(Some("Bearer mock_token_u2")).unwrap();
        assert_eq!(id, "u2");
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            unauthorized_message(user_id_from_authorization(None)),
            "Authorization header missing"
        );
    }

    #[test]
    fn test_malformed_header() {
        for header in ["mock_token_u1", "Basic mock_token_u1", "Bearer", "Bearer a b"] {
            assert_eq!(
                unauthorized_message(user_id_from_authorization(Some(header))),
                "Invalid authorization format",
                "header {:?}",
                header
            );
        }
    }

    #[test]
    fn test_foreign_token() {
        for header in ["Bearer abc123", "Bearer mock_token_"] {
            assert_eq!(
                unauthorized_message(user_id_from_authorization(Some(header))),
                "Invalid token",
                "header {:?}",
                header
            );
        }
    }

    #[test]
    fn test_permission_guard_builder() {
        let state = AppState::new(Store::in_memory(), ApiConfig::default());

        let guard = PermissionGuard::new(&state, ResourceKind::Task);
        assert_eq!(guard.param, "id");
        assert!(!guard.admin_writes);

        let guard = PermissionGuard::new(&state, ResourceKind::User)
            .with_param("userId")
            .admin_writes();
        assert_eq!(guard.kind, ResourceKind::User);
        assert_eq!(guard.param, "userId");
        assert!(guard.admin_writes);
    }
}
