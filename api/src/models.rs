use authz::types::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::{Project, Task, UserProfile};
use utoipa::ToSchema;

/// Prefix of the placeholder bearer tokens handed out at login.
pub const TOKEN_PREFIX: &str = "mock_token_";

/// Mints the placeholder token for a user id.
pub fn token_for(user_id: &str) -> String {
    format!("{}{}", TOKEN_PREFIX, user_id)
}

/// The authenticated caller, placed in request extensions by the
/// authentication middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Returned by signup, login and Google sign-in
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

/// Generic message response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Delete response for projects
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectDeletedResponse {
    pub message: String,
    pub project: Project,
}

/// Delete response for tasks
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskDeletedResponse {
    pub message: String,
    pub task: Task,
}

/// Task list filter
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub project_id: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub store: StoreHealth,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreHealth {
    pub available: bool,
    pub projects: usize,
    pub tasks: usize,
    pub users: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_for() {
        assert_eq!(token_for("u2"), "mock_token_u2");
    }

    #[test]
    fn test_task_query_reads_camel_case() {
        let query: TaskQuery = serde_json::from_str(r#"{"projectId":"1"}"#).unwrap();
        assert_eq!(query.project_id.as_deref(), Some("1"));
    }
}
