//! Project, task and user records.
//!
//! Field names serialize in camelCase and enum values in the display form the
//! front end shows ("On Hold", "In Progress").

use crate::repository::Entity;
use authz::types::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProjectStatus {
    Planning,
    Active,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProjectPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Review,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: String,
    /// Completion percentage, 0 to 100.
    pub progress: u8,
    /// Readable by external partners who were not invited.
    #[serde(default)]
    pub public: bool,
}

impl Entity for Project {
    const KIND: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Ids of tasks that must finish first.
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Task {
    const KIND: &'static str = "Task";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A stored user account.
///
/// Carries the identity-provider uid, so it is never serialized directly;
/// responses use [`UserProfile`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub external_uid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            department: self.department.clone(),
            timezone: self.timezone.clone(),
            created_at: self.created_at,
        }
    }
}

impl Entity for User {
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }
}

/// The client-visible view of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(value_type = String, example = "TEAM_MEMBER")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(ProjectStatus::OnHold).unwrap(), json!("On Hold"));
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), json!("In Progress"));
        let status: TaskStatus = serde_json::from_value(json!("To Do")).unwrap();
        assert_eq!(status, TaskStatus::ToDo);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: "t1".to_string(),
            project_id: "1".to_string(),
            title: "Prepare Garden Beds".to_string(),
            description: None,
            status: TaskStatus::ToDo,
            priority: TaskPriority::High,
            assignee_id: Some("u2".to_string()),
            due_date: None,
            dependencies: vec![],
            created_by: "u1".to_string(),
            created_at: "2023-10-15T10:30:00Z".parse().unwrap(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["projectId"], json!("1"));
        assert_eq!(value["assigneeId"], json!("u2"));
        assert!(value.get("description").is_none());
        assert!(value.get("dueDate").is_none());
    }

    #[test]
    fn test_profile_omits_external_uid() {
        let user = User {
            id: "u1".to_string(),
            external_uid: "firebase1".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah.johnson@example.com".to_string(),
            role: Role::TeamLead,
            department: Some("Digital".to_string()),
            timezone: None,
            created_at: "2023-01-15T08:00:00Z".parse().unwrap(),
        };
        let value = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(value["role"], json!("TEAM_LEAD"));
        assert!(value.to_string().find("firebase1").is_none());
    }
}
