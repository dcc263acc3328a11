//! Demo data loaded by [`crate::Store::seeded`].

use crate::models::{
    Project, ProjectPriority, ProjectStatus, Task, TaskPriority, TaskStatus, User,
};
use authz::types::Role;
use chrono::{DateTime, Utc};

fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            name: "Community Garden Initiative".to_string(),
            description: text("Enhancing community well-being through collaborative gardening efforts."),
            status: ProjectStatus::Active,
            priority: ProjectPriority::High,
            start_date: at("2023-10-01T00:00:00Z"),
            end_date: at("2023-12-31T00:00:00Z"),
            created_by: "u1".to_string(),
            progress: 65,
            public: false,
        },
        Project {
            id: "2".to_string(),
            name: "Youth Entrepreneurship Program".to_string(),
            description: text("Empowering young entrepreneurs with skills and resources."),
            status: ProjectStatus::Planning,
            priority: ProjectPriority::Medium,
            start_date: at("2024-01-15T00:00:00Z"),
            end_date: at("2024-06-30T00:00:00Z"),
            created_by: "u1".to_string(),
            progress: 20,
            public: false,
        },
        Project {
            id: "3".to_string(),
            name: "Clean Water Access Project".to_string(),
            description: text("Providing clean water solutions to underserved communities."),
            status: ProjectStatus::OnHold,
            priority: ProjectPriority::High,
            start_date: at("2023-08-01T00:00:00Z"),
            end_date: at("2023-12-31T00:00:00Z"),
            created_by: "u2".to_string(),
            progress: 40,
            public: false,
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: TaskPriority,
    assignee: &str,
    due: &str,
    created_at: &str,
    dependencies: &[&str],
) -> Task {
    Task {
        id: id.to_string(),
        project_id: "1".to_string(),
        title: title.to_string(),
        description: text(description),
        status,
        priority,
        assignee_id: text(assignee),
        due_date: Some(at(due)),
        dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
        created_by: "u1".to_string(),
        created_at: at(created_at),
    }
}

pub fn tasks() -> Vec<Task> {
    vec![
        task(
            "t1",
            "Prepare Garden Beds",
            "Clear weeds, till soil, and add compost to the designated garden areas.",
            TaskStatus::ToDo,
            TaskPriority::High,
            "u2",
            "2023-11-15T00:00:00Z",
            "2023-10-15T10:30:00Z",
            &[],
        ),
        task(
            "t2",
            "Source Seedlings",
            "Identify and procure a variety of vegetable and flower seedlings from local nurseries.",
            TaskStatus::ToDo,
            TaskPriority::Medium,
            "u1",
            "2023-11-20T00:00:00Z",
            "2023-10-16T09:15:00Z",
            &[],
        ),
        task(
            "t3",
            "Install Irrigation System",
            "Set up a drip irrigation system to ensure efficient watering of the garden beds.",
            TaskStatus::InProgress,
            TaskPriority::High,
            "u2",
            "2023-12-01T00:00:00Z",
            "2023-10-18T14:45:00Z",
            &["t1"],
        ),
        task(
            "t4",
            "Design Garden Layout",
            "Create a detailed layout plan for the garden, including placement of plants and pathways.",
            TaskStatus::Done,
            TaskPriority::High,
            "u2",
            "2023-10-30T00:00:00Z",
            "2023-10-01T08:00:00Z",
            &[],
        ),
        task(
            "t5",
            "Recruit Volunteers",
            "Organize and conduct volunteer recruitment efforts to gather support for the project.",
            TaskStatus::Done,
            TaskPriority::Medium,
            "u3",
            "2023-11-10T00:00:00Z",
            "2023-10-05T11:20:00Z",
            &[],
        ),
    ]
}

pub fn users() -> Vec<User> {
    let user = |id: &str, uid: &str, name: &str, email: &str, role, department: Option<&str>, tz: &str, created: &str| User {
        id: id.to_string(),
        external_uid: uid.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        department: department.map(str::to_string),
        timezone: text(tz),
        created_at: at(created),
    };

    vec![
        user("u1", "firebase1", "Sarah Johnson", "sarah.johnson@example.com", Role::TeamLead, Some("Digital"), "America/New_York", "2023-01-15T08:00:00Z"),
        user("u2", "firebase2", "Michael Rodriguez", "michael.rodriguez@example.com", Role::TeamMember, Some("Digital"), "America/Chicago", "2023-02-10T10:30:00Z"),
        user("u3", "firebase3", "Emily Chen", "emily.chen@example.com", Role::TeamMember, Some("Communications"), "America/Los_Angeles", "2023-03-05T09:15:00Z"),
        user("u4", "firebase4", "David Okafor", "david.okafor@example.com", Role::ExternalPartner, None, "Africa/Lagos", "2023-04-20T11:45:00Z"),
    ]
}
