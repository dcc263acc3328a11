//! In-memory data layer for Taskboard.
//!
//! Each entity kind sits behind a [`Repository`] trait object so handlers and
//! the permission guard can be tested against any backing store. The only
//! implementation shipped is [`InMemoryRepository`]; nothing is persisted.

use authz::ownership::{OwnerIndex, ResourceOwners};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
pub mod validation;

pub use error::{Result, StoreError};
pub use models::{Project, Task, User, UserProfile};
pub use repository::{Entity, InMemoryRepository, Repository};

/// The kinds of resource the permission guard protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Task,
    User,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Project => "Project",
            ResourceKind::Task => "Task",
            ResourceKind::User => "User",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub projects: usize,
    pub tasks: usize,
    pub users: usize,
}

/// The repositories for every entity kind.
#[derive(Clone)]
pub struct Store {
    pub projects: Arc<dyn Repository<Project>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub users: Arc<dyn Repository<User>>,
    /// Serializes user writes so the email check and the write are atomic.
    user_writes: Arc<Mutex<()>>,
}

impl Store {
    /// Creates a store from injected repositories.
    pub fn with_repositories(
        projects: Arc<dyn Repository<Project>>,
        tasks: Arc<dyn Repository<Task>>,
        users: Arc<dyn Repository<User>>,
    ) -> Self {
        Self {
            projects,
            tasks,
            users,
            user_writes: Arc::new(Mutex::new(())),
        }
    }

    /// An empty in-memory store.
    pub fn in_memory() -> Self {
        Self::with_repositories(
            Arc::new(InMemoryRepository::<Project>::new()),
            Arc::new(InMemoryRepository::<Task>::new()),
            Arc::new(InMemoryRepository::<User>::new()),
        )
    }

    /// An in-memory store loaded with the demo projects, tasks and users.
    pub fn seeded() -> Self {
        let projects = seed::projects();
        let tasks = seed::tasks();
        let users = seed::users();
        info!(
            "Seeding store with {} projects, {} tasks, {} users",
            projects.len(),
            tasks.len(),
            users.len()
        );
        Self::with_repositories(
            Arc::new(InMemoryRepository::with_items(projects)),
            Arc::new(InMemoryRepository::with_items(tasks)),
            Arc::new(InMemoryRepository::with_items(users)),
        )
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            projects: self.projects.count().await?,
            tasks: self.tasks.count().await?,
            users: self.users.count().await?,
        })
    }

    pub async fn tasks_for_project(&self, project_id: &str) -> Result<Vec<Task>> {
        let tasks = self.tasks.list().await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.project_id == project_id)
            .collect())
    }

    /// Users involved in a project: its creator plus the creators and
    /// assignees of its tasks, in user-list order.
    pub async fn users_for_project(&self, project_id: &str) -> Result<Vec<User>> {
        let project = self
            .projects
            .get(project_id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                kind: Project::KIND,
                id: project_id.to_string(),
            })?;

        let mut involved = vec![project.created_by];
        for task in self.tasks_for_project(project_id).await? {
            involved.push(task.created_by);
            involved.extend(task.assignee_id);
        }

        let users = self.users.list().await?;
        Ok(users
            .into_iter()
            .filter(|user| involved.contains(&user.id))
            .collect())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.list().await?;
        Ok(users
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email)))
    }

    async fn ensure_email_free(&self, email: &str, user_id: &str) -> Result<()> {
        match self.find_user_by_email(email).await? {
            Some(existing) if existing.id != user_id => {
                Err(StoreError::EmailTaken(email.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Inserts a new user unless another user already has the email.
    pub async fn register_user(&self, user: User) -> Result<User> {
        let _guard = self.user_writes.lock().await;
        self.ensure_email_free(&user.email, &user.id).await?;
        self.users.insert(user).await
    }

    /// Replaces a stored user unless the new email belongs to someone else.
    pub async fn save_user(&self, user: User) -> Result<User> {
        let _guard = self.user_writes.lock().await;
        self.ensure_email_free(&user.email, &user.id).await?;
        self.users.update(user).await
    }

    /// Builds the ownership index entry for one resource.
    ///
    /// Unknown resources yield an empty index, so every ownership check on
    /// them fails.
    pub async fn resource_owners(&self, kind: ResourceKind, id: &str) -> Result<OwnerIndex> {
        let owners = match kind {
            ResourceKind::Project => match self.projects.get(id).await? {
                Some(project) => {
                    let mut owners = ResourceOwners::owned_by(&project.created_by)
                        .with_public(project.public);
                    for task in self.tasks_for_project(id).await? {
                        if let Some(assignee) = task.assignee_id {
                            owners = owners.with_associate(assignee);
                        }
                    }
                    Some(owners)
                }
                None => None,
            },
            ResourceKind::Task => match self.tasks.get(id).await? {
                Some(task) => {
                    let public = self
                        .projects
                        .get(&task.project_id)
                        .await?
                        .is_some_and(|project| project.public);
                    let mut owners = ResourceOwners::owned_by(&task.created_by).with_public(public);
                    if let Some(assignee) = task.assignee_id {
                        owners = owners.with_associate(assignee);
                    }
                    Some(owners)
                }
                None => None,
            },
            ResourceKind::User => self
                .users
                .get(id)
                .await?
                .map(|user| ResourceOwners::owned_by(user.id)),
        };

        debug!("Resolved owners for {} {}: {:?}", kind, id, owners);

        let mut index = OwnerIndex::new();
        if let Some(owners) = owners {
            index.insert(id, owners);
        }
        Ok(index)
    }
}

/// Generates a sortable unique id with an optional prefix (`t`, `u`).
pub fn generate_id(prefix: &str) -> String {
    format!("{}{}", prefix, ulid::Ulid::new().to_string().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use authz::{
        ownership::OwnershipResolver,
        types::{ResourceRef, Role},
    };

    fn resource(id: &str) -> ResourceRef {
        ResourceRef::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_store_counts() {
        let store = Store::seeded();
        assert_eq!(
            store.stats().await.unwrap(),
            StoreStats {
                projects: 3,
                tasks: 5,
                users: 4
            }
        );
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = Store::in_memory();
        assert_eq!(store.stats().await.unwrap().projects, 0);
        assert!(store.find_user_by_email("sarah.johnson@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tasks_for_project() {
        let store = Store::seeded();
        assert_eq!(store.tasks_for_project("1").await.unwrap().len(), 5);
        assert!(store.tasks_for_project("2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_users_for_project() {
        let store = Store::seeded();
        let ids: Vec<String> = store
            .users_for_project("1")
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);

        let ids: Vec<String> = store
            .users_for_project("3")
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["u2"]);

        assert!(matches!(
            store.users_for_project("99").await,
            Err(StoreError::NotFound { kind: "Project", .. })
        ));
    }

    #[tokio::test]
    async fn test_find_user_by_email_ignores_case() {
        let store = Store::seeded();
        let user = store
            .find_user_by_email("Emily.Chen@Example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, "u3");
        assert_eq!(user.role, Role::TeamMember);
    }

    fn new_user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            external_uid: format!("ext-{}", id),
            name: "New User".to_string(),
            email: email.to_string(),
            role: Role::TeamMember,
            department: None,
            timezone: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_user_rejects_taken_email() {
        let store = Store::seeded();
        let err = store
            .register_user(new_user("u9", "SARAH.JOHNSON@example.com"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::EmailTaken("SARAH.JOHNSON@example.com".to_string())
        );

        let user = store
            .register_user(new_user("u9", "new@example.com"))
            .await
            .unwrap();
        assert_eq!(user.id, "u9");
    }

    #[tokio::test]
    async fn test_concurrent_registrations_keep_emails_unique() {
        let store = Store::in_memory();
        let attempts = (0..8).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .register_user(new_user(&format!("u{}", i), "same@example.com"))
                    .await
            })
        });

        let mut created = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            if attempt.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_user_keeps_own_email_and_rejects_others() {
        let store = Store::seeded();
        let mut user = store.users.get("u2").await.unwrap().unwrap();
        user.name = "Michael R.".to_string();
        assert_eq!(store.save_user(user.clone()).await.unwrap().name, "Michael R.");

        user.email = "emily.chen@example.com".to_string();
        assert!(matches!(
            store.save_user(user).await,
            Err(StoreError::EmailTaken(_))
        ));
    }

    #[tokio::test]
    async fn test_project_owners_include_assignees() {
        let store = Store::seeded();
        let index = store.resource_owners(ResourceKind::Project, "1").await.unwrap();

        assert!(index.is_owner(&resource("1"), "u1"));
        assert!(!index.is_owner(&resource("1"), "u2"));
        assert!(index.is_associated(&resource("1"), "u2"));
        assert!(index.is_associated(&resource("1"), "u3"));
        assert!(!index.is_associated(&resource("1"), "u4"));
    }

    #[tokio::test]
    async fn test_task_owners_and_public_flag() {
        let store = Store::seeded();
        let mut project = store.projects.get("1").await.unwrap().unwrap();
        project.public = true;
        store.projects.update(project).await.unwrap();

        let index = store.resource_owners(ResourceKind::Task, "t5").await.unwrap();
        assert!(index.is_owner(&resource("t5"), "u1"));
        assert!(index.is_associated(&resource("t5"), "u3"));
        assert!(!index.is_associated(&resource("t5"), "u2"));
        assert!(index.is_public(&resource("t5")));
    }

    #[tokio::test]
    async fn test_user_owns_self_only() {
        let store = Store::seeded();
        let index = store.resource_owners(ResourceKind::User, "u2").await.unwrap();
        assert!(index.is_owner(&resource("u2"), "u2"));
        assert!(!index.is_associated(&resource("u2"), "u1"));
        assert!(!index.is_public(&resource("u2")));
    }

    #[tokio::test]
    async fn test_unknown_resource_has_no_owners() {
        let store = Store::seeded();
        let index = store.resource_owners(ResourceKind::Task, "t99").await.unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_generate_id_prefix() {
        let id = generate_id("t");
        assert!(id.starts_with('t'));
        assert_eq!(id.len(), 27);
        assert_ne!(generate_id("t"), id);
    }
}
