use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use store::{generate_id, validation::{TaskInput, ValidationErrors}, Task};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    models::{CurrentUser, TaskDeletedResponse, TaskQuery},
    AppState,
};

fn not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

/// Tasks must belong to a project that exists.
async fn ensure_project_exists(state: &AppState, project_id: &str) -> ApiResult<()> {
    if state.store.projects.get(project_id).await?.is_none() {
        return Err(ApiError::Validation(ValidationErrors::single(
            "projectId",
            format!("project {} does not exist", project_id),
        )));
    }
    Ok(())
}

/// List tasks, optionally for one project
///
/// GET /api/tasks?projectId={projectId}
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(("projectId" = Option<String>, Query, description = "Only tasks of this project")),
    responses(
        (status = 200, description = "Tasks listed", body = Vec<Task>),
        (status = 401, description = "Not signed in", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<impl IntoResponse> {
    let tasks = match query.project_id {
        Some(project_id) => state.store.tasks_for_project(&project_id).await?,
        None => state.store.tasks.list().await?,
    };
    info!("Listing {} tasks", tasks.len());
    Ok(Json(tasks))
}

/// Read a single task
///
/// GET /api/tasks/{id}
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task retrieved", body = Task),
        (status = 403, description = "Access denied", body = ApiErrorResponse),
        (status = 404, description = "Task not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tasks"
)]
pub async fn read_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Reading task {}", id);
    let task = state.store.tasks.get(&id).await?.ok_or_else(not_found)?;
    Ok(Json(task))
}

/// Create a task
///
/// POST /api/tasks
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = TaskInput,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid request", body = ApiErrorResponse),
        (status = 403, description = "Role may not create tasks", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(input): ValidatedJson<TaskInput>,
) -> ApiResult<impl IntoResponse> {
    ensure_project_exists(&state, &input.project_id).await?;

    // Dependencies are stored as given; cycles are not checked.
    let task = Task {
        id: generate_id("t"),
        project_id: input.project_id,
        title: input.title,
        description: input.description,
        status: input.status,
        priority: input.priority,
        assignee_id: input.assignee_id,
        due_date: input.due_date,
        dependencies: input.dependencies.unwrap_or_default(),
        created_by: current.id,
        created_at: Utc::now(),
    };
    let task = state.store.tasks.insert(task).await?;

    info!("Created task {} in project {}", task.id, task.project_id);
    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task
///
/// PUT /api/tasks/{id}
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    request_body = TaskInput,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid request", body = ApiErrorResponse),
        (status = 403, description = "Access denied", body = ApiErrorResponse),
        (status = 404, description = "Task not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<TaskInput>,
) -> ApiResult<impl IntoResponse> {
    info!("Updating task {}", id);
    let mut task = state.store.tasks.get(&id).await?.ok_or_else(not_found)?;
    if input.project_id != task.project_id {
        ensure_project_exists(&state, &input.project_id).await?;
    }

    task.project_id = input.project_id;
    task.title = input.title;
    task.description = input.description;
    task.status = input.status;
    task.priority = input.priority;
    task.assignee_id = input.assignee_id;
    task.due_date = input.due_date;
    if let Some(dependencies) = input.dependencies {
        task.dependencies = dependencies;
    }

    let task = state.store.tasks.update(task).await?;
    Ok(Json(task))
}

/// Delete a task
///
/// DELETE /api/tasks/{id}
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted", body = TaskDeletedResponse),
        (status = 403, description = "Access denied", body = ApiErrorResponse),
        (status = 404, description = "Task not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Deleting task {}", id);
    let task = state.store.tasks.delete(&id).await?;

    Ok(Json(TaskDeletedResponse {
        message: "Task deleted successfully".to_string(),
        task,
    }))
}
