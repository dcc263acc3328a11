use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use store::{generate_id, validation::ProjectInput, Project};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    models::{CurrentUser, ProjectDeletedResponse},
    AppState,
};

fn not_found() -> ApiError {
    ApiError::NotFound("Project not found".to_string())
}

/// List all projects
///
/// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "Projects listed", body = Vec<Project>),
        (status = 401, description = "Not signed in", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "projects"
)]
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let projects = state.store.projects.list().await?;
    info!("Listing {} projects", projects.len());
    Ok(Json(projects))
}

/// Read a single project
///
/// GET /api/projects/{id}
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project retrieved", body = Project),
        (status = 403, description = "Access denied", body = ApiErrorResponse),
        (status = 404, description = "Project not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "projects"
)]
pub async fn read_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Reading project {}", id);
    let project = state.store.projects.get(&id).await?.ok_or_else(not_found)?;
    Ok(Json(project))
}

/// Create a project
///
/// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = ProjectInput,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Invalid request", body = ApiErrorResponse),
        (status = 403, description = "Role may not create projects", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(input): ValidatedJson<ProjectInput>,
) -> ApiResult<impl IntoResponse> {
    let project = Project {
        id: generate_id(""),
        name: input.name,
        description: input.description,
        status: input.status,
        priority: input.priority,
        start_date: input.start_date,
        end_date: input.end_date,
        created_by: current.id,
        progress: 0,
        public: false,
    };
    let project = state.store.projects.insert(project).await?;

    info!("Created project {} for {}", project.id, project.created_by);
    Ok((StatusCode::CREATED, Json(project)))
}

/// Replace a project's editable fields
///
/// PUT /api/projects/{id}
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    request_body = ProjectInput,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, description = "Invalid request", body = ApiErrorResponse),
        (status = 403, description = "Access denied", body = ApiErrorResponse),
        (status = 404, description = "Project not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<ProjectInput>,
) -> ApiResult<impl IntoResponse> {
    info!("Updating project {}", id);
    let mut project = state.store.projects.get(&id).await?.ok_or_else(not_found)?;

    project.name = input.name;
    project.description = input.description;
    project.status = input.status;
    project.priority = input.priority;
    project.start_date = input.start_date;
    project.end_date = input.end_date;

    let project = state.store.projects.update(project).await?;
    Ok(Json(project))
}

/// Delete a project
///
/// DELETE /api/projects/{id}
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted", body = ProjectDeletedResponse),
        (status = 403, description = "Access denied", body = ApiErrorResponse),
        (status = 404, description = "Project not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Deleting project {}", id);
    let project = state.store.projects.delete(&id).await?;

    Ok(Json(ProjectDeletedResponse {
        message: "Project deleted successfully".to_string(),
        project,
    }))
}
