use authz::types::{DenyReason, Role};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use store::{validation::UserInput, StoreError, UserProfile};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    models::CurrentUser,
    AppState,
};

fn not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// List all users
///
/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users listed", body = Vec<UserProfile>),
        (status = 401, description = "Not signed in", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.store.users.list().await?;
    let profiles: Vec<UserProfile> = users.iter().map(|user| user.profile()).collect();
    Ok(Json(profiles))
}

/// Read a user profile
///
/// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User retrieved", body = UserProfile),
        (status = 403, description = "Access denied", body = ApiErrorResponse),
        (status = 404, description = "User not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn read_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state.store.users.get(&id).await?.ok_or_else(not_found)?;
    Ok(Json(user.profile()))
}

/// Update a user, including their role
///
/// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UserInput,
    responses(
        (status = 200, description = "User updated", body = UserProfile),
        (status = 400, description = "Invalid request", body = ApiErrorResponse),
        (status = 403, description = "Administrative access required, or role change by a non super admin", body = ApiErrorResponse),
        (status = 404, description = "User not found", body = ApiErrorResponse),
        (status = 409, description = "Email already registered", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UserInput>,
) -> ApiResult<impl IntoResponse> {
    info!("Updating user {}", id);
    let mut user = state.store.users.get(&id).await?.ok_or_else(not_found)?;

    // Only a super admin may assign roles, including their own.
    if user.role != input.role {
        if current.role != Role::SuperAdmin {
            warn!(
                "User {} ({}) denied changing role of {} to {}",
                current.id, current.role, id, input.role
            );
            return Err(ApiError::Forbidden(
                DenyReason::InsufficientPermissions.to_string(),
            ));
        }
        info!("Changing role of {} from {} to {}", id, user.role, input.role);
    }

    user.name = input.name;
    user.email = input.email;
    user.role = input.role;
    user.department = input.department;
    user.timezone = input.timezone;

    let user = state.store.save_user(user).await.map_err(|e| {
        if let StoreError::EmailTaken(email) = &e {
            warn!("User {} update rejected, email {} is taken", id, email);
        }
        ApiError::from(e)
    })?;
    Ok(Json(user.profile()))
}

/// Users involved in a project
///
/// GET /api/users/project/{projectId}
#[utoipa::path(
    get,
    path = "/api/users/project/{projectId}",
    params(("projectId" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project members", body = Vec<UserProfile>),
        (status = 403, description = "Access denied", body = ApiErrorResponse),
        (status = 404, description = "Project not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn users_for_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let users = match state.store.users_for_project(&project_id).await {
        Ok(users) => users,
        Err(StoreError::NotFound { .. }) => {
            return Err(ApiError::NotFound("Project not found".to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    let profiles: Vec<UserProfile> = users.iter().map(|user| user.profile()).collect();
    Ok(Json(profiles))
}
