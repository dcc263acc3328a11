//! Sign-up, login and session handlers for placeholder tokens
//!
//! Passwords are accepted but never checked and tokens are not signed. These
//! endpoints exist so the front end can obtain a `mock_token_<userId>`.

use authz::types::Role;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::Utc;
use store::{
    generate_id,
    validation::{LoginInput, SignupInput},
    StoreError, User,
};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    models::{token_for, AuthResponse, CurrentUser, MessageResponse},
    AppState,
};

const GOOGLE_DEMO_NAME: &str = "John Doe";
const GOOGLE_DEMO_EMAIL: &str = "john.doe@example.com";

fn auth_response(user: &User) -> AuthResponse {
    AuthResponse {
        user: user.profile(),
        token: token_for(&user.id),
    }
}

/// Create an account and sign in
///
/// POST /api/auth/signup
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupInput,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ApiErrorResponse),
        (status = 409, description = "Email already registered", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignupInput>,
) -> ApiResult<impl IntoResponse> {
    info!("Signup requested for {}", input.email);

    let user = User {
        id: generate_id("u"),
        external_uid: generate_id("ext"),
        name: input.name,
        email: input.email,
        role: input.role.unwrap_or(Role::TeamMember),
        department: input.department,
        timezone: input.timezone,
        created_at: Utc::now(),
    };
    let user = state.store.register_user(user).await.map_err(|e| {
        if let StoreError::EmailTaken(email) = &e {
            warn!("Signup rejected, email already registered: {}", email);
        }
        ApiError::from(e)
    })?;

    info!("Created user {} with role {}", user.id, user.role);
    Ok((StatusCode::CREATED, Json(auth_response(&user))))
}

/// Sign in by email
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginInput>,
) -> ApiResult<impl IntoResponse> {
    info!("Login requested for {}", input.email);

    let user = state
        .store
        .find_user_by_email(&input.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    Ok(Json(auth_response(&user)))
}

/// Sign in with Google
///
/// POST /api/auth/google
///
/// The identity token is not verified; a fixed demo account is found or
/// created.
#[utoipa::path(
    post,
    path = "/api/auth/google",
    responses(
        (status = 200, description = "Signed in", body = AuthResponse)
    ),
    tag = "auth"
)]
pub async fn google(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let user = match state.store.find_user_by_email(GOOGLE_DEMO_EMAIL).await? {
        Some(user) => user,
        None => {
            let user = User {
                id: generate_id("u"),
                external_uid: generate_id("ext"),
                name: GOOGLE_DEMO_NAME.to_string(),
                email: GOOGLE_DEMO_EMAIL.to_string(),
                role: Role::TeamMember,
                department: None,
                timezone: Some("UTC".to_string()),
                created_at: Utc::now(),
            };
            info!("Creating Google demo user {}", user.id);
            match state.store.register_user(user).await {
                Ok(user) => user,
                // A concurrent sign-in created it first.
                Err(StoreError::EmailTaken(_)) => state
                    .store
                    .find_user_by_email(GOOGLE_DEMO_EMAIL)
                    .await?
                    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?,
                Err(e) => return Err(e.into()),
            }
        }
    };

    Ok(Json(auth_response(&user)))
}

/// Get the signed-in user
///
/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Not signed in", body = ApiErrorResponse),
        (status = 404, description = "User not found", body = ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .store
        .users
        .get(&current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.profile()))
}

/// Sign out
///
/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(Extension(current): Extension<CurrentUser>) -> Json<MessageResponse> {
    info!("User {} logged out", current.id);
    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}
