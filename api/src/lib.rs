//! HTTP API for Taskboard
//!
//! Routes live under `/api`. Everything except health, sign-in and the
//! realtime socket requires a bearer token; resource routes additionally pass
//! through the permission guard, which asks the `authz` evaluator.

use authz::types::Role;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use store::{ResourceKind, Store};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware_hooks;
pub mod models;
pub mod realtime;
pub mod server;

#[cfg(test)]
mod middleware_hooks_tests;

use middleware_hooks::{PermissionGuard, RoleGate};

// Re-export server functions for convenience
pub use server::{
    spawn_server_with_config, start_server, start_server_with_config, ApiConfig, OwnershipMode,
};

const PROJECT_CREATORS: &[Role] = &[Role::SuperAdmin, Role::TeamLead];
const TASK_CREATORS: &[Role] = &[Role::SuperAdmin, Role::TeamLead, Role::TeamMember];

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<ApiConfig>,
    pub hub: Arc<realtime::RealtimeHub>,
}

impl AppState {
    pub fn new(store: Store, config: ApiConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            hub: Arc::new(realtime::RealtimeHub::new()),
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::google,
        handlers::auth::me,
        handlers::auth::logout,
        handlers::projects::list_projects,
        handlers::projects::read_project,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::tasks::list_tasks,
        handlers::tasks::read_task,
        handlers::tasks::create_task,
        handlers::tasks::update_task,
        handlers::tasks::delete_task,
        handlers::users::list_users,
        handlers::users::read_user,
        handlers::users::update_user,
        handlers::users::users_for_project,
    ),
    components(
        schemas(
            store::Project,
            store::Task,
            store::UserProfile,
            store::models::ProjectStatus,
            store::models::ProjectPriority,
            store::models::TaskStatus,
            store::models::TaskPriority,
            store::validation::ProjectInput,
            store::validation::TaskInput,
            store::validation::UserInput,
            store::validation::SignupInput,
            store::validation::LoginInput,
            models::AuthResponse,
            models::MessageResponse,
            models::ProjectDeletedResponse,
            models::TaskDeletedResponse,
            models::HealthResponse,
            models::StoreHealth,
            error::ApiErrorResponse,
            error::ErrorDetail,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Sign-in with placeholder tokens"),
        (name = "projects", description = "Project CRUD operations"),
        (name = "tasks", description = "Task CRUD operations"),
        (name = "users", description = "User directory and role management"),
        (name = "health", description = "Health check endpoints"),
    ),
    info(
        title = "Taskboard API",
        version = "1.0.0",
        description = "Project and task management with role-based access control",
        contact(
            name = "Taskboard Team",
        ),
    ),
)]
pub struct ApiDoc;

fn cors_layer(frontend_url: &str) -> CorsLayer {
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
        Err(e) => {
            warn!("Invalid frontend origin '{}', CORS disabled: {}", frontend_url, e);
            CorsLayer::new()
        }
    }
}

/// Create the main API router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let project_guard = PermissionGuard::new(&state, ResourceKind::Project);
    let task_guard = PermissionGuard::new(&state, ResourceKind::Task);
    let user_guard = PermissionGuard::new(&state, ResourceKind::User).admin_writes();
    let project_members_guard =
        PermissionGuard::new(&state, ResourceKind::Project).with_param("projectId");

    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/google", post(handlers::auth::google))
        .route("/realtime", get(realtime::realtime_handler));

    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/logout", post(handlers::auth::logout))
        // Projects
        .route(
            "/projects",
            get(handlers::projects::list_projects).merge(
                post(handlers::projects::create_project).route_layer(
                    middleware::from_fn_with_state(
                        RoleGate {
                            allowed: PROJECT_CREATORS,
                        },
                        middleware_hooks::require_roles,
                    ),
                ),
            ),
        )
        .route(
            "/projects/:id",
            get(handlers::projects::read_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project)
                .route_layer(middleware::from_fn_with_state(
                    project_guard,
                    middleware_hooks::permission_check,
                )),
        )
        // Tasks
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks).merge(
                post(handlers::tasks::create_task).route_layer(middleware::from_fn_with_state(
                    RoleGate {
                        allowed: TASK_CREATORS,
                    },
                    middleware_hooks::require_roles,
                )),
            ),
        )
        .route(
            "/tasks/:id",
            get(handlers::tasks::read_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task)
                .route_layer(middleware::from_fn_with_state(
                    task_guard,
                    middleware_hooks::permission_check,
                )),
        )
        // Users
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/:id",
            get(handlers::users::read_user)
                .merge(put(handlers::users::update_user))
                .route_layer(middleware::from_fn_with_state(
                    user_guard,
                    middleware_hooks::permission_check,
                )),
        )
        .route(
            "/users/project/:projectId",
            get(handlers::users::users_for_project).route_layer(middleware::from_fn_with_state(
                project_members_guard,
                middleware_hooks::permission_check,
            )),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middleware_hooks::authenticate,
        ));

    let api = public
        .merge(protected)
        .layer(middleware::from_fn(middleware_hooks::request_middleware))
        .layer(middleware::from_fn(middleware_hooks::response_middleware));

    let cors = cors_layer(&state.config.frontend_url);

    // Main router
    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/api/swagger").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
