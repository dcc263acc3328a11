use authz::{
    types::{Action, Decision, ResourceRef, Role},
    Evaluator,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::time::Instant;
use store::ResourceKind;
use tracing::{debug, info, warn};

use crate::{
    error::ApiError,
    models::{CurrentUser, TOKEN_PREFIX},
    server::OwnershipMode,
    AppState,
};

/// Authentication middleware for placeholder bearer tokens
///
/// Accepts `Authorization: Bearer mock_token_<userId>` and resolves the user
/// against the store. The resolved [`CurrentUser`] is inserted into the
/// request extensions for the guards and handlers further down.
///
/// There is no signature or expiry check: a token is only as trustworthy as
/// the user id it names.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = {
        let header = match request.headers().get(AUTHORIZATION) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| {
                ApiError::Unauthorized("Invalid authorization format".to_string())
            })?),
        };
        user_id_from_authorization(header)?.to_string()
    };

    let user = state
        .store
        .users
        .get(&user_id)
        .await?
        .ok_or_else(|| {
            warn!("AUTH: token names unknown user {}", user_id);
            ApiError::Unauthorized("Unknown user".to_string())
        })?;

    debug!("AUTH: authenticated {} as {}", user.id, user.role);

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        role: user.role,
    });

    Ok(next.run(request).await)
}

/// Extracts the user id from an `Authorization` header value
///
/// - missing header -> "Authorization header missing"
/// - anything but `Bearer <token>` -> "Invalid authorization format"
/// - token without the `mock_token_` prefix -> "Invalid token"
pub fn user_id_from_authorization(header: Option<&str>) -> Result<&str, ApiError> {
    let header = header
        .ok_or_else(|| ApiError::Unauthorized("Authorization header missing".to_string()))?;

    let mut parts = header.split(' ');
    let (Some("Bearer"), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ApiError::Unauthorized(
            "Invalid authorization format".to_string(),
        ));
    };

    token
        .strip_prefix(TOKEN_PREFIX)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))
}

fn current_user(request: &Request<Body>) -> Result<CurrentUser, ApiError> {
    request
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))
}

/// The roles allowed through [`require_roles`]
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    pub allowed: &'static [Role],
}

/// Role gate middleware
///
/// Rejects callers whose role is not in the gate's list. Used on collection
/// routes (creating projects or tasks) where there is no resource id to
/// evaluate against.
pub async fn require_roles(
    State(gate): State<RoleGate>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = current_user(&request)?;

    if !gate.allowed.contains(&user.role) {
        warn!(
            "ROLE GATE: {} ({}) denied {} {}",
            user.id,
            user.role,
            request.method(),
            request.uri()
        );
        return Err(ApiError::Forbidden("Insufficient permissions".to_string()));
    }

    Ok(next.run(request).await)
}

/// What the permission guard protects on one route
#[derive(Clone)]
pub struct PermissionGuard {
    pub state: AppState,
    pub kind: ResourceKind,
    /// Name of the path parameter holding the resource id.
    pub param: &'static str,
    /// Treat writes on this route as administrative.
    pub admin_writes: bool,
}

impl PermissionGuard {
    pub fn new(state: &AppState, kind: ResourceKind) -> Self {
        Self {
            state: state.clone(),
            kind,
            param: "id",
            admin_writes: false,
        }
    }

    pub fn with_param(mut self, param: &'static str) -> Self {
        self.param = param;
        self
    }

    pub fn admin_writes(mut self) -> Self {
        self.admin_writes = true;
        self
    }
}

/// Resource permission middleware
///
/// # Authorization Flow
///
/// 1. Take the caller from the request extensions
/// 2. Map the HTTP method to an [`Action`]
/// 3. Take the resource id from the path parameter
/// 4. Evaluate with the configured ownership resolver
/// 5. Return 403 with the denial reason, or pass through on allow
pub async fn permission_check(
    State(guard): State<PermissionGuard>,
    Path(params): Path<HashMap<String, String>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = current_user(&request)?;
    let resource_id = params.get(guard.param).map(String::as_str).unwrap_or("");
    let resource = ResourceRef::new(resource_id)?;
    let action = extract_action_from_method(request.method(), guard.admin_writes);

    debug!(
        "AUTHZ MIDDLEWARE: Checking principal={}, role={}, action={}, {}={}",
        user.id, user.role, action, guard.kind, resource
    );

    let decision = match guard.state.config.ownership {
        OwnershipMode::Containment => authz::evaluate(user.role, action, &resource, &user.id),
        OwnershipMode::Index => {
            let index = guard
                .state
                .store
                .resource_owners(guard.kind, resource.as_str())
                .await?;
            Evaluator::new(index).evaluate(user.role, action, &resource, &user.id)
        }
    };

    match decision {
        Decision::Allow => {
            info!(
                "AUTHZ MIDDLEWARE: Access ALLOWED for {} {} {} {}",
                user.id, action, guard.kind, resource
            );
            Ok(next.run(request).await)
        }
        Decision::Deny(reason) => {
            warn!(
                "AUTHZ MIDDLEWARE: Access DENIED for {} {} {} {}: {}",
                user.id, action, guard.kind, resource, reason
            );
            Err(ApiError::Forbidden(reason.to_string()))
        }
    }
}

/// Extract action from HTTP method
///
/// Maps HTTP methods to authorization actions:
/// - GET, HEAD -> READ
/// - POST, PUT, PATCH -> WRITE, or ADMIN on administrative routes
/// - DELETE -> DELETE
pub fn extract_action_from_method(method: &Method, admin_writes: bool) -> Action {
    match method.as_str() {
        "GET" | "HEAD" => Action::Read,
        "POST" | "PUT" | "PATCH" if admin_writes => Action::Admin,
        "POST" | "PUT" | "PATCH" => Action::Write,
        "DELETE" => Action::Delete,
        _ => Action::Read, // Default to read for unknown methods
    }
}

/// Request processing middleware hook
/// Logs every request with its processing time
pub async fn request_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    info!("REQUEST MIDDLEWARE: Processing incoming {} request to {}", method, uri);

    let response = next.run(request).await;

    debug!(
        "REQUEST MIDDLEWARE: {} {} -> {} in {:?}",
        method,
        uri,
        response.status(),
        start.elapsed()
    );

    response
}

/// Response processing middleware hook
/// Stamps every response with the server version
pub async fn response_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        "X-Taskboard-Version",
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );

    response
}
