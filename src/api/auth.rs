use axum::{
    Form, Json,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState, MessageResponse, ShellResponse};

const SESSION_USER_KEY: &str = "user";

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Gate for mutation endpoints: only requests carrying a session created by
/// a successful login pass through. Everything else gets 401 with an
/// `error` body; the frontend redirects to the login page on that status.
pub async fn require_session(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Ok(Some(_user)) = session.get::<String>(SESSION_USER_KEY).await {
        return Ok(next.run(request).await);
    }

    Err(ApiError::Unauthorized("Login required.".to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / and GET /login
/// Page shell: reports whether the caller holds an active session.
pub async fn index(session: Session) -> Result<Json<ShellResponse>, ApiError> {
    let authenticated = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .is_some();

    Ok(Json(ShellResponse { authenticated }))
}

/// POST /login
/// Verify credentials against the stored hash and establish a session.
/// Blank input, a failed lookup, and a failed hash check all report the
/// same message.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let username = payload.username.trim();
    let password = payload.password.trim();

    let is_valid = state
        .store()
        .verify_user_password(username, password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?;

    if !is_valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password.".to_string(),
        ));
    }

    session
        .insert(SESSION_USER_KEY, username.to_string())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("User logged in: {username}");

    Ok(Json(MessageResponse::new("Logged in successfully.")))
}

/// GET /logout
/// Invalidate the current session.
pub async fn logout(session: Session) -> Result<Json<MessageResponse>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))?;

    Ok(Json(MessageResponse::new("Logged out successfully.")))
}
