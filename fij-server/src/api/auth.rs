//! Session gate, login and logout
//!
//! With a password configured, every request must carry the `fi-session`
//! cookie derived from that password. Unauthenticated API calls get 401,
//! unauthenticated page loads are redirected to /login. Without a password the
//! gate is open.

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use fij_common::auth::{self, AuthMode, SESSION_COOKIE, SESSION_MAX_AGE_SECS};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{ApiError, ApiResult, AppState};

/// Paths reachable without a session
fn is_public_path(path: &str) -> bool {
    matches!(path, "/login" | "/api/auth" | "/health" | "/favicon.ico") || path.starts_with("/static/")
}

/// Value of the session cookie, if the request carries one
fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value for the session cookie
///
/// An empty token with max-age 0 clears the cookie.
fn session_set_cookie(token: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Session gate middleware, applied to every route
pub async fn session_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let AuthMode::Password(password) = &state.auth else {
        return next.run(request).await;
    };

    let path = request.uri().path();
    if is_public_path(path) {
        return next.run(request).await;
    }

    let authenticated = match session_cookie(request.headers()) {
        Some(token) => match auth::verify_session_token(password, token) {
            Ok(valid) => valid,
            Err(e) => return ApiError::from(e).into_response(),
        },
        None => false,
    };

    if authenticated {
        return next.run(request).await;
    }

    if path.starts_with("/api/") {
        ApiError::Unauthorized("Unauthorized".to_string()).into_response()
    } else {
        Redirect::to("/login").into_response()
    }
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /api/auth
///
/// Sets the session cookie when the password matches.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let AuthMode::Password(password) = &state.auth else {
        return Err(ApiError::Internal("No password configured".to_string()));
    };

    let Json(request) = payload?;
    let candidate = request.password.unwrap_or_default();

    if !auth::verify_password(password, &candidate)? {
        warn!("Rejected login attempt");
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    let token = auth::session_token(password)?;
    info!("Session established");

    Ok((
        [(
            header::SET_COOKIE,
            session_set_cookie(&token, SESSION_MAX_AGE_SECS, state.secure_cookies),
        )],
        Json(json!({ "ok": true })),
    )
        .into_response())
}

/// DELETE /api/auth
///
/// Clears the session cookie. Always succeeds.
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, session_set_cookie("", 0, state.secure_cookies))],
        Json(json!({ "ok": true })),
    )
        .into_response()
}
