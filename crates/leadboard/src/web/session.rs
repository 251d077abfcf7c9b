//! Optional password login backed by in-memory sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::{error::WebError, views, AppState};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "leadboard_session";

/// Issued sessions and the password they were issued against.
#[derive(Debug, Clone)]
pub struct SessionStore {
    password_hash: Option<blake3::Hash>,
    ttl: Duration,
    sessions: Arc<Mutex<HashMap<String, Instant>>>,
}

impl SessionStore {
    /// A store guarding `password`; `None` disables login entirely.
    #[must_use]
    pub fn new(password: Option<&str>, ttl: Duration) -> Self {
        Self {
            password_hash: password.map(|p| blake3::hash(p.as_bytes())),
            ttl,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether requests need a session.
    #[must_use]
    pub fn login_required(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Check a submitted password.
    #[must_use]
    pub fn verify_password(&self, candidate: &str) -> bool {
        // blake3::Hash equality is constant-time.
        self.password_hash
            .is_some_and(|expected| blake3::hash(candidate.as_bytes()) == expected)
    }

    /// Issue a new session token.
    #[must_use]
    pub fn create(&self) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        sessions.retain(|_, expires| *expires > now);
        sessions.insert(token.clone(), now + self.ttl);
        token
    }

    /// Whether `token` names a live session.
    #[must_use]
    pub fn is_valid(&self, token: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.get(token) {
            Some(expires) if *expires > Instant::now() => true,
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    /// Forget a session.
    pub fn remove(&self, token: &str) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|expires| **expires > now)
            .count()
    }

    /// Whether there are no live sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.ttl.as_secs()
        )
    }
}

fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Session token from the request's `Cookie` headers.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

fn is_api_path(path: &str) -> bool {
    path.starts_with("/api/") || path.starts_with("/debug/") || path == "/refresh-data"
}

/// Middleware rejecting requests without a live session.
///
/// Browsers are sent to `/login`; API paths get a 401.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.sessions.login_required() {
        return next.run(request).await;
    }

    let authorized = session_token(request.headers()).is_some_and(|t| state.sessions.is_valid(&t));
    if authorized {
        return next.run(request).await;
    }

    if is_api_path(request.uri().path()) {
        WebError::LoginRequired.into_response()
    } else {
        Redirect::to("/login").into_response()
    }
}

/// Submitted login form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// The password.
    pub password: String,
}

/// `GET /login`
pub async fn login_page(State(state): State<Arc<AppState>>) -> Response {
    if !state.sessions.login_required() {
        return Redirect::to("/").into_response();
    }
    Html(views::login_page(None)).into_response()
}

/// `POST /login`
pub async fn login(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    if !state.sessions.login_required() {
        return Redirect::to("/").into_response();
    }

    if !state.sessions.verify_password(&form.password) {
        warn!("Rejected login attempt");
        return (
            StatusCode::UNAUTHORIZED,
            Html(views::login_page(Some("Incorrect password"))),
        )
            .into_response();
    }

    let token = state.sessions.create();
    info!("Session started");
    with_cookie(Redirect::to("/").into_response(), &state.sessions.set_cookie(&token))
}

/// `POST /logout`
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.remove(&token);
    }
    with_cookie(Redirect::to("/login").into_response(), &clear_cookie())
}

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Some("hunter2"), Duration::from_secs(60))
    }

    #[test]
    fn test_no_password_disables_login() {
        let sessions = SessionStore::new(None, Duration::from_secs(60));
        assert!(!sessions.login_required());
        assert!(!sessions.verify_password(""));
    }

    #[test]
    fn test_verify_password() {
        let sessions = store();
        assert!(sessions.login_required());
        assert!(sessions.verify_password("hunter2"));
        assert!(!sessions.verify_password("hunter3"));
    }

    #[test]
    fn test_session_lifecycle() {
        let sessions = store();
        let token = sessions.create();
        assert!(sessions.is_valid(&token));
        assert_eq!(sessions.len(), 1);

        sessions.remove(&token);
        assert!(!sessions.is_valid(&token));
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_expired_session_rejected() {
        let sessions = SessionStore::new(Some("pw"), Duration::ZERO);
        let token = sessions.create();
        assert!(!sessions.is_valid(&token));
    }

    #[test]
    fn test_unknown_token_rejected() {
        assert!(!store().is_valid("not-a-session"));
    }

    #[test]
    fn test_session_token_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; leadboard_session=abc-123; other=1"),
        );
        assert_eq!(session_token(&headers), Some("abc-123".to_string()));

        headers.insert(header::COOKIE, HeaderValue::from_static("leadboard_session="));
        assert_eq!(session_token(&headers), None);

        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cookie_strings() {
        let cookie = store().set_cookie("tok");
        assert!(cookie.starts_with("leadboard_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.ends_with("Max-Age=60"));
        assert!(clear_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn test_api_paths() {
        assert!(is_api_path("/api/dashboard-data"));
        assert!(is_api_path("/debug/current-data"));
        assert!(is_api_path("/refresh-data"));
        assert!(!is_api_path("/filter"));
    }
}
