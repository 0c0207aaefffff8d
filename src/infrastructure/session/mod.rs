use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sid";
const SESSION_MAX_AGE_SECS: u64 = 24 * 60 * 60;
const MAX_SESSION_ID_LEN: usize = 128;

/// Session id wrapper type for extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

/// Middleware that attaches a session id to every request
///
/// The id comes from the `sid` cookie, or is generated for new visitors. The
/// cookie is (re)issued on every response so it expires a day after last use.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let (session_id, is_new) = match session_from_cookies(request.headers()) {
        Some(existing) => (existing, false),
        None => (Uuid::new_v4().to_string(), true),
    };

    if is_new {
        tracing::debug!(session_id = %session_id, "New session created");
    }

    request
        .extensions_mut()
        .insert(SessionId(session_id.clone()));

    let mut response = next.run(request).await;

    let cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id, SESSION_MAX_AGE_SECS
    );
    if let Ok(header_value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, header_value);
    }

    response
}

fn session_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| is_valid_session_id(value))
}

fn is_valid_session_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_SESSION_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
