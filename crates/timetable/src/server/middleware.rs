pub mod session_validator {
    use axum::extract::Request;
    use axum::http::{HeaderMap, StatusCode};
    use axum::middleware::Next;
    use axum::response::{IntoResponse, Response};

    use crate::server::types::ApiErrorType;
    use crate::session::SessionKey;

    /// Header carrying the client's opaque session token.
    pub const SESSION_HEADER: &str = "x-session-token";

    /// Derives the session key from the request headers.
    pub fn session_key(headers: &HeaderMap) -> Option<SessionKey> {
        headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(SessionKey::from_token)
    }

    /// Rejects requests without a session token and makes the derived
    /// [`SessionKey`] available to handlers as an extension.
    pub async fn require_session_token(mut req: Request, next: Next) -> Response {
        match session_key(req.headers()) {
            Some(key) => {
                req.extensions_mut().insert(key);
                next.run(req).await
            }
            None => ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Missing session token",
                Some(format!("Set the {} header", SESSION_HEADER)),
            ))
            .into_response(),
        }
    }

}

pub use session_validator::SESSION_HEADER;
