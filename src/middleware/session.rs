use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const SESSION_HEADER: &str = "x-session-key";

// The visitor's session identifier: taken from the X-Session-Key header,
// minted fresh when the client did not send one. The key is echoed back on
// every response so the client can persist it.
#[derive(Clone, Debug)]
pub struct SessionKey(pub String);

pub async fn session_middleware(mut req: Request, next: Next) -> Response {
    let key = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(SessionKey(key.clone()));

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&key) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(SESSION_HEADER), value);
    }

    response
}
