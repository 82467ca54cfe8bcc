use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is propagated as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation id of the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Propagates the caller's `x-request-id`, or mints a UUID when it is absent,
/// empty, too long or not visible ASCII. The id is written back onto the
/// request (so the trace span sees it), into extensions, and onto the response.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let header_value = incoming_request_id(req.headers()).unwrap_or_else(minted_request_id);

    if let Ok(id) = header_value.to_str() {
        req.extensions_mut().insert(RequestId(id.to_string()));
    }
    req.headers_mut()
        .insert(REQUEST_ID_HEADER, header_value.clone());

    let mut response = next.run(req).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    response
}

fn incoming_request_id(headers: &HeaderMap) -> Option<HeaderValue> {
    headers
        .get(REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .filter(|value| value.as_bytes().iter().all(|b| b.is_ascii_graphic()))
        .cloned()
}

fn minted_request_id() -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}
