use axum::{
    http::{header, HeaderMap, Uri},
    Json,
};

use crate::dtos::well_known::WellKnownResponse;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// `GET /v1/.well-known`: absolute URLs of every endpoint, as seen by the
/// caller (proxy headers win over the Host header).
pub async fn well_known(headers: HeaderMap, uri: Uri) -> Json<WellKnownResponse> {
    let scheme = header_str(&headers, FORWARDED_PROTO)
        .or(uri.scheme_str())
        .unwrap_or("http");
    let host = header_str(&headers, FORWARDED_HOST)
        .or_else(|| header_str(&headers, header::HOST.as_str()))
        .or(uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");
    let prefix = uri.path().trim_end_matches(".well-known");

    Json(WellKnownResponse::new(&format!("{scheme}://{host}{prefix}")))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
