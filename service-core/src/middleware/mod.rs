pub mod metrics;
pub mod rate_limit;
pub mod recover;
pub mod security_headers;
pub mod tracing;
