use serde::{Deserialize, Serialize};

/// A bearer token handed to a client after a successful credential exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    /// Lifetime in seconds, counted from issuance.
    pub expires_in: i64,
}
