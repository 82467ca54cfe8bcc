use secrecy::Secret;
use serde::Deserialize;

/// A registered API client. The secret is never logged or echoed.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredential {
    pub client_id: String,
    pub client_secret: Secret<String>,
}

impl ClientCredential {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
        }
    }
}
