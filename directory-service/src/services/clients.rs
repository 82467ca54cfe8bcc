use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;
use subtle::ConstantTimeEq;

use super::error::ServiceError;
use crate::models::ClientCredential;

/// Registered API clients.
pub trait ClientStore: Send + Sync {
    /// Check a presented id/secret pair.
    ///
    /// An unknown id and a wrong secret both fail with
    /// [`ServiceError::InvalidClient`] so callers cannot probe for ids.
    fn verify(&self, client_id: &str, client_secret: &str) -> Result<(), ServiceError>;

    /// Whether `client_id` is currently registered.
    fn contains(&self, client_id: &str) -> bool;
}

/// In-memory client registry, fixed at construction.
#[derive(Default)]
pub struct MemoryClientStore {
    clients: HashMap<String, Secret<String>>,
}

impl MemoryClientStore {
    pub fn new(credentials: impl IntoIterator<Item = ClientCredential>) -> Self {
        let clients = credentials
            .into_iter()
            .map(|c| (c.client_id, c.client_secret))
            .collect();
        Self { clients }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ClientStore for MemoryClientStore {
    fn verify(&self, client_id: &str, client_secret: &str) -> Result<(), ServiceError> {
        let Some(expected) = self.clients.get(client_id) else {
            return Err(ServiceError::InvalidClient);
        };

        let matches: bool = expected
            .expose_secret()
            .as_bytes()
            .ct_eq(client_secret.as_bytes())
            .into();
        if matches {
            Ok(())
        } else {
            Err(ServiceError::InvalidClient)
        }
    }

    fn contains(&self, client_id: &str) -> bool {
        self.clients.contains_key(client_id)
    }
}

/// Accepts every pair and knows every id. Test and demo setups only.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAnyClients;

impl ClientStore for AllowAnyClients {
    fn verify(&self, _client_id: &str, _client_secret: &str) -> Result<(), ServiceError> {
        Ok(())
    }

    fn contains(&self, _client_id: &str) -> bool {
        true
    }
}
