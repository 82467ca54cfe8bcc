use std::sync::Arc;

use super::{
    clients::ClientStore,
    error::{ServiceError, TokenRejection},
    metrics,
    tokens::TokenAuthority,
};
use crate::models::Token;

/// Credential exchange and bearer authentication, composed from a client
/// registry and a token authority.
#[derive(Clone)]
pub struct AuthService {
    clients: Arc<dyn ClientStore>,
    tokens: Arc<dyn TokenAuthority>,
}

impl AuthService {
    pub fn new(clients: Arc<dyn ClientStore>, tokens: Arc<dyn TokenAuthority>) -> Self {
        Self { clients, tokens }
    }

    /// Trade a client id/secret pair for a bearer token.
    pub fn exchange(&self, client_id: &str, client_secret: &str) -> Result<Token, ServiceError> {
        if let Err(e) = self.clients.verify(client_id, client_secret) {
            tracing::warn!(client_id = %client_id, "Client credentials rejected");
            return Err(e);
        }

        let token = self.tokens.issue(client_id)?;
        metrics::record_token_issued();
        tracing::info!(
            client_id = %client_id,
            expires_in = token.expires_in,
            "Access token issued"
        );
        Ok(token)
    }

    /// Resolve a bearer token to the client it belongs to.
    pub fn authenticate(&self, token: &str) -> Result<String, ServiceError> {
        if token.is_empty() {
            return Err(self.reject(TokenRejection::Missing));
        }

        match self.tokens.verify(token) {
            Ok(client_id) => Ok(client_id),
            Err(ServiceError::InvalidToken(rejection)) => Err(self.reject(rejection)),
            Err(e) => Err(e),
        }
    }

    fn reject(&self, rejection: TokenRejection) -> ServiceError {
        metrics::record_token_rejected(rejection.reason());
        tracing::info!(reason = rejection.reason(), error = %rejection, "Bearer token rejected");
        ServiceError::InvalidToken(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientCredential;
    use crate::services::{
        clients::{AllowAnyClients, MemoryClientStore},
        tokens::{AllowAnyAuthority, JwtTokenAuthority, SigningAlgorithm, SigningKeys},
    };

    fn jwt_auth() -> AuthService {
        let clients: Arc<dyn ClientStore> = Arc::new(MemoryClientStore::new([
            ClientCredential::new("sync-agent", "s3cret"),
        ]));
        let keys = SigningKeys::from_pem(
            SigningAlgorithm::Rs256,
            include_bytes!("../../testdata/keys/rsa_private.pem"),
            include_bytes!("../../testdata/keys/rsa_public.pem"),
        )
        .unwrap();
        let tokens = Arc::new(JwtTokenAuthority::new(keys, 600, clients.clone(), true));
        AuthService::new(clients, tokens)
    }

    #[test]
    fn exchange_then_authenticate() {
        let auth = jwt_auth();
        let token = auth.exchange("sync-agent", "s3cret").unwrap();
        assert_eq!(token.expires_in, 600);
        assert_eq!(auth.authenticate(&token.access_token).unwrap(), "sync-agent");
    }

    #[test]
    fn bad_credentials_issue_nothing() {
        let auth = jwt_auth();
        assert!(matches!(
            auth.exchange("sync-agent", "wrong"),
            Err(ServiceError::InvalidClient)
        ));
        assert!(matches!(
            auth.exchange("ghost", "s3cret"),
            Err(ServiceError::InvalidClient)
        ));
    }

    #[test]
    fn empty_token_is_missing() {
        assert!(matches!(
            jwt_auth().authenticate(""),
            Err(ServiceError::InvalidToken(TokenRejection::Missing))
        ));
    }

    #[test]
    fn permissive_doubles() {
        let auth = AuthService::new(Arc::new(AllowAnyClients), Arc::new(AllowAnyAuthority));
        assert_eq!(auth.exchange("x", "y").unwrap().access_token, "any token");
        assert_eq!(auth.authenticate("whatever").unwrap(), "any_client");
    }
}
