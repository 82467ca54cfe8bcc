use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};

use super::{
    clients::ClientStore,
    error::{ServiceError, TokenRejection},
};
use crate::models::Token;

/// Value of the `spec` claim carried by every token this service issues.
pub const SPEC_VERSION: &str = "v1";

/// Clock drift tolerated on both ends of a token's validity window.
pub const ACCEPTABLE_SKEW_SECONDS: i64 = 120;

/// Issues and checks bearer tokens.
pub trait TokenAuthority: Send + Sync {
    /// Issue a token for a client whose credentials were already verified.
    fn issue(&self, client_id: &str) -> Result<Token, ServiceError>;

    /// Resolve a presented token to the client id it was issued to.
    fn verify(&self, token: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,
    #[serde(default)]
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    #[serde(rename = "RS256")]
    Rs256,
    #[serde(rename = "ES256")]
    Es256,
}

impl From<SigningAlgorithm> for Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::Rs256 => Algorithm::RS256,
            SigningAlgorithm::Es256 => Algorithm::ES256,
        }
    }
}

/// An asymmetric key pair ready for signing and verification.
#[derive(Clone)]
pub struct SigningKeys {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    pub fn from_pem(
        algorithm: SigningAlgorithm,
        private_pem: &[u8],
        public_pem: &[u8],
    ) -> Result<Self, anyhow::Error> {
        let (encoding, decoding) = match algorithm {
            SigningAlgorithm::Rs256 => (
                EncodingKey::from_rsa_pem(private_pem),
                DecodingKey::from_rsa_pem(public_pem),
            ),
            SigningAlgorithm::Es256 => (
                EncodingKey::from_ec_pem(private_pem),
                DecodingKey::from_ec_pem(public_pem),
            ),
        };

        Ok(Self {
            algorithm: algorithm.into(),
            encoding: encoding
                .map_err(|e| anyhow::anyhow!("Failed to parse private key: {}", e))?,
            decoding: decoding.map_err(|e| anyhow::anyhow!("Failed to parse public key: {}", e))?,
        })
    }

    pub fn from_files(
        algorithm: SigningAlgorithm,
        private_key_path: &Path,
        public_key_path: &Path,
    ) -> Result<Self, anyhow::Error> {
        let private_pem = fs::read(private_key_path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read private key from {}: {}",
                private_key_path.display(),
                e
            )
        })?;
        let public_pem = fs::read(public_key_path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read public key from {}: {}",
                public_key_path.display(),
                e
            )
        })?;

        Self::from_pem(algorithm, &private_pem, &public_pem)
    }

    /// Fresh 2048-bit RSA pair. Tokens signed with it die with the process.
    pub fn generate_rsa() -> Result<Self, anyhow::Error> {
        use rand::rngs::OsRng;
        use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
        use rsa::RsaPrivateKey;

        let private_key = RsaPrivateKey::new(&mut OsRng, 2048)?;
        let public_key = private_key.to_public_key();

        let private_pem = private_key.to_pkcs8_pem(LineEnding::LF)?;
        let public_pem = public_key.to_public_key_pem(LineEnding::LF)?;

        Self::from_pem(
            SigningAlgorithm::Rs256,
            private_pem.as_bytes(),
            public_pem.as_bytes(),
        )
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

/// Self-contained JWT bearer tokens.
///
/// A token is valid from `nbf - skew` through `exp + skew`, and only if it
/// carries `"spec": "v1"` and a subject. With `require_known_subject` the
/// subject must also still be a registered client, so removing a client
/// invalidates the tokens it already holds.
pub struct JwtTokenAuthority {
    keys: SigningKeys,
    ttl_seconds: i64,
    clients: Arc<dyn ClientStore>,
    require_known_subject: bool,
}

impl JwtTokenAuthority {
    pub fn new(
        keys: SigningKeys,
        ttl_seconds: i64,
        clients: Arc<dyn ClientStore>,
        require_known_subject: bool,
    ) -> Self {
        Self {
            keys,
            ttl_seconds,
            clients,
            require_known_subject,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issue a token as if the clock read `now` (unix seconds).
    pub fn issue_at(&self, client_id: &str, now: i64) -> Result<Token, ServiceError> {
        let exp = now.checked_add(self.ttl_seconds).ok_or_else(|| {
            anyhow::anyhow!("Token lifetime of {}s overflows the clock", self.ttl_seconds)
        })?;
        let claims = Claims {
            sub: client_id.to_string(),
            spec: Some(SPEC_VERSION.to_string()),
            iat: now,
            nbf: now,
            exp,
        };

        let header = Header::new(self.keys.algorithm);
        let access_token = encode(&header, &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))?;

        Ok(Token {
            access_token,
            expires_in: self.ttl_seconds,
        })
    }

    /// Verify a token as if the clock read `now` (unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<String, ServiceError> {
        let mut validation = Validation::new(self.keys.algorithm);
        // Time windows are checked below against the injected clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        let claims = decode::<Claims>(token, &self.keys.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => {
                    TokenRejection::MissingSubject
                }
                _ => TokenRejection::Malformed(e.to_string()),
            })?
            .claims;

        if now > claims.exp.saturating_add(ACCEPTABLE_SKEW_SECONDS) {
            return Err(TokenRejection::Expired.into());
        }
        if claims.nbf.saturating_sub(ACCEPTABLE_SKEW_SECONDS) > now {
            return Err(TokenRejection::NotYetValid.into());
        }
        if claims.spec.as_deref() != Some(SPEC_VERSION) {
            return Err(TokenRejection::WrongVersion.into());
        }
        if claims.sub.is_empty() {
            return Err(TokenRejection::MissingSubject.into());
        }
        if self.require_known_subject && !self.clients.contains(&claims.sub) {
            return Err(TokenRejection::UnknownSubject(claims.sub).into());
        }

        Ok(claims.sub)
    }
}

impl TokenAuthority for JwtTokenAuthority {
    fn issue(&self, client_id: &str) -> Result<Token, ServiceError> {
        self.issue_at(client_id, Utc::now().timestamp())
    }

    fn verify(&self, token: &str) -> Result<String, ServiceError> {
        self.verify_at(token, Utc::now().timestamp())
    }
}

/// Issues a fixed token and accepts any token as `any_client`.
/// Test and demo setups only.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAnyAuthority;

impl AllowAnyAuthority {
    pub const ACCESS_TOKEN: &'static str = "any token";
    pub const EXPIRES_IN: i64 = 7200;
    pub const CLIENT_ID: &'static str = "any_client";
}

impl TokenAuthority for AllowAnyAuthority {
    fn issue(&self, _client_id: &str) -> Result<Token, ServiceError> {
        Ok(Token {
            access_token: Self::ACCESS_TOKEN.to_string(),
            expires_in: Self::EXPIRES_IN,
        })
    }

    fn verify(&self, _token: &str) -> Result<String, ServiceError> {
        Ok(Self::CLIENT_ID.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientCredential;
    use crate::services::clients::MemoryClientStore;

    const RSA_PRIVATE: &str = include_str!("../../testdata/keys/rsa_private.pem");
    const RSA_PUBLIC: &str = include_str!("../../testdata/keys/rsa_public.pem");
    const RSA_OTHER_PRIVATE: &str = include_str!("../../testdata/keys/rsa_other_private.pem");
    const RSA_OTHER_PUBLIC: &str = include_str!("../../testdata/keys/rsa_other_public.pem");
    const EC_PRIVATE: &str = include_str!("../../testdata/keys/ec_private.pem");
    const EC_PUBLIC: &str = include_str!("../../testdata/keys/ec_public.pem");

    const TTL: i64 = 7200;
    const NOW: i64 = 1_700_000_000;

    fn rsa_keys() -> SigningKeys {
        SigningKeys::from_pem(
            SigningAlgorithm::Rs256,
            RSA_PRIVATE.as_bytes(),
            RSA_PUBLIC.as_bytes(),
        )
        .unwrap()
    }

    fn clients() -> Arc<MemoryClientStore> {
        Arc::new(MemoryClientStore::new([ClientCredential::new(
            "sync-agent",
            "s3cret",
        )]))
    }

    fn authority(require_known_subject: bool) -> JwtTokenAuthority {
        JwtTokenAuthority::new(rsa_keys(), TTL, clients(), require_known_subject)
    }

    fn signed(claims: &serde_json::Value) -> String {
        let key = EncodingKey::from_rsa_pem(RSA_PRIVATE.as_bytes()).unwrap();
        encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
    }

    fn rejection(result: Result<String, ServiceError>) -> TokenRejection {
        match result {
            Err(ServiceError::InvalidToken(r)) => r,
            other => panic!("expected token rejection, got {other:?}"),
        }
    }

    #[test]
    fn issued_token_resolves_to_client() {
        let authority = authority(true);
        let token = authority.issue_at("sync-agent", NOW).unwrap();

        assert_eq!(token.expires_in, TTL);
        assert_eq!(token.access_token.split('.').count(), 3);
        assert_eq!(authority.verify_at(&token.access_token, NOW).unwrap(), "sync-agent");
    }

    #[test]
    fn issued_claims_carry_version_and_window() {
        let authority = authority(true);
        let token = authority.issue_at("sync-agent", NOW).unwrap();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        let claims = decode::<Claims>(
            &token.access_token,
            &DecodingKey::from_rsa_pem(RSA_PUBLIC.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap()
        .claims;

        assert_eq!(claims.sub, "sync-agent");
        assert_eq!(claims.spec.as_deref(), Some("v1"));
        assert_eq!(claims.iat, NOW);
        assert_eq!(claims.nbf, NOW);
        assert_eq!(claims.exp, NOW + TTL);
    }

    #[test]
    fn token_lifecycle_respects_ttl_and_skew() {
        let authority = authority(true);
        let token = authority.issue_at("sync-agent", NOW).unwrap().access_token;

        assert!(authority.verify_at(&token, NOW + TTL - 1).is_ok());
        assert!(authority.verify_at(&token, NOW + TTL + ACCEPTABLE_SKEW_SECONDS).is_ok());
        assert_eq!(
            rejection(authority.verify_at(&token, NOW + TTL + ACCEPTABLE_SKEW_SECONDS + 1)),
            TokenRejection::Expired
        );
    }

    #[test]
    fn overflowing_lifetime_is_an_internal_error() {
        let authority = JwtTokenAuthority::new(rsa_keys(), i64::MAX, clients(), true);

        assert!(matches!(
            authority.issue_at("sync-agent", NOW),
            Err(ServiceError::Internal(_))
        ));
    }

    #[test]
    fn far_future_expiry_does_not_overflow_verification() {
        let authority = authority(false);
        let token = signed(&serde_json::json!({
            "sub": "sync-agent",
            "spec": "v1",
            "iat": NOW,
            "nbf": NOW,
            "exp": i64::MAX,
        }));

        assert_eq!(authority.verify_at(&token, NOW).unwrap(), "sync-agent");
    }

    #[test]
    fn early_use_is_tolerated_within_skew() {
        let authority = authority(true);
        let token = authority.issue_at("sync-agent", NOW).unwrap().access_token;

        assert!(authority.verify_at(&token, NOW - ACCEPTABLE_SKEW_SECONDS).is_ok());
        assert_eq!(
            rejection(authority.verify_at(&token, NOW - ACCEPTABLE_SKEW_SECONDS - 1)),
            TokenRejection::NotYetValid
        );
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let foreign = JwtTokenAuthority::new(
            SigningKeys::from_pem(
                SigningAlgorithm::Rs256,
                RSA_OTHER_PRIVATE.as_bytes(),
                RSA_OTHER_PUBLIC.as_bytes(),
            )
            .unwrap(),
            TTL,
            clients(),
            true,
        );
        let token = foreign.issue_at("sync-agent", NOW).unwrap().access_token;

        assert_eq!(
            rejection(authority(true).verify_at(&token, NOW)),
            TokenRejection::BadSignature
        );
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let authority = authority(true);
        let token = authority.issue_at("sync-agent", NOW).unwrap().access_token;
        let forged = signed(&serde_json::json!({
            "sub": "intruder", "spec": "v1", "iat": NOW, "nbf": NOW, "exp": NOW + TTL
        }));

        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        let spliced = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(
            rejection(authority.verify_at(&spliced, NOW)),
            TokenRejection::BadSignature
        );
    }

    #[test]
    fn garbage_is_malformed() {
        for token in ["", "abc", "a.b.c"] {
            assert!(matches!(
                rejection(authority(true).verify_at(token, NOW)),
                TokenRejection::Malformed(_)
            ));
        }
    }

    #[test]
    fn version_claim_is_required() {
        let authority = authority(true);
        let missing = signed(&serde_json::json!({
            "sub": "sync-agent", "iat": NOW, "nbf": NOW, "exp": NOW + TTL
        }));
        let wrong = signed(&serde_json::json!({
            "sub": "sync-agent", "spec": "v2", "iat": NOW, "nbf": NOW, "exp": NOW + TTL
        }));

        assert_eq!(rejection(authority.verify_at(&missing, NOW)), TokenRejection::WrongVersion);
        assert_eq!(rejection(authority.verify_at(&wrong, NOW)), TokenRejection::WrongVersion);
    }

    #[test]
    fn subject_is_required() {
        let token = signed(&serde_json::json!({
            "spec": "v1", "iat": NOW, "nbf": NOW, "exp": NOW + TTL
        }));
        assert_eq!(
            rejection(authority(false).verify_at(&token, NOW)),
            TokenRejection::MissingSubject
        );
    }

    #[test]
    fn unknown_subject_is_configurable() {
        let token = authority(false).issue_at("retired-client", NOW).unwrap().access_token;

        assert_eq!(
            rejection(authority(true).verify_at(&token, NOW)),
            TokenRejection::UnknownSubject("retired-client".to_string())
        );
        assert_eq!(authority(false).verify_at(&token, NOW).unwrap(), "retired-client");
    }

    #[test]
    fn ec_keys_sign_es256() {
        let keys = SigningKeys::from_pem(
            SigningAlgorithm::Es256,
            EC_PRIVATE.as_bytes(),
            EC_PUBLIC.as_bytes(),
        )
        .unwrap();
        assert_eq!(keys.algorithm(), Algorithm::ES256);

        let authority = JwtTokenAuthority::new(keys, TTL, clients(), true);
        let token = authority.issue_at("sync-agent", NOW).unwrap().access_token;
        assert_eq!(authority.verify_at(&token, NOW).unwrap(), "sync-agent");

        // An RS256 verifier must not accept it.
        assert!(authority_rejects(&token));
    }

    fn authority_rejects(token: &str) -> bool {
        authority(true).verify_at(token, NOW).is_err()
    }

    #[test]
    fn keys_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let private_path = dir.path().join("private.pem");
        let public_path = dir.path().join("public.pem");
        std::fs::write(&private_path, RSA_PRIVATE).unwrap();
        std::fs::write(&public_path, RSA_PUBLIC).unwrap();

        let keys =
            SigningKeys::from_files(SigningAlgorithm::Rs256, &private_path, &public_path).unwrap();
        assert_eq!(keys.algorithm(), Algorithm::RS256);

        assert!(SigningKeys::from_files(
            SigningAlgorithm::Rs256,
            &dir.path().join("missing.pem"),
            &public_path
        )
        .is_err());
    }

    #[test]
    fn mismatched_key_type_fails_to_load() {
        assert!(SigningKeys::from_pem(
            SigningAlgorithm::Es256,
            RSA_PRIVATE.as_bytes(),
            RSA_PUBLIC.as_bytes()
        )
        .is_err());
    }

    #[test]
    #[ignore = "RSA key generation is slow in debug builds"]
    fn generated_keys_round_trip() {
        let authority = JwtTokenAuthority::new(SigningKeys::generate_rsa().unwrap(), TTL, clients(), true);
        let token = authority.issue_at("sync-agent", NOW).unwrap().access_token;
        assert_eq!(authority.verify_at(&token, NOW).unwrap(), "sync-agent");
    }

    #[test]
    fn allow_any_authority() {
        let token = AllowAnyAuthority.issue("whoever").unwrap();
        assert_eq!(token.access_token, "any token");
        assert_eq!(token.expires_in, 7200);
        assert_eq!(AllowAnyAuthority.verify("garbage").unwrap(), "any_client");
    }
}
