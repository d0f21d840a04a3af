use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token signing failed: {0}")]
    Sign(jsonwebtoken::errors::Error),
    #[error("invalid 'sub' (expected UUID)")]
    InvalidSubject,
}

/// Auth token claims.
///
/// `prm` is an arbitrary value bound into the token at issue time and handed
/// back to the handler together with the identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokenClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prm: Option<Value>,
}

/// Result of a successful verification.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub user_id: Uuid,
    pub parameter: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// HS256 token issuer/verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl_seconds: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("validation", &self.validation)
            .field("default_ttl_seconds", &self.default_ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, default_ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl_seconds,
        }
    }

    pub fn issue(
        &self,
        user_id: Uuid,
        parameter: Option<Value>,
        ttl_seconds: Option<u64>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_in = ttl_seconds.unwrap_or(self.default_ttl_seconds);
        let now = Utc::now().timestamp().max(0) as u64;

        let claims = AuthTokenClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(expires_in),
            prm: parameter,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(TokenError::Sign)?;

        Ok(IssuedToken { token, expires_in })
    }

    /// Verify signature and expiry, then promote `sub` to a UUID.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data =
            jsonwebtoken::decode::<AuthTokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidSubject)?;

        Ok(VerifiedToken {
            user_id,
            parameter: claims.prm,
        })
    }
}
