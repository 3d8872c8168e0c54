use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use thiserror::Error;
use tracing::error;

use crate::token::claims::TokenClaims;

/// Errors returned by token encoding and verification.
///
/// `InvalidSignature` and `Malformed` come out of [`TokenCodec::decode`];
/// `Expired` only out of [`TokenCodec::verify`], which checks `exp` after the signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token expired")]
    Expired,
    #[error("invalid signing key")]
    InvalidKey,
    #[error("failed to sign token")]
    Signing,
}

/// HS256 codec over the fleet-wide shared secret.
///
/// - Key material is intentionally not printable via Debug.
/// - Expiry is not enforced by `decode`; callers that care use `verify`.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish()
    }
}

impl TokenCodec {
    /// Build a codec from the base64-encoded secret shared by all services.
    pub fn from_base64_secret(secret_b64: &str) -> Result<Self, TokenError> {
        let encoding_key =
            EncodingKey::from_base64_secret(secret_b64).map_err(|_| TokenError::InvalidKey)?;
        let decoding_key =
            DecodingKey::from_base64_secret(secret_b64).map_err(|_| TokenError::InvalidKey)?;

        Ok(Self::with_keys(encoding_key, decoding_key))
    }

    /// Build a codec from raw key bytes.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self::with_keys(
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
        )
    }

    fn with_keys(encoding_key: EncodingKey, decoding_key: DecodingKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is checked separately so an expired token is distinguishable from a forged one
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign token");
            TokenError::Signing
        })
    }

    /// Verify the signature and parse the claim set.
    ///
    /// Claims are only deserialized after the signature matched, so a tampered payload
    /// can never surface as claims.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        if data.claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed("empty 'sub' claim".to_string()));
        }

        Ok(data.claims)
    }

    /// `decode` + expiry check against `now` (epoch seconds).
    pub fn verify(&self, token: &str, now: i64) -> Result<TokenClaims, TokenError> {
        let claims = self.decode(token)?;
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
