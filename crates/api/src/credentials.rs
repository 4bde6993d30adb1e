// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Credential service: password hashing and signed session tokens.
//!
//! Tokens are HS256 JWTs carrying the member's id plus the `is_admin`
//! and `is_nda_accepted` claims. Claims are trusted as of issue time;
//! they are NOT re-read from the store on every request. The server's
//! admin extractor re-checks the authoritative record for
//! state-changing admin operations, which bounds the staleness window
//! for the high-privilege path.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Credential service errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// Password hashing or verification failed internally.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// A token could not be signed.
    #[error("Token issuance failed: {0}")]
    TokenIssue(String),

    /// A presented token failed verification: bad signature, expired,
    /// or malformed.
    #[error("Token verification failed: {0}")]
    TokenInvalid(String),
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The member's document id.
    pub sub: String,
    /// Admin privilege at token-issue time.
    pub is_admin: bool,
    /// NDA acceptance at token-issue time.
    pub is_nda_accepted: bool,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// The authenticated identity and authorization claims derived from a
/// verified token. Ephemeral; reconstructed per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The member's document id.
    pub id: String,
    /// Whether the token asserts admin privilege.
    pub is_admin: bool,
    /// Whether the token asserts NDA acceptance.
    pub is_nda_accepted: bool,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(id: String, is_admin: bool, is_nda_accepted: bool) -> Self {
        Self {
            id,
            is_admin,
            is_nda_accepted,
        }
    }
}

/// Password hashing and token issuance/verification.
pub struct CredentialService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
    hash_cost: u32,
}

impl CredentialService {
    /// Creates a credential service with the default bcrypt cost.
    #[must_use]
    pub fn new(secret: &str, token_ttl: Duration) -> Self {
        Self::with_hash_cost(secret, token_ttl, bcrypt::DEFAULT_COST)
    }

    /// Creates a credential service with an explicit bcrypt cost.
    /// Tests use a low cost; everything else should use [`Self::new`].
    #[must_use]
    pub fn with_hash_cost(secret: &str, token_ttl: Duration, hash_cost: u32) -> Self {
        let mut validation: Validation = Validation::new(Algorithm::HS256);
        // Expiry is enforced exactly; the default leeway would keep
        // just-expired tokens alive for another minute.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_ttl,
            hash_cost,
        }
    }

    /// Hashes a password with bcrypt. Deliberately slow.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Hashing` on internal failure.
    pub fn hash_password(&self, plaintext: &str) -> Result<String, CredentialError> {
        bcrypt::hash(plaintext, self.hash_cost).map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Hashing` if the stored hash is
    /// malformed.
    pub fn verify_password(&self, plaintext: &str, hash: &str) -> Result<bool, CredentialError> {
        bcrypt::verify(plaintext, hash).map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    /// Issues a signed session token for the principal.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::TokenIssue` if signing fails.
    pub fn issue_token(&self, principal: &Principal) -> Result<String, CredentialError> {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let claims: Claims = Claims {
            sub: principal.id.clone(),
            is_admin: principal.is_admin,
            is_nda_accepted: principal.is_nda_accepted,
            iat: now.unix_timestamp(),
            exp: (now + self.token_ttl).unix_timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CredentialError::TokenIssue(e.to_string()))
    }

    /// Verifies a token and reconstructs the principal from its claims.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::TokenInvalid` for a bad signature,
    /// expired token, or malformed token.
    pub fn verify_token(&self, token: &str) -> Result<Principal, CredentialError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| CredentialError::TokenInvalid(e.to_string()))?;
        Ok(Principal::new(
            data.claims.sub,
            data.claims.is_admin,
            data.claims.is_nda_accepted,
        ))
    }
}
