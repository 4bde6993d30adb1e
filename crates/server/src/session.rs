// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and access control for the server.
//!
//! Axum extractors that validate the bearer token and enforce role and
//! NDA requirements at the server boundary. Handlers name the guard
//! they need in their signature; an unguarded handler is public by
//! construction.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use atrium_api::{Principal, require_admin, require_nda_accepted};
use atrium_domain::{UserRecord, collections};

use crate::{AppState, ErrorResponse};

/// Extractor for any authenticated member.
///
/// Validates the `Authorization: Bearer <token>` header and yields the
/// [`Principal`] reconstructed from the token claims.
///
/// # Errors
///
/// Rejects with HTTP 401 when the header is missing or malformed, or
/// when the token is invalid or expired.
pub struct Member(pub Principal);

/// Extractor for a member who has accepted the NDA.
///
/// # Errors
///
/// Rejects with HTTP 401 like [`Member`], or 403 when the token's NDA
/// claim is unset.
pub struct NdaMember(pub Principal);

/// Extractor for an admin.
///
/// The token's admin claim alone is not trusted: the authoritative
/// user document is re-read, and the request is rejected unless it is
/// currently an admin and not soft-deleted. A revoked or deleted admin
/// is locked out immediately, not at token expiry.
///
/// # Errors
///
/// Rejects with HTTP 401 like [`Member`], or 403 when the stored
/// record does not grant admin privilege.
pub struct AdminMember(pub Principal);

impl FromRequestParts<AppState> for Member {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(verify_bearer(parts, state)?))
    }
}

impl FromRequestParts<AppState> for NdaMember {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal: Principal = verify_bearer(parts, state)?;
        require_nda_accepted(&principal)
            .map_err(|e| SessionError::Forbidden(e.to_string()))?;
        Ok(Self(principal))
    }
}

impl FromRequestParts<AppState> for AdminMember {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal: Principal = verify_bearer(parts, state)?;
        require_admin(&principal).map_err(|e| SessionError::Forbidden(e.to_string()))?;

        // The claim only says the member was an admin at token issue
        // time; the stored record decides whether they still are.
        let current: Option<UserRecord> = state
            .store
            .get(collections::USERS, &principal.id)
            .map_err(|e| {
                warn!(error = %e, user_id = %principal.id, "admin re-read failed");
                SessionError::Forbidden(String::from(
                    "Access denied. Admin privileges are required.",
                ))
            })?;
        match current {
            Some(user) if user.is_admin && !user.is_deleted => {
                debug!(user_id = %principal.id, "admin session validated");
                Ok(Self(principal))
            }
            _ => {
                warn!(user_id = %principal.id, "admin claim no longer backed by the record");
                Err(SessionError::Forbidden(String::from(
                    "Access denied. Admin privileges are required.",
                )))
            }
        }
    }
}

/// Parses the Authorization header and verifies the token.
fn verify_bearer(parts: &Parts, state: &AppState) -> Result<Principal, SessionError> {
    let auth_header: &str = parts
        .headers
        .get("Authorization")
        .ok_or_else(|| {
            debug!("missing Authorization header");
            SessionError::MissingAuthorizationHeader
        })?
        .to_str()
        .map_err(|_| {
            warn!("Authorization header is not valid UTF-8");
            SessionError::InvalidAuthorizationHeader
        })?;

    let token: &str = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Authorization header does not start with 'Bearer '");
        SessionError::InvalidAuthorizationHeader
    })?;

    state.credentials.verify_token(token).map_err(|e| {
        debug!(error = %e, "token verification failed");
        SessionError::InvalidToken
    })
}

/// Session extraction errors, converted to HTTP responses by axum.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// The token is invalid or expired.
    InvalidToken,
    /// The token is valid but the role or NDA requirement is not met.
    Forbidden(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Missing Authorization header."),
            ),
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Invalid Authorization header format. Expected: 'Bearer <token>'."),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                String::from("Invalid or expired token."),
            ),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message),
        };

        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message,
        });
        (status, body).into_response()
    }
}
