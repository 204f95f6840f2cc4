//! Identity resolution and per-record ownership rules.
//!
//! Two independent predicates guard mutations: the generic `owner` check for schemas that declare
//! an owner field, and the `username` check for the reserved `user` resource. Both apply when both
//! conditions hold.

use crate::config::{ResourceSchema, OWNER_FIELD, USERNAME_FIELD};
use crate::error::AppError;
use crate::store::{Document, StoredDocument};
use crate::token::{TokenService, TokenType};
use serde_json::Value;

/// Authenticated subject, recovered only from a verified access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

/// Token part of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub struct Authorizer;

impl Authorizer {
    /// Resolve the acting identity from the raw `Authorization` header value.
    pub fn authenticate(tokens: &TokenService, header: Option<&str>) -> Result<Identity, AppError> {
        let token = header.and_then(bearer_token).ok_or(AppError::Unauthorized)?;
        let claims = tokens
            .verify(token, TokenType::Access)
            .ok_or(AppError::Unauthorized)?;
        Ok(Identity { subject: claims.sub })
    }

    /// Whether mutations on this resource must look at the stored record first.
    pub fn requires_existing(schema: &ResourceSchema) -> bool {
        schema.has_owner_field || schema.is_user_resource()
    }

    /// Ownership checks for update/delete against the currently stored record.
    pub fn check_ownership(
        identity: &Identity,
        schema: &ResourceSchema,
        existing: &StoredDocument,
    ) -> Result<(), AppError> {
        if schema.has_owner_field && !field_matches(&existing.body, OWNER_FIELD, &identity.subject) {
            tracing::warn!(resource = %schema.name, id = %existing.id, subject = %identity.subject, "not the owner");
            return Err(AppError::Unauthorized);
        }
        if schema.is_user_resource() && !field_matches(&existing.body, USERNAME_FIELD, &identity.subject) {
            tracing::warn!(resource = %schema.name, id = %existing.id, subject = %identity.subject, "not the user");
            return Err(AppError::Unauthorized);
        }
        Ok(())
    }

    /// A `user` record written by create or update must name the acting identity.
    pub fn check_user_claim(identity: &Identity, schema: &ResourceSchema, body: &Document) -> Result<(), AppError> {
        if schema.is_user_resource() && !field_matches(body, USERNAME_FIELD, &identity.subject) {
            tracing::warn!(resource = %schema.name, subject = %identity.subject, "username does not match subject");
            return Err(AppError::Unauthorized);
        }
        Ok(())
    }
}

/// A missing or non-string field never matches.
fn field_matches(body: &Document, field: &str, subject: &str) -> bool {
    matches!(body.get(field), Some(Value::String(s)) if s == subject)
}
