//! Extract the authenticated identity from the `Authorization: Bearer` header.

use crate::error::AppError;
use crate::service::{Authorizer, Identity};
use crate::token::TokenService;
use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

/// Rejects with 401 before any handler logic runs.
#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        Authorizer::authenticate(&tokens, header)
    }
}
