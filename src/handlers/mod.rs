//! HTTP handlers for resources, tokens and fixed endpoints.

pub mod auth;
pub mod common;
pub mod resource;
