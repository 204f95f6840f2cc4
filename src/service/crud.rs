//! Generic CRUD execution against a resource's collection, orchestrating validation and ownership checks.

use crate::config::{ResourceBinding, OWNER_FIELD, USERNAME_FIELD};
use crate::error::AppError;
use crate::service::{Authorizer, Identity, RequestValidator};
use crate::store::{Document, StoredDocument, ID_FIELD};
use serde_json::Value;

pub struct CrudService;

impl CrudService {
    /// Stamp ownership, validate, insert. Returns the assigned id.
    /// Each identity may hold at most one `user` record, carrying its own username.
    pub async fn create(binding: &ResourceBinding, identity: &Identity, payload: Value) -> Result<String, AppError> {
        let schema = &binding.schema;
        let mut body = body_to_document(payload)?;
        if schema.has_owner_field {
            body.insert(OWNER_FIELD.to_string(), Value::String(identity.subject.clone()));
        }
        Authorizer::check_user_claim(identity, schema, &body)?;
        if schema.is_user_resource()
            && !binding
                .collection
                .find_by_field(USERNAME_FIELD, &identity.subject)
                .await?
                .is_empty()
        {
            tracing::warn!(resource = %schema.name, subject = %identity.subject, "duplicate user record");
            return Err(AppError::Conflict("Username already exists".into()));
        }
        let body = validated(body, binding)?;
        let id = binding.collection.insert(&body).await?;
        tracing::info!(resource = %schema.name, %id, subject = %identity.subject, "item created");
        Ok(id)
    }

    /// Every document of the resource, each with its `_id`. No per-owner filtering.
    pub async fn list(binding: &ResourceBinding) -> Result<Vec<Value>, AppError> {
        let docs = binding.collection.find_all().await?;
        tracing::info!(resource = %binding.name(), count = docs.len(), "items retrieved");
        Ok(docs.into_iter().map(StoredDocument::into_json).collect())
    }

    /// Full replacement of one document. Ownership is carried over from the stored record.
    /// Returns the stored body after the update, without its identifier.
    pub async fn update(
        binding: &ResourceBinding,
        identity: &Identity,
        id: &str,
        payload: Value,
    ) -> Result<Value, AppError> {
        let schema = &binding.schema;
        let existing = Self::resolve(binding, identity, id).await?;

        let mut body = body_to_document(payload)?;
        if schema.has_owner_field {
            match existing.body.get(OWNER_FIELD) {
                Some(owner) => body.insert(OWNER_FIELD.to_string(), owner.clone()),
                None => body.remove(OWNER_FIELD),
            };
        }
        Authorizer::check_user_claim(identity, schema, &body)?;
        let body = validated(body, binding)?;

        if binding.collection.replace(id, &body).await? == 0 {
            return Err(AppError::NotFound(id.to_string()));
        }
        let updated = binding
            .collection
            .find_one(id)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        tracing::info!(resource = %schema.name, %id, subject = %identity.subject, "item updated");
        Ok(Value::Object(updated.body))
    }

    pub async fn delete(binding: &ResourceBinding, identity: &Identity, id: &str) -> Result<(), AppError> {
        Self::resolve(binding, identity, id).await?;
        if binding.collection.delete(id).await? == 0 {
            tracing::warn!(resource = %binding.name(), %id, "item not found");
            return Err(AppError::NotFound(id.to_string()));
        }
        tracing::info!(resource = %binding.name(), %id, subject = %identity.subject, "item deleted");
        Ok(())
    }

    /// Fetch the target of a mutation and run the ownership checks on it.
    async fn resolve(binding: &ResourceBinding, identity: &Identity, id: &str) -> Result<StoredDocument, AppError> {
        let existing = binding.collection.find_one(id).await?.ok_or_else(|| {
            tracing::warn!(resource = %binding.name(), %id, "item not found");
            AppError::NotFound(id.to_string())
        })?;
        if Authorizer::requires_existing(&binding.schema) {
            Authorizer::check_ownership(identity, &binding.schema, &existing)?;
        }
        Ok(existing)
    }
}

/// Request bodies must be JSON objects; a client-supplied `_id` is dropped.
fn body_to_document(payload: Value) -> Result<Document, AppError> {
    match payload {
        Value::Object(mut m) => {
            m.remove(ID_FIELD);
            Ok(m)
        }
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

fn validated(body: Document, binding: &ResourceBinding) -> Result<Document, AppError> {
    if let Err(e) = RequestValidator::validate(&Value::Object(body.clone()), &binding.schema) {
        tracing::warn!(resource = %binding.name(), error = %e, "validation failed");
        return Err(e);
    }
    Ok(body)
}
