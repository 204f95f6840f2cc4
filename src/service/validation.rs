//! Structural validation of documents against their resource schema.

use crate::config::ResourceSchema;
use crate::error::AppError;
use serde_json::Value;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a full document. All violations are reported in one message.
    pub fn validate(document: &Value, schema: &ResourceSchema) -> Result<(), AppError> {
        let errors: Vec<String> = schema
            .validator()
            .iter_errors(document)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors.join("; ")))
        }
    }
}
