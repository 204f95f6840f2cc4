//! Resource definitions: a named JSON Schema plus the facts derived from it at load time.

use crate::config::validator::check_definition;
use crate::error::SchemaError;
use serde_json::Value;
use std::sync::Arc;

/// Property that, when declared, makes records owned by their creator.
pub const OWNER_FIELD: &str = "owner";
/// Resource type whose records are owned by the identity named in `username`.
pub const USER_RESOURCE: &str = "user";
pub const USERNAME_FIELD: &str = "username";

#[derive(Clone)]
pub struct ResourceSchema {
    pub name: String,
    pub definition: Value,
    /// True when `properties` declares `owner`.
    pub has_owner_field: bool,
    validator: Arc<jsonschema::Validator>,
}

impl ResourceSchema {
    /// Check and compile a definition. Fails on anything that is not a usable JSON Schema object.
    pub fn new(name: impl Into<String>, definition: Value) -> Result<Self, SchemaError> {
        let name = name.into();
        check_definition(&name, &definition)?;
        let validator = jsonschema::validator_for(&definition).map_err(|e| SchemaError::InvalidDefinition {
            name: name.clone(),
            message: e.to_string(),
        })?;
        let has_owner_field = definition
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|props| props.contains_key(OWNER_FIELD));
        Ok(Self {
            name,
            definition,
            has_owner_field,
            validator: Arc::new(validator),
        })
    }

    pub fn is_user_resource(&self) -> bool {
        self.name == USER_RESOURCE
    }

    pub fn validator(&self) -> &jsonschema::Validator {
        &self.validator
    }
}

impl std::fmt::Debug for ResourceSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceSchema")
            .field("name", &self.name)
            .field("has_owner_field", &self.has_owner_field)
            .finish_non_exhaustive()
    }
}
