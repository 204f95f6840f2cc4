//! Definition checks applied before a schema is compiled.

use crate::error::SchemaError;
use crate::store::is_valid_collection_name;
use serde_json::Value;

/// Names starting with `_` belong to internal collections and never get routes.
pub(crate) fn check_definition(name: &str, definition: &Value) -> Result<(), SchemaError> {
    if !is_valid_collection_name(name) {
        return Err(SchemaError::InvalidName(name.to_string()));
    }
    if name.starts_with('_') {
        return Err(SchemaError::ReservedName(name.to_string()));
    }
    let invalid = |message: &str| SchemaError::InvalidDefinition {
        name: name.to_string(),
        message: message.to_string(),
    };
    let obj = definition
        .as_object()
        .ok_or_else(|| invalid("definition must be a JSON object"))?;
    if let Some(props) = obj.get("properties") {
        if !props.is_object() {
            return Err(invalid("properties must be an object"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_object_definitions() {
        assert!(check_definition("note", &json!({"type": "object", "properties": {}})).is_ok());
        assert!(check_definition("note", &json!({})).is_ok());
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            check_definition("note", &json!([1, 2])),
            Err(SchemaError::InvalidDefinition { .. })
        ));
        assert!(matches!(
            check_definition("note", &json!({"properties": ["owner"]})),
            Err(SchemaError::InvalidDefinition { .. })
        ));
        assert!(matches!(
            check_definition("my-note", &json!({})),
            Err(SchemaError::InvalidName(_))
        ));
    }

    #[test]
    fn rejects_internal_names() {
        assert!(matches!(
            check_definition("_credentials", &json!({})),
            Err(SchemaError::ReservedName(_))
        ));
    }
}
