//! Schema evaluation producing a structured violation list.
//!
//! The compiled schema is cached process-wide on first use. Validation is
//! stateless per call and never panics: if compilation itself fails, every
//! call reports a single deterministic "Schema not available" violation.

use std::sync::OnceLock;

use jsonschema::{ValidationError, Validator};
use serde::Serialize;
use serde_json::Value;

use dsm_model::Module;

use crate::schema::document_schema;

/// One structural violation: where, which rule, and a readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    pub instance_path: String,
    pub keyword: String,
    pub message: String,
}

impl SchemaViolation {
    /// Message for display, with a fallback naming the rule and path.
    pub fn describe(&self) -> String {
        if self.message.is_empty() {
            format!("{} error at {}", self.keyword, self.instance_path)
        } else {
            self.message.clone()
        }
    }
}

/// Result of validating a whole module document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<SchemaViolation>,
}

impl ValidationOutcome {
    fn schema_unavailable() -> Self {
        Self {
            valid: false,
            errors: vec![SchemaViolation {
                instance_path: String::new(),
                keyword: "schema".to_string(),
                message: "Schema not available".to_string(),
            }],
        }
    }
}

fn compiled_validator() -> Option<&'static Validator> {
    static VALIDATOR: OnceLock<Option<Validator>> = OnceLock::new();
    VALIDATOR
        .get_or_init(|| jsonschema::validator_for(&document_schema()).ok())
        .as_ref()
}

/// The schema keyword a violation breached: the last segment of its schema
/// path (`/properties/id/minLength` -> `minLength`).
fn keyword_of(error: &ValidationError<'_>) -> String {
    let path = error.schema_path.to_string();
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => "schema".to_string(),
    }
}

/// Validate a raw JSON document against the module schema.
pub fn validate_value(instance: &Value) -> ValidationOutcome {
    let Some(validator) = compiled_validator() else {
        return ValidationOutcome::schema_unavailable();
    };

    let errors: Vec<SchemaViolation> = validator
        .iter_errors(instance)
        .map(|error| SchemaViolation {
            instance_path: error.instance_path.to_string(),
            keyword: keyword_of(&error),
            message: error.to_string(),
        })
        .collect();

    ValidationOutcome {
        valid: errors.is_empty(),
        errors,
    }
}

/// Validate a typed module document.
pub fn validate(module: &Module) -> ValidationOutcome {
    match serde_json::to_value(module) {
        Ok(instance) => validate_value(&instance),
        Err(error) => ValidationOutcome {
            valid: false,
            errors: vec![SchemaViolation {
                instance_path: String::new(),
                keyword: "schema".to_string(),
                message: format!("document could not be serialized: {error}"),
            }],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_required_fields_are_reported_with_paths() {
        let outcome = validate_value(&json!({"id": "m1"}));
        assert!(!outcome.valid);
        let keywords: Vec<&str> = outcome.errors.iter().map(|e| e.keyword.as_str()).collect();
        assert!(keywords.contains(&"required"), "got {keywords:?}");
    }

    #[test]
    fn violation_describe_falls_back_to_keyword_and_path() {
        let violation = SchemaViolation {
            instance_path: "/categories/0".to_string(),
            keyword: "required".to_string(),
            message: String::new(),
        };
        assert_eq!(violation.describe(), "required error at /categories/0");
    }
}
