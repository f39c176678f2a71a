#![recursion_limit = "256"]

pub mod schema;
pub mod validator;

pub use schema::document_schema;
pub use validator::{SchemaViolation, ValidationOutcome, validate, validate_value};
