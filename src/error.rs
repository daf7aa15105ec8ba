use serde_json::Value;
use thiserror::Error;

/// Failures raised while building a suggestion record. Both variants abort
/// the build; no partial record is ever returned.
#[derive(Debug, Error)]
pub(crate) enum SuggestError {
    #[error("Only strings and arrays of strings are supported as suggestion input, got {found}")]
    InvalidInputKind { found: &'static str },
    #[error("Could not serialize suggestion payload: {0}")]
    PayloadSerialization(#[from] serde_json::Error),
}

impl SuggestError {
    pub(crate) fn invalid_input(value: &Value) -> Self {
        Self::InvalidInputKind {
            found: json_kind(value),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
