use serde_json::{Map, Value};

use crate::error::SuggestError;
use crate::markup::strip_markup;
use crate::types::SuggestionRecord;

/// Suggestion input as sent by the host: one text or a list of texts.
///
/// List elements stay untyped `Value`s until normalization runs, so a
/// non-string element fails at the per-element step exactly like a
/// non-string scalar would.
#[derive(Clone, Debug)]
pub(crate) enum SuggestionInput {
    Scalar(String),
    List(Vec<Value>),
}

impl TryFrom<Value> for SuggestionInput {
    type Error = SuggestError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Self::Scalar(text)),
            Value::Array(items) => Ok(Self::List(items)),
            other => Err(SuggestError::invalid_input(&other)),
        }
    }
}

/// Default payload when the caller sends none: an empty JSON object.
pub(crate) fn default_payload() -> Value {
    Value::Object(Map::new())
}

/// Build a completion-suggester record from raw caller input.
///
/// `input` is tokenized per [`normalize_text`], `output` only has markup
/// stripped, `payload` is serialized to compact JSON, and `weight` passes
/// through unvalidated. Stateless and reentrant; any failure aborts the
/// build with no partial record.
pub(crate) fn build(
    input: SuggestionInput,
    output: &str,
    payload: &Value,
    weight: i64,
) -> Result<SuggestionRecord, SuggestError> {
    Ok(SuggestionRecord {
        input: prepare_input(input)?,
        output: strip_markup(output),
        payload: serde_json::to_string(payload)?,
        weight,
    })
}

fn prepare_input(input: SuggestionInput) -> Result<Vec<String>, SuggestError> {
    match input {
        SuggestionInput::Scalar(text) => Ok(normalize_text(&text)),
        SuggestionInput::List(items) => {
            let mut tokens = Vec::new();
            for item in &items {
                tokens.extend(normalize_value(item)?);
            }
            Ok(tokens)
        }
    }
}

fn normalize_value(value: &Value) -> Result<Vec<String>, SuggestError> {
    let Value::String(text) = value else {
        return Err(SuggestError::invalid_input(value));
    };
    Ok(normalize_text(text))
}

/// Turn free text into suggestion trigger tokens: line breaks removed,
/// markup stripped, every character that is neither alphanumeric nor
/// whitespace replaced with a space, then split on spaces with empty tokens
/// dropped. Order and duplicates are preserved; the consuming engine
/// deduplicates suggestions on `output`, not here.
pub(crate) fn normalize_text(text: &str) -> Vec<String> {
    let unbroken: String = text
        .chars()
        .filter(|character| *character != '\r' && *character != '\n')
        .collect();
    let stripped = strip_markup(&unbroken);

    let mut cleaned = String::with_capacity(stripped.len());
    for character in stripped.chars() {
        if character.is_alphanumeric() || character.is_whitespace() {
            cleaned.push(character);
        } else {
            cleaned.push(' ');
        }
    }

    cleaned
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
