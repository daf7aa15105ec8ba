use serde::Serialize;

/// The four-field record handed verbatim into a completion-suggester
/// configuration by the consuming indexing pipeline. `payload` is already
/// JSON text; the suggester round-trips it untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct SuggestionRecord {
    pub input: Vec<String>,
    pub output: String,
    pub payload: String,
    pub weight: i64,
}
