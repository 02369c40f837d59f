//! Normalizes loosely-structured agent replies into display text.
//!
//! Different agents wrap their answers in different envelopes. Rather than
//! chasing fields ad hoc, an [`ResponseExtractor`] tries a short ordered list
//! of named [`ExtractionStrategy`] values and keeps the first non-empty text.

use serde_json::Value;

/// Text used when no strategy yields anything.
pub const NO_RESPONSE_TEXT: &str = "No response received.";

/// Keys searched first, in order, by [`ExtractionStrategy::DeepText`].
const PREFERRED_TEXT_KEYS: [&str; 8] = [
    "text", "response", "message", "content", "answer", "output", "result", "summary",
];

/// Bound on nesting explored by the deep search. Matches serde_json's own
/// recursion limit, so any parsed reply is searched completely.
const MAX_DEPTH: usize = 128;

/// One way of pulling text out of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// `reply.result.<key>` as a string.
    ResultField(String),
    /// `reply.<key>` as a string.
    TopLevelField(String),
    /// First plausible string anywhere in the structure.
    DeepText,
}

impl ExtractionStrategy {
    /// Apply this strategy; `None` unless it produces non-blank text.
    pub fn apply(&self, reply: &Value) -> Option<String> {
        let found = match self {
            Self::ResultField(key) => reply
                .get("result")
                .and_then(|r| r.get(key))
                .and_then(Value::as_str)
                .map(str::to_string),
            Self::TopLevelField(key) => reply.get(key).and_then(Value::as_str).map(str::to_string),
            Self::DeepText => deep_text(reply, 0),
        };
        found.filter(|text| !text.trim().is_empty())
    }
}

/// Ordered list of strategies with a fixed fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseExtractor {
    strategies: Vec<ExtractionStrategy>,
    fallback: String,
}

impl ResponseExtractor {
    pub fn new(strategies: Vec<ExtractionStrategy>) -> Self {
        Self {
            strategies,
            fallback: NO_RESPONSE_TEXT.to_string(),
        }
    }

    /// Conversational replies: `result.response`, then `message`, then deep search.
    pub fn conversation() -> Self {
        Self::new(vec![
            ExtractionStrategy::ResultField("response".to_string()),
            ExtractionStrategy::TopLevelField("message".to_string()),
            ExtractionStrategy::DeepText,
        ])
    }

    /// Task replies: `result.message`, then `message`, then deep search.
    pub fn inquiry() -> Self {
        Self::new(vec![
            ExtractionStrategy::ResultField("message".to_string()),
            ExtractionStrategy::TopLevelField("message".to_string()),
            ExtractionStrategy::DeepText,
        ])
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn strategies(&self) -> &[ExtractionStrategy] {
        &self.strategies
    }

    /// First non-empty strategy result, if any.
    pub fn extract_optional(&self, reply: Option<&Value>) -> Option<String> {
        let reply = reply?;
        self.strategies.iter().find_map(|s| s.apply(reply))
    }

    /// First non-empty strategy result, or the fallback text.
    pub fn extract(&self, reply: Option<&Value>) -> String {
        self.extract_optional(reply)
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::conversation()
    }
}

/// `reply.result.status` as a string, when present.
pub fn result_status(reply: Option<&Value>) -> Option<&str> {
    reply?.get("result")?.get("status")?.as_str()
}

fn deep_text(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|item| deep_text(item, depth + 1)),
        Value::Object(map) => PREFERRED_TEXT_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|v| deep_text(v, depth + 1))
            .or_else(|| {
                map.iter()
                    .filter(|(key, _)| !PREFERRED_TEXT_KEYS.contains(&key.as_str()))
                    .find_map(|(_, v)| deep_text(v, depth + 1))
            }),
        _ => None,
    }
}
