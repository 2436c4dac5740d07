//! Turns free-form model output into suggestions.
//! Model output is expected to hold a JSON array but often arrives fenced,
//! wrapped in prose, or not as JSON at all.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::Suggestion;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json[ \t]*\r?\n(.*?)```").expect("static regex is valid"));

/// Outcome of normalizing one model response.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// At least one suggestion was recovered from JSON in the text.
    Structured(Vec<Suggestion>),
    /// No usable JSON; carries the raw text for the fallback suggestion.
    Degraded(String),
}

impl Normalized {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Normalized::Degraded(_))
    }

    /// Always non-empty: the degraded case becomes one synthetic suggestion.
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        match self {
            Normalized::Structured(suggestions) => suggestions,
            Normalized::Degraded(raw) => vec![Suggestion::fallback(&raw)],
        }
    }
}

/// Extract suggestions from model output.
///
/// Candidate spans are tried in order and the first that yields suggestions wins:
/// 1. the interior of a ```` ```json ```` fence
/// 2. first `[` through last `]`
/// 3. the whole text
pub fn normalize(text: &str) -> Normalized {
    for (tier, span) in candidate_spans(text) {
        let value: Value = match serde_json::from_str(span) {
            Ok(v) => v,
            Err(e) => {
                debug!("normalizer: {} span is not JSON: {}", tier, e);
                continue;
            }
        };

        let suggestions = suggestions_from_value(value);
        if suggestions.is_empty() {
            debug!("normalizer: {} span parsed but held no suggestions", tier);
            continue;
        }
        return Normalized::Structured(suggestions);
    }

    warn!("normalizer: no JSON suggestions in model output, using fallback");
    debug!("normalizer: raw model output: {}", text);
    Normalized::Degraded(text.to_string())
}

fn candidate_spans(text: &str) -> Vec<(&'static str, &str)> {
    let mut spans = Vec::with_capacity(3);

    if let Some(inner) = JSON_FENCE.captures(text).and_then(|c| c.get(1)) {
        spans.push(("fenced", inner.as_str().trim()));
    }

    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if end > start {
            spans.push(("bracketed", &text[start..=end]));
        }
    }

    spans.push(("whole", text.trim()));
    spans
}

/// Map parsed JSON onto suggestions. A lone object counts as a one-element
/// array; elements that are not suggestion-shaped objects are skipped.
fn suggestions_from_value(value: Value) -> Vec<Suggestion> {
    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => {
            warn!("normalizer: expected a JSON array, got {}", json_kind(&other));
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            if !item.is_object() {
                warn!(
                    "normalizer: skipping element {}: expected object, got {}",
                    i,
                    json_kind(&item)
                );
                return None;
            }
            match serde_json::from_value::<Suggestion>(item) {
                Ok(s) if !s.title.trim().is_empty() => Some(s),
                Ok(_) => {
                    warn!("normalizer: skipping element {}: missing title", i);
                    None
                }
                Err(e) => {
                    warn!("normalizer: skipping element {}: {}", i, e);
                    None
                }
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
