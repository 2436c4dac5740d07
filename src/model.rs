//! Request-scoped values exchanged with the client.
//!
//! Field names follow the JSON wire format used by the browser UI
//! (`repoUrl`, `estimatedTime`, `type`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    #[serde(rename = "repoUrl")]
    pub repo_url: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub language: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub repository: RepositorySummary,
    pub suggestions: Vec<Suggestion>,
}

/// One beginner-friendly contribution recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(rename = "type", default)]
    pub kind: SuggestionType,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub estimated_time: String,
}

impl Suggestion {
    /// The single suggestion returned when the model's output has no usable JSON.
    pub fn fallback(raw_text: &str) -> Self {
        Self {
            title: "Analysis Complete".to_string(),
            description: raw_text.to_string(),
            difficulty: Difficulty::Easy,
            kind: SuggestionType::Other("general".to_string()),
            files: Vec::new(),
            estimated_time: "Varies".to_string(),
        }
    }
}

/// Suggested difficulty. Values outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Other(String),
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Other(String::new())
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            _ => Difficulty::Other(s),
        }
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Kind of contribution. Values outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SuggestionType {
    Documentation,
    Code,
    Testing,
    Ui,
    Config,
    Other(String),
}

impl Default for SuggestionType {
    fn default() -> Self {
        SuggestionType::Other(String::new())
    }
}

impl From<String> for SuggestionType {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "documentation" => SuggestionType::Documentation,
            "code" => SuggestionType::Code,
            "testing" => SuggestionType::Testing,
            "ui" => SuggestionType::Ui,
            "config" => SuggestionType::Config,
            _ => SuggestionType::Other(s),
        }
    }
}

impl From<SuggestionType> for String {
    fn from(t: SuggestionType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionType::Documentation => write!(f, "documentation"),
            SuggestionType::Code => write!(f, "code"),
            SuggestionType::Testing => write!(f, "testing"),
            SuggestionType::Ui => write!(f, "ui"),
            SuggestionType::Config => write!(f, "config"),
            SuggestionType::Other(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suggestion_wire_names() {
        let s = Suggestion {
            title: "Fix typo".to_string(),
            description: "README says teh".to_string(),
            difficulty: Difficulty::Easy,
            kind: SuggestionType::Documentation,
            files: vec!["README.md".to_string()],
            estimated_time: "10 minutes".to_string(),
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["type"], "documentation");
        assert_eq!(v["estimatedTime"], "10 minutes");
        assert_eq!(v["difficulty"], "easy");
        assert!(v.get("kind").is_none());
    }

    #[test]
    fn test_known_values_are_case_insensitive() {
        assert_eq!(Difficulty::from("Easy".to_string()), Difficulty::Easy);
        assert_eq!(Difficulty::from(" MEDIUM ".to_string()), Difficulty::Medium);
        assert_eq!(SuggestionType::from("UI".to_string()), SuggestionType::Ui);
    }

    #[test]
    fn test_unknown_values_round_trip_verbatim() {
        let s: Suggestion = serde_json::from_value(json!({
            "title": "t",
            "difficulty": "Hard-ish",
            "type": "Refactoring"
        }))
        .unwrap();
        assert_eq!(s.difficulty, Difficulty::Other("Hard-ish".to_string()));
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["difficulty"], "Hard-ish");
        assert_eq!(v["type"], "Refactoring");
    }

    #[test]
    fn test_missing_fields_default() {
        let s: Suggestion = serde_json::from_value(json!({"title": "Only a title"})).unwrap();
        assert_eq!(s.title, "Only a title");
        assert!(s.files.is_empty());
        assert_eq!(s.estimated_time, "");
    }

    #[test]
    fn test_fallback_shape() {
        let s = Suggestion::fallback("raw model text");
        assert_eq!(s.title, "Analysis Complete");
        assert_eq!(s.description, "raw model text");
        assert_eq!(s.difficulty, Difficulty::Easy);
        assert_eq!(s.kind.to_string(), "general");
        assert!(s.files.is_empty());
        assert_eq!(s.estimated_time, "Varies");
    }

    #[test]
    fn test_analysis_request_field_name() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"repoUrl": "https://github.com/a/b"}"#).unwrap();
        assert_eq!(req.repo_url.unwrap(), "https://github.com/a/b");
    }
}
