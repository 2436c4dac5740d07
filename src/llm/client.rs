use async_trait::async_trait;

use super::{ChatPrompt, LlmError};

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, LlmError>;
}

/// Canned suggestions for `--dry-run` and tests.
pub struct MockLlmClient {
    response: String,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            response: DEFAULT_RESPONSE.to_string(),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &ChatPrompt) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }
}

const DEFAULT_RESPONSE: &str = r#"Here are some beginner-friendly ways to contribute:

```json
[
  {
    "title": "Add a Contributing section to the README",
    "description": "The README explains installation but not how to run the test suite or open a pull request. Add a short section covering both.",
    "difficulty": "easy",
    "type": "documentation",
    "files": ["README.md"],
    "estimatedTime": "15-30 minutes"
  },
  {
    "title": "Replace debug print statements with the logger",
    "description": "A few modules print directly to stdout while debugging. Route these through the existing logger so output can be filtered.",
    "difficulty": "easy",
    "type": "code",
    "files": ["src/main.rs", "src/server.rs"],
    "estimatedTime": "30-45 minutes"
  },
  {
    "title": "Add unit tests for input validation",
    "description": "Input parsing has no tests for empty or malformed values. Add cases for each rejection path.",
    "difficulty": "medium",
    "type": "testing",
    "files": ["src/input.rs", "tests/input_test.rs"],
    "estimatedTime": "1-2 hours"
  },
  {
    "title": "Label icon-only buttons for screen readers",
    "description": "Icon-only buttons have no accessible name. Add aria-label attributes describing each action.",
    "difficulty": "easy",
    "type": "ui",
    "files": ["static/index.html"],
    "estimatedTime": "20-30 minutes"
  },
  {
    "title": "Add an .editorconfig file",
    "description": "Contributors use mixed indentation. An .editorconfig matching the current style keeps new changes consistent.",
    "difficulty": "easy",
    "type": "config",
    "files": [".editorconfig"],
    "estimatedTime": "10-15 minutes"
  }
]
```"#;
