// Prompt templates for suggestion generation

use super::ChatPrompt;
use crate::config::PromptLimits;
use crate::github::{RepoRef, RepositoryContext};
use crate::util::truncate_chars;

const SYSTEM_PROMPT: &str = r#"You are FirstPatch AI, an expert at analyzing open-source repositories and suggesting beginner-friendly contribution opportunities.
Your task is to analyze the repository and provide 5-7 actionable, beginner-friendly suggestions for first-time contributors.

Focus on:
- Documentation improvements (fixing typos, clarifying instructions, adding examples)
- Code cleanup (removing stray debug output, fixing comments, improving variable names)
- Small feature additions (adding unit tests, improving error messages)
- UI/UX improvements (accessibility, responsive design tweaks)
- Configuration improvements (adding missing config files, updating dependencies)

Each suggestion should be:
- Specific and actionable
- Beginner-friendly (requiring minimal context)
- Low risk (unlikely to break existing functionality)
- Clearly explained with context

Return your response as a JSON array of suggestions with this structure:
[
  {
    "title": "Brief descriptive title",
    "description": "Detailed explanation of what needs to be done and why",
    "difficulty": "easy|medium",
    "type": "documentation|code|testing|ui|config",
    "files": ["list", "of", "relevant", "files"],
    "estimatedTime": "15-30 minutes"
  }
]"#;

/// Build the system + user messages for one repository.
///
/// The README, issue sample and entry list are bounded by `limits` here even
/// if the context was assembled with looser bounds.
pub fn compose(repo: &RepoRef, ctx: &RepositoryContext, limits: &PromptLimits) -> ChatPrompt {
    ChatPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user: user_prompt(repo, ctx, limits),
    }
}

fn user_prompt(repo: &RepoRef, ctx: &RepositoryContext, limits: &PromptLimits) -> String {
    let description = ctx
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description provided");
    let language = ctx.primary_language.as_deref().unwrap_or("Unknown");
    let languages = ctx.languages_by_size().join(", ");

    let readme = truncate_chars(&ctx.readme_excerpt, limits.readme_chars);
    let readme = if readme.trim().is_empty() {
        "No README found"
    } else {
        readme
    };

    let structure = ctx
        .top_level_entries
        .iter()
        .take(limits.top_level_entries)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let issues: Vec<_> = ctx
        .sample_issues
        .iter()
        .take(limits.sample_issues)
        .collect();
    // Serializing plain strings cannot fail; fall back to an empty list regardless.
    let issues_json = serde_json::to_string_pretty(&issues).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Analyze this GitHub repository and suggest beginner-friendly contribution opportunities:

Repository: {repo}
Description: {description}
Main Language: {language}
Languages Used: {languages}
Stars: {stars}
Open Issues: {open_issues}

README (first {readme_chars} chars):
{readme}

Project Structure:
{structure}

Existing Issues (sample):
{issues_json}

Please provide 5-7 specific, beginner-friendly contribution suggestions as a JSON array."#,
        stars = ctx.stars,
        open_issues = ctx.open_issue_count,
        readme_chars = limits.readme_chars,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::IssueSample;

    fn repo() -> RepoRef {
        RepoRef::new("octo", "demo")
    }

    #[test]
    fn test_system_prompt_describes_json_shape() {
        let prompt = compose(&repo(), &RepositoryContext::default(), &PromptLimits::default());
        assert!(prompt.system.contains("JSON array"));
        assert!(prompt.system.contains("estimatedTime"));
        assert!(prompt.system.contains("documentation|code|testing|ui|config"));
        assert!(prompt.system.contains("5-7"));
    }

    #[test]
    fn test_user_prompt_placeholders_for_empty_context() {
        let prompt = compose(&repo(), &RepositoryContext::default(), &PromptLimits::default());
        assert!(prompt.user.contains("Repository: octo/demo"));
        assert!(prompt.user.contains("Description: No description provided"));
        assert!(prompt.user.contains("No README found"));
        assert!(prompt.user.contains("Existing Issues (sample):\n[]"));
    }

    #[test]
    fn test_user_prompt_includes_metadata() {
        let mut ctx = RepositoryContext {
            description: Some("A demo project".to_string()),
            primary_language: Some("TypeScript".to_string()),
            stars: 42,
            open_issue_count: 7,
            readme_excerpt: "# Demo".to_string(),
            top_level_entries: vec!["src".to_string(), "package.json".to_string()],
            sample_issues: vec![IssueSample {
                title: "Fix typo".to_string(),
                labels: vec!["good first issue".to_string()],
            }],
            ..RepositoryContext::default()
        };
        ctx.languages.insert("TypeScript".to_string(), 1000);
        ctx.languages.insert("CSS".to_string(), 10);

        let user = compose(&repo(), &ctx, &PromptLimits::default()).user;
        assert!(user.contains("Description: A demo project"));
        assert!(user.contains("Main Language: TypeScript"));
        assert!(user.contains("Languages Used: TypeScript, CSS"));
        assert!(user.contains("Stars: 42"));
        assert!(user.contains("Open Issues: 7"));
        assert!(user.contains("Project Structure:\nsrc, package.json"));
        assert!(user.contains("\"title\": \"Fix typo\""));
        assert!(user.contains("good first issue"));
    }

    #[test]
    fn test_entries_and_issues_are_bounded() {
        let ctx = RepositoryContext {
            top_level_entries: (0..30).map(|i| format!("entry{:02}", i)).collect(),
            sample_issues: (0..8)
                .map(|i| IssueSample {
                    title: format!("issue {}", i),
                    labels: vec![],
                })
                .collect(),
            ..RepositoryContext::default()
        };
        let user = compose(&repo(), &ctx, &PromptLimits::default()).user;
        assert!(user.contains("entry19"));
        assert!(!user.contains("entry20"));
        assert!(user.contains("issue 4"));
        assert!(!user.contains("issue 5"));
    }
}
