//! Presentation rules shared by the terminal output and the browser UI:
//! an icon per suggestion type, a color tone per difficulty, and a bounded
//! list of file badges.

use std::fmt;

use crate::model::{AnalysisResult, Difficulty, Suggestion, SuggestionType};

pub fn type_icon(kind: &SuggestionType) -> &'static str {
    match kind {
        SuggestionType::Documentation => "📝",
        SuggestionType::Code => "💻",
        SuggestionType::Testing => "🧪",
        SuggestionType::Ui => "🎨",
        SuggestionType::Config => "⚙️",
        SuggestionType::Other(_) => "✨",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Blue,
}

impl Tone {
    fn ansi(self) -> &'static str {
        match self {
            Tone::Green => "\x1b[32m",
            Tone::Yellow => "\x1b[33m",
            Tone::Blue => "\x1b[34m",
        }
    }
}

pub fn difficulty_tone(difficulty: &Difficulty) -> Tone {
    match difficulty {
        Difficulty::Easy => Tone::Green,
        Difficulty::Medium => Tone::Yellow,
        Difficulty::Other(_) => Tone::Blue,
    }
}

/// First `max` files, plus "+N more" when some were left out.
pub fn file_badges(files: &[String], max: usize) -> (&[String], Option<String>) {
    if files.len() > max {
        (&files[..max], Some(format!("+{} more", files.len() - max)))
    } else {
        (files, None)
    }
}

/// Terminal rendering options.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
    pub file_badges: usize,
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Write the repository header and one numbered block per suggestion.
pub fn render_result<W: fmt::Write>(
    out: &mut W,
    result: &AnalysisResult,
    opts: RenderOptions,
) -> fmt::Result {
    let repo = &result.repository;

    writeln!(
        out,
        "{}{}/{}{}  ⭐ {}",
        bold(opts),
        repo.owner,
        repo.name,
        reset(opts),
        repo.stars
    )?;
    if let Some(desc) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(out, "{}", desc)?;
    }
    if let Some(lang) = &repo.language {
        writeln!(out, "Language: {}", lang)?;
    }
    writeln!(out, "{}", repo.url)?;
    writeln!(out)?;
    writeln!(
        out,
        "💡 Contribution Opportunities ({})",
        result.suggestions.len()
    )?;

    for (i, suggestion) in result.suggestions.iter().enumerate() {
        writeln!(out)?;
        render_suggestion(out, i + 1, suggestion, opts)?;
    }

    Ok(())
}

fn render_suggestion<W: fmt::Write>(
    out: &mut W,
    index: usize,
    s: &Suggestion,
    opts: RenderOptions,
) -> fmt::Result {
    let tone = difficulty_tone(&s.difficulty);
    let (tone_on, tone_off) = if opts.color {
        (tone.ansi(), RESET)
    } else {
        ("", "")
    };

    writeln!(
        out,
        "{}. {} {}{}{}  [{}{}{}] [{}]",
        index,
        type_icon(&s.kind),
        bold(opts),
        s.title,
        reset(opts),
        tone_on,
        s.difficulty,
        tone_off,
        s.kind
    )?;
    for line in s.description.lines() {
        writeln!(out, "   {}", line)?;
    }

    let (shown, more) = file_badges(&s.files, opts.file_badges);
    if !shown.is_empty() {
        write!(out, "   Files: {}", shown.join(", "))?;
        if let Some(more) = more {
            write!(out, " {}", more)?;
        }
        writeln!(out)?;
    }
    if !s.estimated_time.is_empty() {
        writeln!(out, "   Est. time: {}", s.estimated_time)?;
    }
    Ok(())
}

fn bold(opts: RenderOptions) -> &'static str {
    if opts.color {
        BOLD
    } else {
        ""
    }
}

fn reset(opts: RenderOptions) -> &'static str {
    if opts.color {
        RESET
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepositorySummary;

    fn files(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("f{}.rs", i)).collect()
    }

    fn plain() -> RenderOptions {
        RenderOptions {
            color: false,
            file_badges: 3,
        }
    }

    #[test]
    fn test_type_icons() {
        assert_eq!(type_icon(&SuggestionType::Documentation), "📝");
        assert_eq!(type_icon(&SuggestionType::Testing), "🧪");
        assert_eq!(type_icon(&SuggestionType::Other("general".into())), "✨");
    }

    #[test]
    fn test_difficulty_tones() {
        assert_eq!(difficulty_tone(&Difficulty::Easy), Tone::Green);
        assert_eq!(difficulty_tone(&Difficulty::Medium), Tone::Yellow);
        assert_eq!(difficulty_tone(&Difficulty::Other("hard".into())), Tone::Blue);
    }

    #[test]
    fn test_file_badges_within_limit() {
        let f = files(3);
        let (shown, more) = file_badges(&f, 3);
        assert_eq!(shown.len(), 3);
        assert!(more.is_none());
    }

    #[test]
    fn test_file_badges_over_limit() {
        let f = files(5);
        let (shown, more) = file_badges(&f, 3);
        assert_eq!(shown, &f[..3]);
        assert_eq!(more.as_deref(), Some("+2 more"));
    }

    #[test]
    fn test_render_result_plain() {
        let result = AnalysisResult {
            repository: RepositorySummary {
                owner: "octo".into(),
                name: "demo".into(),
                description: Some("A demo".into()),
                stars: 42,
                language: Some("Rust".into()),
                url: "https://github.com/octo/demo".into(),
            },
            suggestions: vec![Suggestion {
                title: "Add tests".into(),
                description: "Cover the parser.".into(),
                difficulty: Difficulty::Medium,
                kind: SuggestionType::Testing,
                files: files(4),
                estimated_time: "1 hour".into(),
            }],
        };
        let mut out = String::new();
        render_result(&mut out, &result, plain()).unwrap();
        assert!(out.contains("octo/demo  ⭐ 42"));
        assert!(out.contains("Contribution Opportunities (1)"));
        assert!(out.contains("1. 🧪 Add tests  [medium] [testing]"));
        assert!(out.contains("Files: f1.rs, f2.rs, f3.rs +1 more"));
        assert!(out.contains("Est. time: 1 hour"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_render_result_colored_uses_tone() {
        let result = AnalysisResult {
            repository: RepositorySummary {
                owner: "o".into(),
                name: "n".into(),
                description: None,
                stars: 0,
                language: None,
                url: "u".into(),
            },
            suggestions: vec![Suggestion::fallback("raw")],
        };
        let mut out = String::new();
        render_result(
            &mut out,
            &result,
            RenderOptions {
                color: true,
                file_badges: 3,
            },
        )
        .unwrap();
        assert!(out.contains("\x1b[32measy\x1b[0m"));
        assert!(out.contains("✨"));
    }
}
