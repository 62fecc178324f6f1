//! Suggestion Generator: up to four short improvement ideas for a resume.
//! Best-effort; any failure yields the fixed default list.

use std::time::Duration;

use tracing::warn;

use crate::generation::prompts::{SUGGESTIONS_PROMPT_TEMPLATE, SUGGESTIONS_SYSTEM};
use crate::llm_client::prompts::{fill_template, truncate_chars};
use crate::llm_client::{CallOptions, LlmProvider};

const SUGGESTIONS_TEMPERATURE: f32 = 0.4;
const SUGGESTIONS_MAX_TOKENS: u32 = 500;
const MAX_SUGGESTIONS: usize = 4;
const MAX_LATEX_CHARS: usize = 2000;
const MAX_JOB_DESCRIPTION_CHARS: usize = 1500;

pub const DEFAULT_SUGGESTIONS: [&str; 4] = [
    "Add metrics and quantifiable achievements (e.g., '↑ 25% improvement')",
    "Incorporate top 5 keywords from the job description",
    "Use strong action verbs (e.g., 'Developed', 'Implemented', 'Architected')",
    "Highlight technical skills matching the role requirements",
];

pub fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

pub async fn suggest(
    latex_code: &str,
    job_description: &str,
    llm: &dyn LlmProvider,
    timeout: Duration,
) -> Vec<String> {
    let prompt = fill_template(
        SUGGESTIONS_PROMPT_TEMPLATE,
        &[
            (
                "job_description",
                truncate_chars(job_description, MAX_JOB_DESCRIPTION_CHARS),
            ),
            ("latex_code", truncate_chars(latex_code, MAX_LATEX_CHARS)),
        ],
    );
    let options = CallOptions::new(SUGGESTIONS_TEMPERATURE, SUGGESTIONS_MAX_TOKENS, timeout);

    match llm.complete(&prompt, SUGGESTIONS_SYSTEM, &options).await {
        Ok(reply) => {
            let parsed = parse_suggestions(&reply);
            if parsed.is_empty() {
                warn!("Suggestion reply had no list items; using defaults");
                default_suggestions()
            } else {
                parsed
            }
        }
        Err(e) => {
            warn!("Suggestion request failed, using defaults: {e}");
            default_suggestions()
        }
    }
}

/// Keeps list-shaped lines (numbered, `•` or `-`), strips their markers and
/// returns at most four.
pub fn parse_suggestions(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.starts_with(|c: char| c.is_ascii_digit())
                || line.starts_with('•')
                || line.starts_with('-')
        })
        .map(strip_list_marker)
        .filter(|item| !item.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let unnumbered = line.trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = if unnumbered.len() < line.len() {
        unnumbered
            .strip_prefix('.')
            .or_else(|| unnumbered.strip_prefix(')'))
            .unwrap_or(unnumbered)
    } else {
        line.strip_prefix('•')
            .or_else(|| line.strip_prefix('-'))
            .unwrap_or(line)
    };
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::testing::ScriptedLlm;

    #[test]
    fn test_parses_numbered_list() {
        let reply = "Here you go:\n1. Add metrics\n2) Mention Kafka\n\n3. Shorten summary";
        assert_eq!(
            parse_suggestions(reply),
            vec!["Add metrics", "Mention Kafka", "Shorten summary"]
        );
    }

    #[test]
    fn test_parses_bullets_and_caps_at_four() {
        let reply = "- one\n• two\n- three\n- four\n- five";
        assert_eq!(parse_suggestions(reply), vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_prose_reply_parses_to_nothing() {
        assert!(parse_suggestions("Your resume looks great overall.").is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_returns_exact_defaults() {
        let llm = ScriptedLlm::new(vec![Err(LlmError::EmptyContent)]);
        let suggestions = suggest("latex", "jd", &llm, Duration::from_secs(5)).await;
        assert_eq!(suggestions, default_suggestions());
    }

    #[tokio::test]
    async fn test_unparseable_reply_returns_defaults() {
        let llm = ScriptedLlm::new(vec![Ok("Looks good!".to_string())]);
        let suggestions = suggest("latex", "jd", &llm, Duration::from_secs(5)).await;
        assert_eq!(suggestions, default_suggestions());
    }

    #[tokio::test]
    async fn test_parsed_reply_is_returned_with_short_budget() {
        let llm = ScriptedLlm::new(vec![Ok("1. Add metrics\n2. Mention Kafka".to_string())]);
        let suggestions = suggest("latex", "jd", &llm, Duration::from_secs(5)).await;

        assert_eq!(suggestions, vec!["Add metrics", "Mention Kafka"]);
        let call = &llm.calls()[0];
        assert_eq!(call.options.max_tokens, SUGGESTIONS_MAX_TOKENS);
        assert!((call.options.temperature - SUGGESTIONS_TEMPERATURE).abs() < f32::EPSILON);
    }
}
