//! Output normalizers: turn free-form generation text into typed values.
//!
//! The completion model is not schema-constrained, so none of these fail:
//! malformed output degrades to a best-effort value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::llm_client::Generation;
use crate::models::PerformanceMetrics;

/// `1. Write a sort function` → `Write a sort function`
static ORDINAL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\d+\.[ \t]*(\S.*?)[ \t]*\r?$").expect("valid ordinal regex"));

/// Body of the first fenced code block, with or without a language tag.
static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*\s*(.*?)\s*```").expect("valid fence regex"));

const BULLET_CHARS: [char; 4] = ['-', '*', '•', ' '];

/// The persona is the trimmed generation text, used verbatim.
pub fn normalize_persona(generation: &Generation) -> String {
    generation.text.trim().to_string()
}

/// Splits generated interview tasks into an ordered list.
///
/// Numbered lines win; without any, every non-empty line becomes a task with
/// leading bullets stripped.
pub fn normalize_tasks(raw: &str) -> Vec<String> {
    let numbered: Vec<String> = ORDINAL_LINE
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();
    if !numbered.is_empty() {
        return numbered;
    }

    raw.lines()
        .map(|line| line.trim().trim_start_matches(BULLET_CHARS).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Which step of the fallback chain produced a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    /// The whole response was a JSON object.
    Direct,
    /// A JSON object was recovered from a code fence or surrounding prose.
    Recovered,
    /// Nothing parseable; the raw text is the review and metrics are empty.
    Degraded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReview {
    pub review: String,
    pub metrics: PerformanceMetrics,
    pub source: ReviewSource,
}

/// Parses a performance review through strict → recovered → degraded.
pub fn normalize_review(generation: &Generation) -> ParsedReview {
    let text = generation.text.trim();

    let direct = generation
        .structured
        .clone()
        .or_else(|| serde_json::from_str::<Value>(text).ok());
    if let Some(parsed) = direct.as_ref().and_then(review_from_value) {
        return parsed.with_source(ReviewSource::Direct);
    }

    let recovered = fenced_block(text)
        .and_then(first_json_object)
        .and_then(|obj| review_from_value(&Value::Object(obj)))
        .or_else(|| {
            first_json_object(text).and_then(|obj| review_from_value(&Value::Object(obj)))
        });
    if let Some(parsed) = recovered {
        return parsed.with_source(ReviewSource::Recovered);
    }

    ParsedReview {
        review: text.to_string(),
        metrics: PerformanceMetrics::default(),
        source: ReviewSource::Degraded,
    }
}

impl ParsedReview {
    fn with_source(mut self, source: ReviewSource) -> Self {
        self.source = source;
        self
    }
}

/// Accepts a JSON object carrying a string `review`; `metrics` is optional.
fn review_from_value(value: &Value) -> Option<ParsedReview> {
    let obj = value.as_object()?;
    let review = obj.get("review")?.as_str()?.trim().to_string();
    let metrics = obj
        .get("metrics")
        .map(PerformanceMetrics::from_loose)
        .unwrap_or_default();
    Some(ParsedReview {
        review,
        metrics,
        source: ReviewSource::Direct,
    })
}

fn fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Finds the first complete JSON object embedded in `text`.
///
/// Tries each `{` in turn and lets serde_json's streaming deserializer decide
/// where a valid object ends, so trailing prose is ignored.
fn first_json_object(text: &str) -> Option<Map<String, Value>> {
    text.char_indices()
        .filter(|(_, ch)| *ch == '{')
        .find_map(|(idx, _)| {
            let mut stream = serde_json::Deserializer::from_str(&text[idx..]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(Value::Object(obj))) => Some(obj),
                _ => None,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen(text: &str) -> Generation {
        Generation::from_text(text)
    }

    // ── persona ────────────────────────────────────────────────────────────

    #[test]
    fn test_persona_is_trimmed_verbatim() {
        let persona = normalize_persona(&gen("\n  A detail-oriented backend engineer.  \n"));
        assert_eq!(persona, "A detail-oriented backend engineer.");
    }

    // ── tasks ──────────────────────────────────────────────────────────────

    #[test]
    fn test_numbered_tasks_strip_ordinals() {
        let tasks = normalize_tasks("1. Write a sort function\n2. Explain REST\n3. Debug this snippet");
        assert_eq!(
            tasks,
            vec!["Write a sort function", "Explain REST", "Debug this snippet"]
        );
    }

    #[test]
    fn test_numbered_tasks_ignore_preamble() {
        let raw = "Here are three interview tasks:\n\n1. Design a rate limiter\n2. Review a PR\n3. Profile a slow query\n\nGood luck!";
        let tasks = normalize_tasks(raw);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0], "Design a rate limiter");
        assert_eq!(tasks[2], "Profile a slow query");
    }

    #[test]
    fn test_empty_numbered_item_does_not_swallow_next_line() {
        let tasks = normalize_tasks("1.\n2. Explain REST\n3. Debug this snippet");
        assert_eq!(tasks, vec!["Explain REST", "Debug this snippet"]);
    }

    #[test]
    fn test_indented_and_crlf_numbered_tasks() {
        let tasks = normalize_tasks("  1. Design a cache  \r\n\t2. Explain MVCC\r\n");
        assert_eq!(tasks, vec!["Design a cache", "Explain MVCC"]);
    }

    #[test]
    fn test_bullet_fallback() {
        assert_eq!(normalize_tasks("- Task A\n- Task B"), vec!["Task A", "Task B"]);
    }

    #[test]
    fn test_mixed_bullets_and_blank_lines_fallback() {
        let tasks = normalize_tasks("* Task A\n\n  • Task B  \n---\nTask C");
        assert_eq!(tasks, vec!["Task A", "Task B", "Task C"]);
    }

    #[test]
    fn test_empty_task_output_yields_empty_list() {
        assert!(normalize_tasks("  \n\n ").is_empty());
    }

    #[test]
    fn test_version_numbers_mid_line_are_not_ordinals() {
        let tasks = normalize_tasks("- Migrate from Python 2.7 to 3.11\n- Explain GC");
        assert_eq!(tasks, vec!["Migrate from Python 2.7 to 3.11", "Explain GC"]);
    }

    // ── review ─────────────────────────────────────────────────────────────

    #[test]
    fn test_review_valid_json() {
        let parsed = normalize_review(&gen(
            r#"{"review": "Strong systems background.", "metrics": {"technical_skills": 88, "communication": 75, "problem_solving": 82, "team_collaboration": 70}}"#,
        ));
        assert_eq!(parsed.source, ReviewSource::Direct);
        assert_eq!(parsed.review, "Strong systems background.");
        assert_eq!(parsed.metrics.technical_skills, Some(88.0));
        assert_eq!(parsed.metrics.team_collaboration, Some(70.0));
    }

    #[test]
    fn test_review_in_fenced_block_is_recovered() {
        let raw = "Here is the review:\n```json\n{\"review\": \"Good fit.\", \"metrics\": {\"communication\": 90}}\n```\nLet me know!";
        let parsed = normalize_review(&gen(raw));
        assert_eq!(parsed.source, ReviewSource::Recovered);
        assert_eq!(parsed.review, "Good fit.");
        assert_eq!(parsed.metrics.communication, Some(90.0));
        assert_eq!(parsed.metrics.technical_skills, None);
    }

    #[test]
    fn test_review_in_untagged_fence_is_recovered() {
        let raw = "```\n{\"review\": \"Solid.\", \"metrics\": {}}\n```";
        let parsed = normalize_review(&gen(raw));
        assert_eq!(parsed.source, ReviewSource::Recovered);
        assert_eq!(parsed.review, "Solid.");
    }

    #[test]
    fn test_review_embedded_in_prose_is_recovered() {
        let raw = "Sure! {\"review\": \"Promising junior.\", \"metrics\": {\"problem_solving\": \"65\"}} Hope this helps {not json}";
        let parsed = normalize_review(&gen(raw));
        assert_eq!(parsed.source, ReviewSource::Recovered);
        assert_eq!(parsed.review, "Promising junior.");
        assert_eq!(parsed.metrics.problem_solving, Some(65.0));
    }

    #[test]
    fn test_unparseable_review_degrades_to_raw_text() {
        let raw = "The candidate communicates clearly but lacks depth in distributed systems.";
        let parsed = normalize_review(&gen(raw));
        assert_eq!(parsed.source, ReviewSource::Degraded);
        assert_eq!(parsed.review, raw);
        assert!(parsed.metrics.is_empty());
    }

    #[test]
    fn test_json_without_review_key_degrades() {
        let raw = r#"{"summary": "no review field here"}"#;
        let parsed = normalize_review(&gen(raw));
        assert_eq!(parsed.source, ReviewSource::Degraded);
        assert_eq!(parsed.review, raw);
    }

    #[test]
    fn test_truncated_json_degrades() {
        let raw = r#"{"review": "Cut off mid-"#;
        let parsed = normalize_review(&gen(raw));
        assert_eq!(parsed.source, ReviewSource::Degraded);
        assert_eq!(parsed.review, raw);
    }

    #[test]
    fn test_review_without_metrics_has_empty_metrics() {
        let parsed = normalize_review(&gen(r#"{"review": "Fine."}"#));
        assert_eq!(parsed.source, ReviewSource::Direct);
        assert!(parsed.metrics.is_empty());
    }
}
