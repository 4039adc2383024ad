//! Parsing of raw provider text into progress results.
//!
//! Parsing is staged: a JSON object anywhere in the response is authoritative;
//! only when no object is present does a best-effort number scan run. Every
//! stage reports failure as a [`FailureReason`] and never panics.

use goaltracker_core::progress::SynthesisResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;

use crate::prompts::truncate_chars;

/// Longest analysis kept from an unstructured response, in characters.
pub const MAX_EXTRACTED_ANALYSIS_CHARS: usize = 500;

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("Invalid regex pattern"));

// A minus sign directly after a digit is a range hyphen ("30-40%"), not a sign.
static PERCENT_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d.])(-?\d+(?:\.\d+)?)\s*%").expect("Invalid regex pattern")
});

static BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("Invalid regex pattern"));

/// Why a synthesis attempt produced no usable result.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// The provider call failed or timed out.
    ProviderUnavailable(String),
    /// The provider answered, but nothing usable could be read from it.
    MalformedResponse(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ProviderUnavailable(msg) => write!(f, "provider unavailable: {}", msg),
            FailureReason::MalformedResponse(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

/// A successfully parsed response, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// A JSON object with numeric `percentage` and string `analysis`.
    Structured(SynthesisResult),
    /// A number scanned out of free text.
    Extracted(SynthesisResult),
}

impl ParsedResponse {
    pub fn into_result(self) -> SynthesisResult {
        match self {
            ParsedResponse::Structured(result) | ParsedResponse::Extracted(result) => result,
        }
    }
}

/// Parse raw provider text. Percentages are clamped into [0, 100].
pub fn parse_progress_response(text: &str) -> Result<ParsedResponse, FailureReason> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FailureReason::MalformedResponse("empty response".into()));
    }

    if let Some(object) = find_json_object(text) {
        return parse_structured(&object).map(ParsedResponse::Structured);
    }
    if has_unreadable_progress_object(text) {
        return Err(FailureReason::MalformedResponse(
            "unreadable JSON progress object".into(),
        ));
    }

    extract_unstructured(text).map(ParsedResponse::Extracted)
}

/// First JSON object found in the response: the whole text, a fenced code
/// block, or the span between the outermost braces.
fn find_json_object(text: &str) -> Option<Map<String, Value>> {
    let mut candidates: Vec<&str> = vec![text];
    candidates.extend(
        FENCED_BLOCK
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim())),
    );
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            candidates.push(&text[start..=end]);
        }
    }

    candidates.into_iter().find_map(|candidate| {
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    })
}

/// A brace span naming `percentage` that did not parse as JSON (for example
/// an out-of-range number like `1e400`). Its digits must not be scanned.
fn has_unreadable_progress_object(text: &str) -> bool {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => text[start..=end].contains("\"percentage\""),
        _ => false,
    }
}

fn parse_structured(object: &Map<String, Value>) -> Result<SynthesisResult, FailureReason> {
    let percentage = match object.get("percentage") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_numeric_string(s),
        _ => None,
    }
    .ok_or_else(|| FailureReason::MalformedResponse("missing or non-numeric percentage".into()))?;

    if !percentage.is_finite() {
        return Err(FailureReason::MalformedResponse(format!(
            "non-finite percentage {}",
            percentage
        )));
    }

    let analysis = match object.get("analysis") {
        Some(Value::String(s)) => s.clone(),
        _ => {
            return Err(FailureReason::MalformedResponse(
                "missing or non-string analysis".into(),
            ))
        }
    };

    Ok(SynthesisResult::new(percentage, analysis))
}

/// `"45"`, `" 45.5 "` and `"45%"` are numeric; anything else is not.
fn parse_numeric_string(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let numeric = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'));
    if trimmed.is_empty() || !numeric {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// First percentage-like number (`75%`), else the first bare number.
pub fn extract_percentage(text: &str) -> Option<f64> {
    let raw = PERCENT_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .or_else(|| BARE_NUMBER.find(text))?;
    raw.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn extract_unstructured(text: &str) -> Result<SynthesisResult, FailureReason> {
    let percentage = extract_percentage(text)
        .ok_or_else(|| FailureReason::MalformedResponse("no number in response".into()))?;
    Ok(SynthesisResult::new(
        percentage,
        truncate_chars(text, MAX_EXTRACTED_ANALYSIS_CHARS),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured(text: &str) -> SynthesisResult {
        match parse_progress_response(text) {
            Ok(ParsedResponse::Structured(result)) => result,
            other => panic!("expected structured parse, got {:?}", other),
        }
    }

    fn extracted(text: &str) -> SynthesisResult {
        match parse_progress_response(text) {
            Ok(ParsedResponse::Extracted(result)) => result,
            other => panic!("expected extracted parse, got {:?}", other),
        }
    }

    fn malformed(text: &str) {
        assert!(
            matches!(
                parse_progress_response(text),
                Err(FailureReason::MalformedResponse(_))
            ),
            "expected malformed for {:?}",
            text
        );
    }

    #[test]
    fn test_plain_json() {
        let result =
            structured(r#"{"percentage": 45, "analysis": "Halfway to race-ready endurance"}"#);
        assert_eq!(result.percentage, 45.0);
        assert_eq!(result.analysis, "Halfway to race-ready endurance");
    }

    #[test]
    fn test_json_is_clamped() {
        let high = structured(r#"{"percentage": 137, "analysis": "Exceeded expectations"}"#);
        assert_eq!(high.percentage, 100.0);
        assert_eq!(high.analysis, "Exceeded expectations");

        let low = structured(r#"{"percentage": -20, "analysis": "Regressed"}"#);
        assert_eq!(low.percentage, 0.0);
    }

    #[test]
    fn test_fenced_json() {
        let text = "Here is my evaluation:\n```json\n{\"percentage\": 62.5, \"analysis\": \"Solid\"}\n```\nGood luck!";
        let result = structured(text);
        assert_eq!(result.percentage, 62.5);
        assert_eq!(result.analysis, "Solid");
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let text = r#"Sure! {"percentage": 30, "analysis": "Early days"} Keep going."#;
        assert_eq!(structured(text).percentage, 30.0);
    }

    #[test]
    fn test_numeric_string_percentage() {
        let result = structured(r#"{"percentage": "70%", "analysis": "Most of the way"}"#);
        assert_eq!(result.percentage, 70.0);
    }

    #[test]
    fn test_non_numeric_percentage_is_malformed() {
        malformed(r#"{"percentage": "lots", "analysis": "Unclear"}"#);
        malformed(r#"{"percentage": "NaN", "analysis": "Unclear"}"#);
        malformed(r#"{"percentage": "inf", "analysis": "Unclear"}"#);
        malformed(r#"{"percentage": null, "analysis": "Unclear"}"#);
    }

    #[test]
    fn test_object_with_missing_fields_is_malformed() {
        malformed(r#"{"analysis": "No number"}"#);
        malformed(r#"{"percentage": 50}"#);
        malformed(r#"{"percentage": 50, "analysis": 12}"#);
    }

    #[test]
    fn test_object_with_bad_fields_does_not_fall_back_to_scan() {
        // The 80 inside the analysis must not be picked up.
        malformed(r#"{"percentage": "unknown", "analysis": "About 80% there"}"#);
    }

    #[test]
    fn test_unstructured_percent_is_preferred_over_bare_number() {
        let result = extracted("After 3 sessions you are roughly 40% of the way there.");
        assert_eq!(result.percentage, 40.0);
        assert_eq!(
            result.analysis,
            "After 3 sessions you are roughly 40% of the way there."
        );
    }

    #[test]
    fn test_out_of_range_json_number_is_malformed() {
        malformed(r#"{"percentage": 1e400, "analysis": "ok"}"#);
        malformed("Result:\n```json\n{\"percentage\": -1e999, \"analysis\": \"ok\"}\n```");
    }

    #[test]
    fn test_percent_range_is_not_read_as_negative() {
        let result = extracted("You're about 30-40% of the way there.");
        assert_eq!(result.percentage, 40.0);
        assert_eq!(extract_percentage("-25% since last week"), Some(-25.0));
        assert_eq!(extract_percentage("down (-10%) overall"), Some(-10.0));
    }

    #[test]
    fn test_unstructured_bare_number() {
        assert_eq!(extracted("Progress estimate: 55").percentage, 55.0);
    }

    #[test]
    fn test_unstructured_out_of_range_is_clamped() {
        assert_eq!(extracted("You're at 250% of plan").percentage, 100.0);
        assert_eq!(extracted("Score -15").percentage, 0.0);
    }

    #[test]
    fn test_no_number_is_malformed() {
        malformed("Great work, keep it up!");
        malformed("   ");
        malformed("");
    }

    #[test]
    fn test_extract_percentage() {
        assert_eq!(extract_percentage("12.5 % done"), Some(12.5));
        assert_eq!(extract_percentage("step 2 of 10, 20% done"), Some(20.0));
        assert_eq!(extract_percentage("none"), None);
    }

    #[test]
    fn test_long_unstructured_analysis_is_truncated() {
        let text = format!("50% {}", "blah ".repeat(500));
        let result = extracted(&text);
        assert!(result.analysis.chars().count() <= MAX_EXTRACTED_ANALYSIS_CHARS + 3);
    }

    #[test]
    fn test_failure_reason_display() {
        let reason = FailureReason::ProviderUnavailable("timed out".into());
        assert_eq!(reason.to_string(), "provider unavailable: timed out");
    }
}
