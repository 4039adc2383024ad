//! Coaching suggestions across all of a user's goals.
//!
//! The contract is fixed: exactly [`SUGGESTION_COUNT`] non-empty strings,
//! whatever the input and whatever the provider does.

use async_trait::async_trait;
use chrono::NaiveDate;
use goaltracker_core::goals::GoalSummary;
use goaltracker_core::progress::clamp_progress;
use goaltracker_core::utils::{today, DaysRemaining};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::completion::{complete_with_timeout, CompletionClientTrait};
use crate::prompts::{suggestions_prompt, truncate_chars};

/// Number of suggestions always returned.
pub const SUGGESTION_COUNT: usize = 3;

/// Longest suggestion kept from a provider answer, in characters.
pub const MAX_SUGGESTION_CHARS: usize = 300;

/// Returned when the user has no goals yet.
pub const STARTER_SUGGESTIONS: [&str; SUGGESTION_COUNT] = [
    "Start by setting a SMART goal - Specific, Measurable, Achievable, Relevant, and Time-bound",
    "Consider what you want to achieve in the next 3-6 months",
    "Break down your goals into smaller, manageable tasks",
];

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+[.)]|[-*•+])(?:\s+|$)").expect("Invalid regex pattern"));

/// Trait for generating coaching suggestions.
#[async_trait]
pub trait SuggestionGeneratorTrait: Send + Sync {
    /// Exactly three non-empty suggestions for `goals`.
    async fn generate_suggestions(&self, goals: &[GoalSummary]) -> Vec<String>;
}

/// Suggestion generator backed by a completion provider.
pub struct SuggestionGenerator {
    client: Arc<dyn CompletionClientTrait>,
}

impl SuggestionGenerator {
    pub fn new(client: Arc<dyn CompletionClientTrait>) -> Self {
        Self { client }
    }

    /// Generate suggestions with days remaining measured from `reference_date`.
    pub async fn generate_suggestions_on(
        &self,
        goals: &[GoalSummary],
        reference_date: NaiveDate,
    ) -> Vec<String> {
        if goals.is_empty() {
            return starter_suggestions();
        }

        let fallback = fallback_suggestions(&goals[0]);
        let ranked: Vec<GoalSummary> = rank_goals(goals, reference_date)
            .into_iter()
            .cloned()
            .collect();
        let prompt = suggestions_prompt(&ranked, reference_date);

        match complete_with_timeout(self.client.as_ref(), &prompt).await {
            Ok(response) => {
                let lines = parse_suggestion_lines(&response);
                if lines.len() < SUGGESTION_COUNT {
                    debug!(
                        "Provider returned {} usable suggestions, backfilling",
                        lines.len()
                    );
                }
                fill_suggestions(lines, &fallback)
            }
            Err(e) => {
                warn!("Suggestion generation failed, using fallback: {}", e);
                fallback
            }
        }
    }
}

#[async_trait]
impl SuggestionGeneratorTrait for SuggestionGenerator {
    async fn generate_suggestions(&self, goals: &[GoalSummary]) -> Vec<String> {
        self.generate_suggestions_on(goals, today()).await
    }
}

/// The fixed cold-start suggestions.
pub fn starter_suggestions() -> Vec<String> {
    STARTER_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Deterministic suggestions derived from a single goal.
pub fn fallback_suggestions(goal: &GoalSummary) -> Vec<String> {
    let category = non_blank(&goal.category, "main");
    let description = non_blank(&goal.description, "this goal");
    vec![
        format!(
            "For your {} goal: Break down '{}' into weekly milestones",
            category, description
        ),
        "Set up a daily tracking system for each of your goals".to_string(),
        "Schedule weekly review sessions to assess your progress".to_string(),
    ]
}

fn non_blank<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}

/// Goals ordered most behind first, then most urgent.
pub fn rank_goals(goals: &[GoalSummary], reference_date: NaiveDate) -> Vec<&GoalSummary> {
    let mut ranked: Vec<&GoalSummary> = goals.iter().collect();
    ranked.sort_by(|a, b| {
        clamp_progress(a.progress)
            .total_cmp(&clamp_progress(b.progress))
            .then_with(|| {
                DaysRemaining::between(a.target_date, reference_date)
                    .urgency_cmp(&DaysRemaining::between(b.target_date, reference_date))
            })
    });
    ranked
}

/// Strip list numbering and markdown from one line of provider output.
///
/// Returns `None` for lines that carry no suggestion: blanks, bare markers
/// and headings such as `Here are three suggestions:`.
pub fn clean_suggestion_line(line: &str) -> Option<String> {
    let unbolded = line.replace("**", "");
    let without_marker = LIST_MARKER.replace(unbolded.trim(), "");
    let cleaned = without_marker
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '`'))
        .trim()
        .to_string();

    if cleaned.is_empty() || cleaned.ends_with(':') {
        return None;
    }

    Some(truncate_chars(&cleaned, MAX_SUGGESTION_CHARS))
}

/// Usable, de-duplicated suggestion lines in provider order.
pub fn parse_suggestion_lines(response: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in response.lines().filter_map(clean_suggestion_line) {
        if !lines.iter().any(|existing| existing.eq_ignore_ascii_case(&line)) {
            lines.push(line);
        }
    }
    lines
}

/// Take up to three lines, then backfill from `fallback` without duplicates.
fn fill_suggestions(mut lines: Vec<String>, fallback: &[String]) -> Vec<String> {
    lines.truncate(SUGGESTION_COUNT);
    for candidate in fallback {
        if lines.len() == SUGGESTION_COUNT {
            break;
        }
        if !lines.iter().any(|existing| existing.eq_ignore_ascii_case(candidate)) {
            lines.push(candidate.clone());
        }
    }
    lines
}

// ============================================================================
// Fake Generator for Testing
// ============================================================================

/// A fake suggestion generator that always returns the same suggestions.
pub struct FakeSuggestionGenerator {
    pub suggestions: Vec<String>,
}

impl FakeSuggestionGenerator {
    pub fn with_suggestions(suggestions: [&str; SUGGESTION_COUNT]) -> Self {
        Self {
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl SuggestionGeneratorTrait for FakeSuggestionGenerator {
    async fn generate_suggestions(&self, goals: &[GoalSummary]) -> Vec<String> {
        if goals.is_empty() {
            return starter_suggestions();
        }
        self.suggestions.clone()
    }
}
