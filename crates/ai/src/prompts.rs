//! Prompt construction for progress synthesis and coaching suggestions.

use chrono::NaiveDate;
use goaltracker_core::goals::GoalSummary;
use goaltracker_core::progress::SynthesisRequest;
use goaltracker_core::utils::DaysRemaining;
use std::fmt::Write as _;

/// Longest update text forwarded to the provider, in characters.
pub const MAX_UPDATE_CHARS: usize = 2000;

/// Prompt asking for a completion percentage and a short analysis as JSON.
pub fn progress_prompt(request: &SynthesisRequest) -> String {
    format!(
        "You are tracking progress towards a personal goal.\n\n\
Goal: {}\n\
Category: {}\n\
Progress Update: {}\n\n\
Based on this progress update, provide:\n\
1. A percentage (0-100) indicating how close the goal is to completion\n\
2. A brief analysis explaining the evaluation\n\n\
Return ONLY a JSON object in this format:\n\
{{\"percentage\": <number between 0-100>, \"analysis\": \"<brief explanation>\"}}",
        or_placeholder(&request.goal_description),
        or_placeholder(&request.goal_category),
        truncate_chars(request.update_text.trim(), MAX_UPDATE_CHARS),
    )
}

/// Prompt listing `goals` in the given order and asking for three suggestions.
pub fn suggestions_prompt(goals: &[GoalSummary], reference_date: NaiveDate) -> String {
    let mut listing = String::new();
    for (i, goal) in goals.iter().enumerate() {
        let days = DaysRemaining::between(goal.target_date, reference_date);
        let _ = write!(
            listing,
            "Goal {}:\nCategory: {}\nDescription: {}\nProgress: {:.0}%\nDays remaining: {}\n",
            i + 1,
            or_placeholder(&goal.category),
            or_placeholder(&goal.description),
            goal.progress,
            days,
        );
        if let Some(trend) = goal.trend {
            let _ = writeln!(listing, "Recent trend: {:+.0} points", trend);
        }
        listing.push('\n');
    }

    format!(
        "Here are a user's goals, most behind and most urgent first:\n\n\
{}\
Provide exactly 3 specific, actionable suggestions that:\n\
1. Help make progress on the goals that are furthest behind\n\
2. Can be started immediately\n\
3. Respect the remaining time (\"overdue\" means the target date has passed)\n\n\
Format: one suggestion per line, no numbering, no headings.",
        listing
    )
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not specified)"
    } else {
        value.trim()
    }
}

/// Truncate to at most `max_chars` characters, preferring a word boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let text = text.trim();

    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut end_byte = text.len();
    let mut last_space: Option<(usize, usize)> = None;

    for (chars_seen, (idx, ch)) in text.char_indices().enumerate() {
        if chars_seen == max_chars {
            end_byte = idx;
            break;
        }
        if ch.is_whitespace() {
            last_space = Some((idx, chars_seen));
        }
    }

    let truncated = &text[..end_byte];
    let cut = match last_space {
        Some((byte_idx, char_idx)) if char_idx > max_chars / 2 => &truncated[..byte_idx],
        _ => truncated,
    };

    format!("{}...", cut.trim_end())
}
