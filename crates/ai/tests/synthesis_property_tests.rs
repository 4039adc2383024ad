//! Property-based tests for progress synthesis and suggestion generation.
//!
//! Provider output is simulated with `FakeCompletionClient`, so these tests
//! exercise the full prompt -> parse -> clamp -> fallback path.

use chrono::NaiveDate;
use goaltracker_ai::{
    FakeCompletionClient, ProgressSynthesizer, SuggestionGenerator, SUGGESTION_COUNT,
};
use goaltracker_core::goals::GoalSummary;
use proptest::prelude::*;
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// =============================================================================
// Generators
// =============================================================================

/// Values a provider might put in the `percentage` field.
fn arb_percentage_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        (-1000i64..1000).prop_map(|v| v.to_string()),
        (-1.0e4f64..1.0e4).prop_map(|v| format!("{:.3}", v)),
        "[a-z]{1,8}".prop_map(|s| format!("\"{}\"", s)),
        Just("null".to_string()),
        Just("\"NaN\"".to_string()),
        Just("1e400".to_string()),
    ]
}

/// Arbitrary provider output, structured or not.
fn arb_response() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_percentage_literal()
            .prop_map(|p| format!(r#"{{"percentage": {}, "analysis": "ok"}}"#, p)),
        ".{0,80}",
        "[a-z ]{0,40}[0-9]{1,4}%?[a-z ]{0,40}",
    ]
}

fn arb_goal() -> impl Strategy<Value = GoalSummary> {
    (
        ".{0,20}",
        ".{0,40}",
        -50.0f64..150.0,
        proptest::option::of(0i64..800),
        proptest::option::of(-50.0f64..50.0),
    )
        .prop_map(|(category, description, progress, offset, trend)| GoalSummary {
            category,
            description,
            target_date: offset.map(|d| {
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(d)
            }),
            progress,
            trend,
        })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn synthesized_percentage_is_always_in_bounds(
        response in arb_response(),
        description in ".{0,30}",
        category in ".{0,15}",
    ) {
        let client = FakeCompletionClient::responding(response);
        let synthesizer = ProgressSynthesizer::new(Arc::new(client));
        let result = runtime().block_on(
            synthesizer.synthesize_progress(&description, &category, "Did some work"),
        );
        prop_assert!((0.0..=100.0).contains(&result.percentage));
    }

    #[test]
    fn non_numeric_percentage_yields_exactly_zero(word in "[a-z]{1,10}") {
        let response = format!(r#"{{"percentage": "{}", "analysis": "unclear"}}"#, word);
        let client = FakeCompletionClient::responding(response);
        let synthesizer = ProgressSynthesizer::new(Arc::new(client));
        let result = runtime().block_on(
            synthesizer.synthesize_progress("Goal", "Category", "Update"),
        );
        prop_assert_eq!(result.percentage, 0.0);
        prop_assert_eq!(result.analysis, "Unable to analyze progress");
    }

    #[test]
    fn out_of_range_percentage_yields_fallback(exponent in 309u32..2000, negative in any::<bool>()) {
        let sign = if negative { "-" } else { "" };
        let response = format!(r#"{{"percentage": {}1e{}, "analysis": "ok"}}"#, sign, exponent);
        let client = FakeCompletionClient::responding(response);
        let synthesizer = ProgressSynthesizer::new(Arc::new(client));
        let result = runtime().block_on(
            synthesizer.synthesize_progress("Goal", "Category", "Update"),
        );
        prop_assert_eq!(result.percentage, 0.0);
        prop_assert_eq!(result.analysis, "Unable to analyze progress");
    }

    #[test]
    fn suggestions_always_number_three(
        goals in proptest::collection::vec(arb_goal(), 0..6),
        response in ".{0,200}",
        fail in any::<bool>(),
    ) {
        let client = if fail {
            FakeCompletionClient::failing("boom")
        } else {
            FakeCompletionClient::responding(response)
        };
        let generator = SuggestionGenerator::new(Arc::new(client));
        let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let suggestions = runtime().block_on(generator.generate_suggestions_on(&goals, reference));

        prop_assert_eq!(suggestions.len(), SUGGESTION_COUNT);
        prop_assert!(suggestions.iter().all(|s| !s.trim().is_empty()));
    }
}
