//! Goal Tracker AI - progress synthesis and coaching suggestions using rig-core.
//!
//! # Architecture
//!
//! - `completion`: Provider-agnostic completion client, rig-core backend, timeouts
//! - `prompts`: Prompt construction for synthesis and suggestions
//! - `response_parser`: Staged parsing of provider text into progress results
//! - `progress_synthesizer`: Always-total progress estimation
//! - `suggestions`: Exactly-three coaching suggestions with deterministic fallback
//!
//! # Example
//!
//! ```ignore
//! use goaltracker_ai::{CompletionConfig, ProgressSynthesizer, RigCompletionClient};
//!
//! let client = RigCompletionClient::new(CompletionConfig::for_provider("groq", Some(key)));
//! let synthesizer = ProgressSynthesizer::new(Arc::new(client));
//!
//! let result = synthesizer
//!     .synthesize_progress("Run a 10K", "Fitness", "Completed a 5K training run")
//!     .await;
//! println!("{}% - {}", result.percentage, result.analysis);
//! ```

pub mod completion;
pub mod error;
pub mod progress_synthesizer;
pub mod prompts;
pub mod response_parser;
pub mod suggestions;

pub use completion::{
    complete_with_timeout, default_model_for, CompletionClientTrait, CompletionConfig,
    FakeCompletionClient, RigCompletionClient, DEFAULT_PROVIDER, DEFAULT_TIMEOUT_SECS,
};
pub use error::AiError;
pub use progress_synthesizer::ProgressSynthesizer;
pub use response_parser::{parse_progress_response, FailureReason, ParsedResponse};
pub use suggestions::{
    FakeSuggestionGenerator, SuggestionGenerator, SuggestionGeneratorTrait, STARTER_SUGGESTIONS,
    SUGGESTION_COUNT,
};
