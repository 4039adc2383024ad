//! Progress module - progress updates, synthesis contract, and service.

mod fake_analyzer;
mod progress_model;
mod progress_service;
mod progress_traits;

pub use fake_analyzer::FakeProgressAnalyzer;
pub use progress_model::{
    clamp_progress, NewProgressUpdate, ProgressUpdate, RecordProgressRequest, SynthesisRequest,
    SynthesisResult,
};
pub use progress_service::ProgressService;
pub use progress_traits::{ProgressAnalyzerTrait, ProgressRepositoryTrait, ProgressServiceTrait};
