use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::progress::progress_model::{SynthesisRequest, SynthesisResult};
use crate::progress::progress_traits::ProgressAnalyzerTrait;

/// An analyzer that returns a fixed result and records every request.
///
/// Useful for wiring services in tests without a completion provider.
#[derive(Clone)]
pub struct FakeProgressAnalyzer {
    result: SynthesisResult,
    requests: Arc<Mutex<Vec<SynthesisRequest>>>,
}

impl FakeProgressAnalyzer {
    pub fn with_result(result: SynthesisResult) -> Self {
        Self {
            result,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProgressAnalyzerTrait for FakeProgressAnalyzer {
    async fn synthesize_progress(&self, request: &SynthesisRequest) -> SynthesisResult {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());
        self.result.clone()
    }
}
