//! Progress synthesis: free-text update in, bounded percentage and analysis out.

use async_trait::async_trait;
use goaltracker_core::progress::{ProgressAnalyzerTrait, SynthesisRequest, SynthesisResult};
use log::{debug, warn};
use std::sync::Arc;

use crate::completion::{complete_with_timeout, CompletionClientTrait};
use crate::prompts::progress_prompt;
use crate::response_parser::{parse_progress_response, FailureReason, ParsedResponse};

/// Estimates goal progress through a completion provider.
///
/// Never fails: provider errors, timeouts and unreadable answers all
/// collapse into [`SynthesisResult::fallback`].
pub struct ProgressSynthesizer {
    client: Arc<dyn CompletionClientTrait>,
}

impl ProgressSynthesizer {
    pub fn new(client: Arc<dyn CompletionClientTrait>) -> Self {
        Self { client }
    }

    /// Synthesize progress for a goal described by `goal_description` and
    /// `goal_category`. Either may be empty.
    pub async fn synthesize_progress(
        &self,
        goal_description: &str,
        goal_category: &str,
        update_text: &str,
    ) -> SynthesisResult {
        let request = SynthesisRequest::new(goal_description, goal_category, update_text);
        self.synthesize(&request).await
    }

    /// Same as [`synthesize_progress`](Self::synthesize_progress) but keeps
    /// the failure reason.
    pub async fn try_synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<ParsedResponse, FailureReason> {
        let prompt = progress_prompt(request);
        let response = complete_with_timeout(self.client.as_ref(), &prompt)
            .await
            .map_err(|e| FailureReason::ProviderUnavailable(e.to_string()))?;
        debug!("Progress synthesis response: {}", response);
        parse_progress_response(&response)
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> SynthesisResult {
        match self.try_synthesize(request).await {
            Ok(ParsedResponse::Structured(result)) => result,
            Ok(ParsedResponse::Extracted(result)) => {
                debug!("Provider answered without JSON, used extracted number");
                result
            }
            Err(reason) => {
                warn!("Progress synthesis failed, using fallback: {}", reason);
                SynthesisResult::fallback()
            }
        }
    }
}

#[async_trait]
impl ProgressAnalyzerTrait for ProgressSynthesizer {
    async fn synthesize_progress(&self, request: &SynthesisRequest) -> SynthesisResult {
        self.synthesize(request).await
    }
}
