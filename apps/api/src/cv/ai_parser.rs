//! AI extraction backend.
//!
//! `CvPipeline` holds an `Option<Arc<dyn ProfileExtractor>>`; `None` means no
//! API key was configured and every parse goes to the rule-based engine.

use async_trait::async_trait;

use crate::cv::prompts::{CV_PARSE_PROMPT_TEMPLATE, CV_PARSE_SYSTEM};
use crate::extraction::ParsedProfile;
use crate::llm_client::{LlmClient, LlmError};

#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<ParsedProfile, LlmError>;
}

/// Sends the CV text through `LlmClient` and reads the reply as a `ParsedProfile`.
pub struct LlmProfileExtractor {
    llm: LlmClient,
}

impl LlmProfileExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

pub fn build_prompt(text: &str) -> String {
    CV_PARSE_PROMPT_TEMPLATE.replace("{cv_text}", text)
}

#[async_trait]
impl ProfileExtractor for LlmProfileExtractor {
    async fn extract(&self, text: &str) -> Result<ParsedProfile, LlmError> {
        self.llm
            .call_json::<ParsedProfile>(&build_prompt(text), CV_PARSE_SYSTEM)
            .await
    }
}
