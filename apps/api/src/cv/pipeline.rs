//! CV parse orchestration: cache, then AI extraction under a timeout, then the
//! rule-based engine.
//!
//! ```text
//! text ──► too short? ──► fallback (partial)
//!            │
//!            ▼
//!        cache hit? ──► cached profile (success)
//!            │
//!            ▼
//!     AI enabled + requested? ──no──► fallback (partial)
//!            │
//!            ▼
//!     AI within timeout? ──no──► fallback (partial)
//!            │
//!            ▼
//!     patch fields from engine, cache, return (success)
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::cache::{content_hash, ProfileCache};
use crate::cv::ai_parser::ProfileExtractor;
use crate::extraction::contact::{extract_email, extract_phone};
use crate::extraction::models::{EMAIL_NOT_DETECTED, NAME_NOT_DETECTED, PHONE_NOT_DETECTED};
use crate::extraction::name::extract_name;
use crate::extraction::{extract_fallback_profile, ParsedProfile};

pub const LIMITED_TEXT_MESSAGE: &str =
    "Limited text extracted from document. Results may be incomplete.";
const AI_UNAVAILABLE_MESSAGE: &str = "AI parsing is not configured. Using basic extraction.";
const AI_NOT_REQUESTED_MESSAGE: &str = "AI parsing was not requested. Using basic extraction.";
const AI_TIMEOUT_MESSAGE: &str = "AI parsing timed out. Using basic extraction.";

/// Names the model sometimes returns when it picks up a heading instead of the person.
const HEADING_NAMES: &[&str] = &["About Me", "Profile", "Personal Information"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    Success,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    Ai,
    Cache,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub status: ParseStatus,
    pub data: ParsedProfile,
    pub source: ProfileSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ParseOptions {
    #[serde(default = "default_use_ai")]
    pub use_ai: bool,
}

fn default_use_ai() -> bool {
    true
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { use_ai: true }
    }
}

pub struct CvPipeline {
    extractor: Option<Arc<dyn ProfileExtractor>>,
    cache: Arc<dyn ProfileCache>,
    ai_timeout: Duration,
    min_text_chars: usize,
}

impl CvPipeline {
    pub fn new(
        extractor: Option<Arc<dyn ProfileExtractor>>,
        cache: Arc<dyn ProfileCache>,
        ai_timeout: Duration,
        min_text_chars: usize,
    ) -> Self {
        Self {
            extractor,
            cache,
            ai_timeout,
            min_text_chars,
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.extractor.is_some()
    }

    /// Never fails: every path that cannot produce an AI or cached profile ends
    /// in a rule-based one.
    pub async fn parse(&self, text: &str, options: ParseOptions) -> ParseOutcome {
        let chars = text.trim().chars().count();
        if chars < self.min_text_chars {
            debug!(chars, min = self.min_text_chars, "text below AI threshold");
            return self.fallback(text, LIMITED_TEXT_MESSAGE.to_string()).await;
        }

        let key = content_hash(text);
        match self.cache.get(&key).await {
            Ok(Some(profile)) => {
                info!(key = %key, "cv profile cache hit");
                return ParseOutcome {
                    status: ParseStatus::Success,
                    data: profile,
                    source: ProfileSource::Cache,
                    message: None,
                };
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "cache lookup failed, treating as miss"),
        }

        let extractor = match (&self.extractor, options.use_ai) {
            (Some(extractor), true) => extractor,
            (None, _) => return self.fallback(text, AI_UNAVAILABLE_MESSAGE.to_string()).await,
            (Some(_), false) => {
                return self
                    .fallback(text, AI_NOT_REQUESTED_MESSAGE.to_string())
                    .await
            }
        };

        let profile = match tokio::time::timeout(self.ai_timeout, extractor.extract(text)).await {
            Ok(Ok(profile)) => profile,
            Ok(Err(e)) => {
                warn!(error = %e, "AI extraction failed, using fallback");
                let message = format!("AI parsing failed: {e}. Using basic extraction.");
                return self.fallback(text, message).await;
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.ai_timeout.as_millis() as u64,
                    "AI extraction timed out, using fallback"
                );
                return self.fallback(text, AI_TIMEOUT_MESSAGE.to_string()).await;
            }
        };

        let profile = patch_ai_profile(profile, text);
        if let Err(e) = self.cache.put(&key, &profile).await {
            warn!(error = %e, "failed to cache parsed profile");
        }

        ParseOutcome {
            status: ParseStatus::Success,
            data: profile,
            source: ProfileSource::Ai,
            message: None,
        }
    }

    async fn fallback(&self, text: &str, message: String) -> ParseOutcome {
        let owned = text.to_string();
        let task = tokio::task::spawn_blocking(move || extract_fallback_profile(&owned));
        let profile = match task.await {
            Ok(profile) => profile,
            Err(e) => {
                error!(error = %e, "fallback extraction task failed");
                ParsedProfile::undetected()
            }
        };

        ParseOutcome {
            status: ParseStatus::Partial,
            data: profile,
            source: ProfileSource::Fallback,
            message: Some(message),
        }
    }
}

/// Replaces contact fields the model left empty or filled with a heading.
/// A field is only overwritten when the engine actually finds something.
fn patch_ai_profile(mut profile: ParsedProfile, text: &str) -> ParsedProfile {
    let name = profile.name.trim();
    if name.is_empty() || HEADING_NAMES.iter().any(|h| name.eq_ignore_ascii_case(h)) {
        let detected = extract_name(text);
        if detected != NAME_NOT_DETECTED {
            profile.name = detected;
        }
    }

    let email = profile.email.trim();
    if email.is_empty() || email.eq_ignore_ascii_case("Not provided") {
        let detected = extract_email(text);
        if detected != EMAIL_NOT_DETECTED {
            profile.email = detected;
        }
    }

    if profile.phone.trim().is_empty() {
        let detected = extract_phone(text);
        if detected != PHONE_NOT_DETECTED {
            profile.phone = detected;
        }
    }

    profile
}
