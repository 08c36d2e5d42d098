// CV parsing: AI extraction with the rule-based engine as the safety net.

pub mod ai_parser;
pub mod handlers;
pub mod pipeline;
pub mod prompts;

pub use ai_parser::{LlmProfileExtractor, ProfileExtractor};
pub use pipeline::CvPipeline;
