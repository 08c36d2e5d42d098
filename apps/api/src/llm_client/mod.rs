/// LLM Client: the single point of entry for Anthropic API calls in cv-api.
///
/// No other module talks to the provider directly; the CV parser goes through
/// `LlmClient::call_json`.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Hardcoded so deployments cannot drift onto a different model.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Text of the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API with retry logic and a JSON helper.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    /// `timeout` bounds each HTTP attempt, not the whole retry loop.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key })
    }

    /// Raw call returning the full response object.
    /// Retries on 429 and 5xx with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the model and deserializes the JSON object in its reply.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        parse_json_reply(text)
    }
}

/// Deserializes a model reply, tolerating code fences and surrounding prose.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let payload = extract_json_payload(text);
    if payload.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    serde_json::from_str(payload).map_err(LlmError::Parse)
}

/// The JSON object inside a model reply.
///
/// Takes the body of a ```` ```json ```` fence anywhere in the text, else of a
/// plain ```` ``` ```` fence, else the whole text; then trims to the outermost
/// `{ ... }` when both braces are present.
pub fn extract_json_payload(text: &str) -> &str {
    let text = text.trim();
    let body = fenced_body(text, "```json")
        .or_else(|| fenced_body(text, "```"))
        .unwrap_or(text);

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => body,
    }
}

fn fenced_body<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find("```").unwrap_or(rest.len());
    Some(rest[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_payload_from_json_fence() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_payload(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_payload_from_plain_fence() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_payload(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_payload_without_fence() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(extract_json_payload(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_payload_fence_after_prose() {
        let input = "Here is the parsed CV:\n```json\n{\"name\": \"Jane\"}\n```\nLet me know!";
        assert_eq!(extract_json_payload(input), "{\"name\": \"Jane\"}");
    }

    #[test]
    fn test_payload_trimmed_to_outer_braces() {
        let input = "Sure! {\"a\": {\"b\": 1}} Hope that helps.";
        assert_eq!(extract_json_payload(input), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn test_payload_unterminated_fence() {
        let input = "```json\n{\"key\": 1}";
        assert_eq!(extract_json_payload(input), "{\"key\": 1}");
    }

    #[test]
    fn test_parse_json_reply() {
        let value: Value = parse_json_reply("```json\n{\"n\": 2}\n```").unwrap();
        assert_eq!(value["n"], 2);

        assert!(matches!(
            parse_json_reply::<Value>("  "),
            Err(LlmError::EmptyContent)
        ));
        assert!(matches!(
            parse_json_reply::<Value>("no json here"),
            Err(LlmError::Parse(_))
        ));
    }

    #[test]
    fn test_response_text_picks_text_block() {
        let response: LlmResponse = serde_json::from_str(
            r#"{"content":[{"type":"tool_use"},{"type":"text","text":"hi"}],
                "usage":{"input_tokens":1,"output_tokens":2}}"#,
        )
        .unwrap();
        assert_eq!(response.text(), Some("hi"));
    }

    #[test]
    fn test_client_builds_without_network() {
        assert!(LlmClient::new("key".to_string(), Duration::from_secs(5)).is_ok());
    }
}
