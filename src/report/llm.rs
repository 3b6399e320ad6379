use super::document::ReportDocument;
use super::prompt::{user_prompt, SYSTEM_PROMPT};
use super::ReportComposer;
use crate::error::{DigestError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client for an OpenAI compatible endpoint.
pub struct LlmComposer {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmComposer {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl ReportComposer for LlmComposer {
    fn compose(&self, doc: &ReportDocument) -> Result<String> {
        let prompt = user_prompt(doc)?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting report");

        let response: ChatResponse = self
            .agent
            .post(&self.endpoint())
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request)?
            .into_json()
            .map_err(|e| DigestError::Llm(format!("Malformed response: {e}")))?;

        extract_content(response)
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

fn extract_content(response: ChatResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(DigestError::Llm("Empty response from language model".to_string()));
    }
    Ok(content)
}
