use super::ChatTransport;
use crate::error::{DigestError, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<String>,
}

impl ApiResponse {
    fn into_result(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(DigestError::Slack(
                self.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

/// Posts through the Web API with a bot token.
pub struct SlackBotTransport {
    agent: ureq::Agent,
    api_base: String,
    token: String,
}

impl SlackBotTransport {
    pub fn new(token: &str, timeout: Duration) -> Self {
        Self::with_api_base(SLACK_API_BASE, token, timeout)
    }

    pub fn with_api_base(api_base: &str, token: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn call(&self, method: &str, body: serde_json::Value) -> Result<ApiResponse> {
        let response: ApiResponse = self
            .agent
            .post(&format!("{}/{}", self.api_base, method))
            .set("Authorization", &format!("Bearer {}", self.token))
            .send_json(body)?
            .into_json()
            .map_err(|e| DigestError::Slack(format!("Malformed response from {method}: {e}")))?;
        response.into_result()
    }
}

impl ChatTransport for SlackBotTransport {
    fn post(&self, channel: &str, text: &str) -> Result<()> {
        self.call(
            "chat.postMessage",
            json!({ "channel": channel, "text": text, "mrkdwn": true }),
        )?;
        Ok(())
    }

    fn check(&self, _channel: &str) -> Result<String> {
        let response = self.call("auth.test", json!({}))?;
        Ok(format!(
            "bot user {}",
            response.user.unwrap_or_else(|| "unknown".to_string())
        ))
    }

    fn name(&self) -> &'static str {
        "bot"
    }
}

/// Posts to an incoming webhook URL.
pub struct SlackWebhookTransport {
    agent: ureq::Agent,
    url: String,
}

impl SlackWebhookTransport {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            url: url.to_string(),
        }
    }

    fn send(&self, payload: serde_json::Value) -> Result<()> {
        let response = self.agent.post(&self.url).send_json(payload)?;
        let status = response.status();
        if status != 200 {
            let body = response.into_string().unwrap_or_default();
            return Err(DigestError::Slack(format!(
                "Webhook request failed with status {status}: {body}"
            )));
        }
        Ok(())
    }
}

impl ChatTransport for SlackWebhookTransport {
    fn post(&self, channel: &str, text: &str) -> Result<()> {
        self.send(json!({ "text": text, "mrkdwn": true, "channel": channel }))
    }

    fn check(&self, channel: &str) -> Result<String> {
        self.send(json!({
            "text": "gitdigest connection test successful!",
            "channel": channel,
        }))?;
        Ok("webhook".to_string())
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}
