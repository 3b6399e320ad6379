pub mod chunk;
pub mod slack;

pub use chunk::chunk_report;
pub use slack::{SlackBotTransport, SlackWebhookTransport};

use crate::config::Config;
use crate::error::Result;
use tracing::{error, info};

/// Slack rejects longer message text.
pub const MAX_MESSAGE_CHARS: usize = 4000;
pub const DEFAULT_TITLE: &str = "Git Repository Analysis Report";

/// A channel that accepts plain text messages.
pub trait ChatTransport {
    fn post(&self, channel: &str, text: &str) -> Result<()>;

    /// Verifies credentials and returns a short description of the identity used.
    fn check(&self, channel: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Picks the bot token transport when configured, the webhook otherwise.
pub fn transport_from_config(config: &Config) -> Option<Box<dyn ChatTransport>> {
    let timeout = config.http_timeout();
    if let Some(token) = config.slack_token.as_deref() {
        return Some(Box::new(SlackBotTransport::new(token, timeout)));
    }
    config
        .slack_webhook_url
        .as_deref()
        .map(|url| Box::new(SlackWebhookTransport::new(url, timeout)) as Box<dyn ChatTransport>)
}

pub struct Delivery {
    transport: Box<dyn ChatTransport>,
    channel: String,
    ceiling: usize,
}

impl Delivery {
    pub fn new(transport: Box<dyn ChatTransport>, channel: impl Into<String>) -> Self {
        Self {
            transport,
            channel: channel.into(),
            ceiling: MAX_MESSAGE_CHARS,
        }
    }

    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling;
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The messages `send_report` would post, in order.
    pub fn plan(&self, report: &str, title: &str) -> Vec<String> {
        let single = format!("*{title}*\n\n{report}");
        if single.chars().count() <= self.ceiling {
            return vec![single];
        }

        let mut messages = vec![format!("*{title}*")];
        messages.extend(chunk_report(report, self.ceiling));
        messages
    }

    /// Posts the report. Returns `false` as soon as one message fails; no retry.
    pub fn send_report(&self, report: &str, title: &str) -> bool {
        let messages = self.plan(report, title);
        let total = messages.len();

        for (i, message) in messages.iter().enumerate() {
            if let Err(e) = self.transport.post(&self.channel, message) {
                error!(
                    transport = self.transport.name(),
                    channel = %self.channel,
                    part = i + 1,
                    total,
                    error = %e,
                    "failed to send report"
                );
                return false;
            }
        }

        info!(
            transport = self.transport.name(),
            channel = %self.channel,
            parts = total,
            "report sent"
        );
        true
    }

    pub fn test_connection(&self) -> Result<String> {
        self.transport.check(&self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DigestError;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recording {
        sent: Rc<RefCell<Vec<(String, String)>>>,
        fail_after: Option<usize>,
    }

    impl ChatTransport for Recording {
        fn post(&self, channel: &str, text: &str) -> Result<()> {
            let mut sent = self.sent.borrow_mut();
            if self.fail_after.is_some_and(|n| sent.len() >= n) {
                return Err(DigestError::Slack("rate_limited".into()));
            }
            sent.push((channel.to_string(), text.to_string()));
            Ok(())
        }

        fn check(&self, _channel: &str) -> Result<String> {
            Ok("recording".into())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn long_report() -> String {
        (0..40)
            .map(|s| format!("## Part {s}\n{}\n", "detail line with words\n".repeat(8)))
            .collect()
    }

    #[test]
    fn short_report_sent_once_with_title() {
        let transport = Recording::default();
        let delivery = Delivery::new(Box::new(transport.clone()), "#eng");

        assert!(delivery.send_report("all quiet", DEFAULT_TITLE));
        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "#eng");
        assert_eq!(sent[0].1, format!("*{DEFAULT_TITLE}*\n\nall quiet"));
    }

    #[test]
    fn long_report_sends_title_then_chunks() {
        let transport = Recording::default();
        let delivery = Delivery::new(Box::new(transport.clone()), "#eng").with_ceiling(1000);
        let report = long_report();

        assert!(delivery.send_report(&report, "Digest"));
        let sent = transport.sent.borrow();
        assert!(sent.len() > 2);
        assert_eq!(sent[0].1, "*Digest*");
        assert!(sent.iter().all(|(_, text)| text.chars().count() <= 1000));
        assert!(sent[1].1.starts_with("## Part 0"));
    }

    #[test]
    fn failure_stops_and_reports_false() {
        let transport = Recording {
            fail_after: Some(2),
            ..Recording::default()
        };
        let delivery = Delivery::new(Box::new(transport.clone()), "#eng").with_ceiling(1000);

        assert!(!delivery.send_report(&long_report(), "Digest"));
        assert_eq!(transport.sent.borrow().len(), 2);
    }

    #[test]
    fn title_counts_toward_single_message_limit() {
        let delivery = Delivery::new(Box::new(Recording::default()), "#eng").with_ceiling(50);
        let report = "x".repeat(45);
        let plan = delivery.plan(&report, "Title");
        assert_eq!(plan[0], "*Title*");
        assert!(plan.iter().all(|m| m.chars().count() <= 50));
    }

    #[test]
    fn connection_check_uses_transport() {
        let delivery = Delivery::new(Box::new(Recording::default()), "#eng");
        assert_eq!(delivery.test_connection().unwrap(), "recording");
        assert_eq!(delivery.channel(), "#eng");
    }
}
