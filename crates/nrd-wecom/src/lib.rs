//! WeCom (Enterprise WeChat) robot webhook adapter.
//!
//! One message type (`markdown`), one call per invocation, no retry. WeCom
//! can accept the HTTP request and still refuse the message, so a success
//! status is only half the answer: the response body carries an `errcode`
//! that must be exactly zero.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Typed delivery failure, so callers can pattern-match transport problems
/// apart from application-level rejection.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("wecom request error: {0}")]
    Transport(String),

    #[error("wecom push rejected (errcode {errcode}): {body}")]
    Rejected { errcode: i64, body: String },
}

/// Status record returned by the webhook endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct Receipt {
    #[serde(default = "missing_errcode")]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: Option<String>,
}

fn missing_errcode() -> i64 {
    -1
}

#[derive(Serialize)]
struct MarkdownMessage<'a> {
    msgtype: &'static str,
    markdown: MarkdownContent<'a>,
}

#[derive(Serialize)]
struct MarkdownContent<'a> {
    content: &'a str,
}

#[derive(Clone, Debug)]
pub struct WecomClient {
    webhook_url: String,
    http: reqwest::Client,
}

impl WecomClient {
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self {
            webhook_url: webhook_url.into(),
            http,
        }
    }

    /// Post `content` as a single markdown message.
    pub async fn send_markdown(&self, content: &str) -> Result<Receipt, DeliveryError> {
        let payload = MarkdownMessage {
            msgtype: "markdown",
            markdown: MarkdownContent { content },
        };

        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(format!("wecom request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DeliveryError::Transport(format!(
                "wecom push failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(format!("wecom response read error: {e}")))?;
        parse_receipt(&body)
    }
}

fn parse_receipt(body: &str) -> Result<Receipt, DeliveryError> {
    let receipt: Receipt = serde_json::from_str(body)
        .map_err(|e| DeliveryError::Transport(format!("wecom response not json: {e}")))?;

    if receipt.errcode != 0 {
        return Err(DeliveryError::Rejected {
            errcode: receipt.errcode,
            body: body.to_string(),
        });
    }

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_has_the_wecom_markdown_shape() {
        let payload = MarkdownMessage {
            msgtype: "markdown",
            markdown: MarkdownContent { content: "hello" },
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "msgtype": "markdown",
                "markdown": {"content": "hello"},
            })
        );
    }

    #[test]
    fn zero_errcode_is_success() {
        let receipt = parse_receipt(r#"{"errcode":0,"errmsg":"ok"}"#).unwrap();
        assert_eq!(receipt.errcode, 0);
        assert_eq!(receipt.errmsg.as_deref(), Some("ok"));
    }

    #[test]
    fn nonzero_errcode_is_rejected_with_body() {
        let body = r#"{"errcode":93000,"errmsg":"invalid webhook url"}"#;
        let err = parse_receipt(body).unwrap_err();
        match err {
            DeliveryError::Rejected { errcode, body: b } => {
                assert_eq!(errcode, 93000);
                assert_eq!(b, body);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn missing_errcode_defaults_to_rejection() {
        let err = parse_receipt(r#"{"errmsg":"??"}"#).unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected { errcode: -1, .. }));
    }

    #[test]
    fn non_json_body_is_a_transport_error() {
        let err = parse_receipt("<html>gateway</html>").unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }
}
