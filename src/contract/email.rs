//! Outbound email transport seam and its HTTP implementation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ContractError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailAttachment {
    pub filename: String,
    #[serde(rename = "content")]
    pub content_base64: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// One message as handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEmail {
    #[serde(rename = "from")]
    pub sender: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    pub subject: String,
    #[serde(rename = "html")]
    pub html_body: String,
    pub attachments: Vec<EmailAttachment>,
}

/// Sends one message and returns the provider's message id. No retries.
pub trait EmailTransport: Send + Sync {
    fn send(&self, email: &OutboundEmail) -> Result<String, ContractError>;
}

/// Transactional-email HTTP API (`POST` JSON, bearer key, `{ id }` response).
pub struct HttpEmailTransport {
    api_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpEmailTransport {
    pub fn new(api_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, ContractError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ContractError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        })
    }
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

impl EmailTransport for HttpEmailTransport {
    fn send(&self, email: &OutboundEmail) -> Result<String, ContractError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ContractError::Transport(format!("Cannot reach email API at {}", self.api_url))
                } else if e.is_timeout() {
                    ContractError::Transport(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    ContractError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ContractError::TransportRejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SendResponse = response
            .json()
            .map_err(|e| ContractError::Transport(format!("Unreadable email API response: {e}")))?;
        Ok(parsed.id)
    }
}

/// Records every message and answers with sequential ids.
#[derive(Clone, Default)]
pub struct MockEmailTransport {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
    fail_with: Option<u16>,
}

impl MockEmailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send is rejected with this HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl EmailTransport for MockEmailTransport {
    fn send(&self, email: &OutboundEmail) -> Result<String, ContractError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| ContractError::Transport("mock transport lock poisoned".into()))?;
        sent.push(email.clone());
        match self.fail_with {
            Some(status) => Err(ContractError::TransportRejected {
                status,
                body: "rejected by mock".into(),
            }),
            None => Ok(format!("mock-{}", sent.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutboundEmail {
        OutboundEmail {
            sender: "Uzman Randevu <siparis@uzmanrandevu.com>".into(),
            to: vec!["ayse@example.com".into()],
            cc: vec!["satis@uzmanrandevu.com".into()],
            bcc: vec![],
            subject: "Konu".into(),
            html_body: "<p>Merhaba</p>".into(),
            attachments: vec![EmailAttachment {
                filename: "a.pdf".into(),
                content_base64: "JVBERi0xLjM=".into(),
                mime_type: "application/pdf".into(),
            }],
        }
    }

    #[test]
    fn serializes_to_api_shape() {
        let json = serde_json::to_value(email()).unwrap();
        assert_eq!(json["from"], "Uzman Randevu <siparis@uzmanrandevu.com>");
        assert_eq!(json["to"][0], "ayse@example.com");
        assert_eq!(json["cc"][0], "satis@uzmanrandevu.com");
        assert!(json.get("bcc").is_none());
        assert_eq!(json["html"], "<p>Merhaba</p>");
        assert_eq!(json["attachments"][0]["filename"], "a.pdf");
        assert_eq!(json["attachments"][0]["content"], "JVBERi0xLjM=");
        assert_eq!(json["attachments"][0]["type"], "application/pdf");
    }

    #[test]
    fn mock_records_and_numbers_messages() {
        let transport = MockEmailTransport::new();
        assert_eq!(transport.send(&email()).unwrap(), "mock-1");
        assert_eq!(transport.send(&email()).unwrap(), "mock-2");
        assert_eq!(transport.sent().len(), 2);
    }

    #[test]
    fn failing_mock_still_records() {
        let transport = MockEmailTransport::failing(422);
        let err = transport.send(&email()).unwrap_err();
        assert!(err.is_transport_failure());
        assert_eq!(transport.sent().len(), 1);
    }

    #[test]
    fn http_transport_builds() {
        let transport = HttpEmailTransport::new("http://127.0.0.1:9/emails", "key", 5).unwrap();
        assert_eq!(transport.timeout_secs, 5);
    }

    #[test]
    fn unreachable_api_is_transport_error() {
        let transport = HttpEmailTransport::new("http://127.0.0.1:9/emails", "key", 2).unwrap();
        let err = transport.send(&email()).unwrap_err();
        assert!(matches!(err, ContractError::Transport(_)));
    }
}
