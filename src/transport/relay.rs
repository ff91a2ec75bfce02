//! Third-party form relay transport
//!
//! Posts the form as JSON to a Web3Forms-compatible relay, which forwards it
//! as email. The relay authenticates the site with a fixed access key and
//! answers `{"success": bool, "message": string}`.

use super::{SubmissionError, SubmissionTransport, DEFAULT_FAILURE_MESSAGE};
use crate::state::{ContactSubmission, SubmissionReceipt};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Default relay address
pub const DEFAULT_RELAY_URL: &str = "https://api.web3forms.com/submit";

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    access_key: &'a str,
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// Client for the form relay service
pub struct RelayTransport {
    client: Client,
    url: String,
    access_key: String,
}

impl RelayTransport {
    /// Create a relay transport. No request timeout unless one is given.
    pub fn new(
        url: impl Into<String>,
        access_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, url, access_key))
    }

    pub fn with_client(client: Client, url: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            access_key: access_key.into(),
        }
    }

    fn build_request<'a>(&'a self, submission: &'a ContactSubmission) -> RelayRequest<'a> {
        let input = &submission.input;
        RelayRequest {
            access_key: &self.access_key,
            name: &input.name,
            email: &input.email,
            subject: &input.subject,
            message: &input.message,
        }
    }
}

#[async_trait]
impl SubmissionTransport for RelayTransport {
    async fn submit(
        &self,
        submission: &ContactSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(&self.build_request(submission))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%status, bytes = body.len(), "Relay responded");

        interpret_response(&body)
    }

    fn name(&self) -> &'static str {
        "relay"
    }
}

/// The relay's verdict lives in the body, whatever the HTTP status
fn interpret_response(body: &[u8]) -> Result<SubmissionReceipt, SubmissionError> {
    let parsed: Value = serde_json::from_slice(body)
        .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;
    let Value::Object(fields) = parsed else {
        return Err(SubmissionError::MalformedResponse(
            "expected a JSON object".to_string(),
        ));
    };

    let message = fields
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_owned);

    if fields.get("success").is_some_and(is_truthy) {
        Ok(SubmissionReceipt::new(message))
    } else {
        Err(SubmissionError::Rejected(
            message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        ))
    }
}

/// Loose JSON truthiness (`true`, `1`, `"true"`...). Null, false, zero and
/// the empty string are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FormInput;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> ContactSubmission {
        ContactSubmission::new(FormInput {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            subject: "Collaboration".into(),
            message: "hello there, let's talk".into(),
        })
    }

    fn transport_for(server: &MockServer) -> RelayTransport {
        RelayTransport::new(format!("{}/submit", server.uri()), "test-key", None).unwrap()
    }

    mod interpret {
        use super::*;

        #[test]
        fn test_success_true_is_accepted() {
            let receipt =
                interpret_response(br#"{"success": true, "message": "Email sent successfully!"}"#)
                    .unwrap();
            assert_eq!(receipt.message.as_deref(), Some("Email sent successfully!"));
        }

        #[test]
        fn test_success_false_uses_service_message() {
            let err = interpret_response(br#"{"success": false, "message": "Invalid access key"}"#)
                .unwrap_err();
            assert_eq!(err, SubmissionError::Rejected("Invalid access key".to_string()));
        }

        #[test]
        fn test_missing_flag_falls_back_to_default_message() {
            let err = interpret_response(br#"{}"#).unwrap_err();
            assert_eq!(
                err,
                SubmissionError::Rejected(DEFAULT_FAILURE_MESSAGE.to_string())
            );
        }

        #[test]
        fn test_non_json_body_is_malformed() {
            let err = interpret_response(b"<html>502 Bad Gateway</html>").unwrap_err();
            assert!(matches!(err, SubmissionError::MalformedResponse(_)));
        }

        #[test]
        fn test_non_object_body_is_malformed() {
            let err = interpret_response(b"[true]").unwrap_err();
            assert!(matches!(err, SubmissionError::MalformedResponse(_)));
        }

        #[test]
        fn test_truthiness() {
            assert!(is_truthy(&json!(true)));
            assert!(is_truthy(&json!(1)));
            assert!(is_truthy(&json!("true")));
            assert!(!is_truthy(&json!(false)));
            assert!(!is_truthy(&json!(0)));
            assert!(!is_truthy(&json!("")));
            assert!(!is_truthy(&Value::Null));
        }
    }

    #[tokio::test]
    async fn test_posts_access_key_and_fields_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(header("content-type", "application/json"))
            .and(header("accept", "application/json"))
            .and(body_json(json!({
                "access_key": "test-key",
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "subject": "Collaboration",
                "message": "hello there, let's talk",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "message": "Email sent successfully!"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let receipt = transport_for(&server).submit(&submission()).await.unwrap();
        assert_eq!(receipt.message.as_deref(), Some("Email sent successfully!"));
    }

    #[tokio::test]
    async fn test_service_failure_is_rejected_even_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"success": false, "message": "Invalid access key"})),
            )
            .mount(&server)
            .await;

        let result = transport_for(&server).submit(&submission()).await;
        tokio_test::assert_err!(&result);
        assert_eq!(
            result.unwrap_err(),
            SubmissionError::Rejected("Invalid access key".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_a_transport_error() {
        // Reserve a free port, then close it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/submit", listener.local_addr().unwrap());
        drop(listener);

        let transport = RelayTransport::new(url, "test-key", Some(Duration::from_secs(2))).unwrap();
        let err = transport.submit(&submission()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Transport(_)));
    }

    #[test]
    fn test_name() {
        let transport = RelayTransport::new(DEFAULT_RELAY_URL, "k", None).unwrap();
        assert_eq!(transport.name(), "relay");
    }
}
