use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::LeadsConfig;
use crate::errors::LeadError;
use crate::models::LeadRequest;

/// Delivers a lead research request somewhere that will act on it.
#[async_trait]
pub trait LeadSubmitter: Send + Sync {
    /// Returns the service's JSON reply on success.
    async fn submit(&self, request: &LeadRequest) -> Result<Value, LeadError>;
}

/// POSTs lead requests as JSON to the research webhook.
pub struct WebhookSubmitter {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookSubmitter {
    pub fn new(config: &LeadsConfig) -> Result<Self, LeadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| LeadError::SubmissionFailed(format!("Failed to build HTTP client: {}", e)))?;
        info!("Lead submissions will be sent to '{}'", config.webhook_url);
        Ok(WebhookSubmitter {
            client,
            webhook_url: config.webhook_url.clone(),
        })
    }
}

#[async_trait]
impl LeadSubmitter for WebhookSubmitter {
    async fn submit(&self, request: &LeadRequest) -> Result<Value, LeadError> {
        debug!(
            "Sending webhook request with {} URL(s) for '{}'",
            request.urls.len(),
            request.email
        );

        let resp = self
            .client
            .post(&self.webhook_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LeadError::SubmissionFailed(format!("Failed to call webhook: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LeadError::SubmissionFailed(format!(
                "Failed to submit request: {}",
                status
            )));
        }

        let reply = resp
            .json::<Value>()
            .await
            .map_err(|e| LeadError::SubmissionFailed(format!("Failed to parse webhook JSON: {}", e)))?;
        debug!("Webhook response: {}", reply);
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Identity, Platform, PlatformLink};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn request() -> LeadRequest {
        LeadRequest::new(
            &Identity::new("42", "Ada", "a@x.com", None),
            vec![PlatformLink {
                platform: Platform::Website,
                url: "https://analytical.engine".to_string(),
            }],
        )
    }

    fn submitter(url: String) -> WebhookSubmitter {
        WebhookSubmitter::new(&LeadsConfig {
            webhook_url: url,
            timeout_ms: 2_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_submit_posts_json_and_returns_reply() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/webhook/knowleadge")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "urls": [["website", "https://analytical.engine"]],
                "email": "a@x.com",
                "name": "Ada"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"queued"}"#)
            .create_async()
            .await;

        let reply = submitter(format!("{}/webhook/knowleadge", server.url()))
            .submit(&request())
            .await
            .unwrap();

        m.assert_async().await;
        assert_eq!(reply, json!({"status": "queued"}));
    }

    #[tokio::test]
    async fn test_server_error_is_submission_failure() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let result = submitter(server.url()).submit(&request()).await;

        m.assert_async().await;
        assert!(matches!(result, Err(LeadError::SubmissionFailed(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_non_json_success_is_submission_failure() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("Accepted")
            .create_async()
            .await;

        let result = submitter(server.url()).submit(&request()).await;

        m.assert_async().await;
        assert!(matches!(result, Err(LeadError::SubmissionFailed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_submission_failure() {
        // Port 9 (discard) is not expected to be listening.
        let result = submitter("http://127.0.0.1:9/".to_string())
            .submit(&request())
            .await;
        assert!(matches!(result, Err(LeadError::SubmissionFailed(_))));
    }
}
