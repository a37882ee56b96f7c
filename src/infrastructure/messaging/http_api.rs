use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;

use crate::application::services::delivery::{DeliveryClient, DeliveryError, DeliveryResponse};

#[derive(Debug, Clone)]
pub struct HttpDeliveryConfig {
    pub url: String,
    pub timeout: Duration,
}

/// Delivers messages by POSTing them as JSON to the configured endpoint.
pub struct HttpDeliveryClient {
    http: Client,
    url: String,
}

impl HttpDeliveryClient {
    pub fn new(config: &HttpDeliveryConfig) -> anyhow::Result<Arc<Self>> {
        let http = Client::builder()
            .user_agent(concat!("message-dispatch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Arc::new(Self {
            http,
            url: config.url.clone(),
        }))
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    phone_number: &'a str,
    message: &'a str,
}

#[async_trait]
impl DeliveryClient for HttpDeliveryClient {
    async fn send(
        &self,
        destination: &str,
        content: &str,
    ) -> Result<DeliveryResponse, DeliveryError> {
        let response = self
            .http
            .post(&self.url)
            .json(&SendMessageRequest {
                phone_number: destination,
                message: content,
            })
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| DeliveryError::Transport(format!("failed to read response body: {err}")))?;

        interpret_response(status, &body)
    }
}

fn interpret_response(status: u16, body: &str) -> Result<DeliveryResponse, DeliveryError> {
    let parsed = serde_json::from_str::<DeliveryResponse>(body).ok();

    if (200..300).contains(&status) {
        // Some endpoints acknowledge with an empty or foreign body; treat any
        // 2xx without a usable id as a successful send.
        return Ok(match parsed {
            Some(response) if !response.message_id.is_empty() => response,
            _ => DeliveryResponse::sent(generate_message_id()),
        });
    }

    let reason = parsed
        .and_then(|response| response.error)
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}: {body}"));
    Err(DeliveryError::Rejected { status, reason })
}

fn generate_message_id() -> String {
    format!("msg_{}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
}
