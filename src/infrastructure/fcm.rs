use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::FcmConfig;
use crate::domain::errors::DomainError;
use crate::domain::notification::PushNotification;
use crate::domain::ports::Notifier;

/// Sends messages through the FCM legacy HTTP endpoint.
pub struct FcmNotifier {
    client: reqwest::Client,
    config: FcmConfig,
}

impl FcmNotifier {
    pub fn new(config: FcmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

fn payload(notification: &PushNotification) -> Value {
    json!({
        "to": notification.device_token,
        "notification": {
            "title": notification.title,
            "body": notification.body,
        },
        "data": notification.data,
    })
}

#[async_trait]
impl Notifier for FcmNotifier {
    async fn send(&self, notification: &PushNotification) -> Result<(), DomainError> {
        let resp = self
            .client
            .post(&self.config.endpoint)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("key={}", self.config.server_key),
            )
            .json(&payload(notification))
            .send()
            .await
            .map_err(|e| DomainError::Internal(format!("push request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Internal(format!(
                "push rejected with {status}: {body}"
            )));
        }
        Ok(())
    }
}

/// Stand-in used when no server key is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &PushNotification) -> Result<(), DomainError> {
        log::info!(
            "push (not sent, no server key): {} | {}",
            notification.title,
            notification.body
        );
        Ok(())
    }
}
