//! Deal alert delivery

use std::collections::HashMap;

use async_trait::async_trait;

use super::config::NotifyTarget;

const TWILIO_API: &str = "https://api.twilio.com/2010-04-01";

/// Anything that can deliver a deal alert
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifierError>;
}

/// Notifier for sending deal alerts to configured targets
pub struct Notifier {
    client: reqwest::Client,
    targets: Vec<NotifyTarget>,
}

impl Notifier {
    /// Create a notifier for the given targets
    pub fn new(targets: Vec<NotifyTarget>) -> Self {
        Self {
            client: reqwest::Client::new(),
            targets,
        }
    }

    /// Send notification to a single target
    async fn notify_target(&self, target: &NotifyTarget, message: &str) -> Result<(), NotifierError> {
        match target {
            NotifyTarget::Log => {
                tracing::warn!("Deal alert: {}", message);
                Ok(())
            }
            NotifyTarget::Webhook { url, headers } => self.send_webhook(url, headers, message).await,
            NotifyTarget::Sms {
                account_sid,
                auth_token,
                from,
                to,
            } => self.send_sms(account_sid, auth_token, from, to, message).await,
        }
    }

    /// Send webhook notification
    async fn send_webhook(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        message: &str,
    ) -> Result<(), NotifierError> {
        let payload = serde_json::json!({
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let mut request = self.client.post(url).json(&payload);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| {
            NotifierError::Webhook(format!("Failed to send webhook: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(NotifierError::Webhook(format!(
                "Webhook returned status {}",
                response.status()
            )));
        }

        tracing::debug!(url = %url, "Webhook notification sent");

        Ok(())
    }

    /// Send an SMS through Twilio
    async fn send_sms(
        &self,
        account_sid: &str,
        auth_token: &str,
        from: &str,
        to: &str,
        message: &str,
    ) -> Result<(), NotifierError> {
        let url = format!("{}/Accounts/{}/Messages.json", TWILIO_API, account_sid);
        let form = [("From", from), ("To", to), ("Body", message)];

        let response = self
            .client
            .post(&url)
            .basic_auth(account_sid, Some(auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| NotifierError::Sms(format!("Failed to send SMS: {}", e)))?;

        if !response.status().is_success() {
            return Err(NotifierError::Sms(format!(
                "Twilio returned status {}",
                response.status()
            )));
        }

        tracing::debug!(to = %to, "SMS notification sent");

        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for Notifier {
    /// Send to every target, collecting failures
    async fn notify(&self, message: &str) -> Result<(), NotifierError> {
        let mut errors = Vec::new();

        for target in &self.targets {
            if let Err(e) = self.notify_target(target, message).await {
                errors.push(e);
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(NotifierError::Multiple(errors)),
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(vec![NotifyTarget::Log])
    }
}

/// Notifier errors
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("SMS error: {0}")]
    Sms(String),

    #[error("Multiple notification failures: {0:?}")]
    Multiple(Vec<NotifierError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notification() {
        let notifier = Notifier::default();

        // Log notification should always succeed
        let result = notifier.notify("outbound fare $99").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_webhook_reports_failure() {
        let notifier = Notifier::new(vec![
            NotifyTarget::Log,
            NotifyTarget::Webhook {
                url: "http://127.0.0.1:1/hook".to_string(),
                headers: HashMap::new(),
            },
        ]);

        let result = notifier.notify("outbound fare $99").await;
        assert!(matches!(result, Err(NotifierError::Webhook(_))));
    }

    #[tokio::test]
    async fn test_multiple_failures_are_collected() {
        let hook = |url: &str| NotifyTarget::Webhook {
            url: url.to_string(),
            headers: HashMap::new(),
        };
        let notifier = Notifier::new(vec![hook("http://127.0.0.1:1/a"), hook("http://127.0.0.1:1/b")]);

        match notifier.notify("return fare $120").await {
            Err(NotifierError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple failures, got {:?}", other),
        }
    }
}
