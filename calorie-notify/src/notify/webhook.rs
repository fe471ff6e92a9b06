//! Fire-and-forget webhook forwarding.
//!
//! The POST is built on the request path but sent from a detached task. Its
//! completion is only logged; the submission never waits on the remote end.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::i18n::Catalog;
use crate::profile::CanonicalProfile;
use crate::settings::NotificationConfig;

/// Flat record posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookRecord {
    pub email: String,
    pub age: String,
    pub sex: String,
    pub weight: String,
    pub result: String,
    pub goal: String,
    pub activity: String,
}

impl WebhookRecord {
    pub fn new(email: &str, result: &str, profile: &CanonicalProfile) -> Self {
        Self {
            email: email.to_string(),
            age: profile.age.clone(),
            sex: profile.gender.clone(),
            weight: profile.weight.clone(),
            result: result.to_string(),
            goal: profile.goal.clone(),
            activity: profile.activity.clone(),
        }
    }
}

/// What happened when forwarding was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    NotEnabled,
    UrlMissing,
    /// The request could not be handed to the transport.
    TransportFault(String),
    /// The request was handed to a detached task.
    Dispatched,
}

impl WebhookOutcome {
    /// Report value for this outcome, with status strings localized.
    pub fn to_status(&self, catalog: &Catalog) -> WebhookStatus {
        match self {
            WebhookOutcome::NotEnabled => {
                WebhookStatus::Message(catalog.tr("Zapier is not enabled!").to_string())
            }
            WebhookOutcome::UrlMissing => {
                WebhookStatus::Message(catalog.tr("Zapier Webhook is missing!").to_string())
            }
            WebhookOutcome::TransportFault(message) => WebhookStatus::Message(message.clone()),
            WebhookOutcome::Dispatched => WebhookStatus::Dispatched { dispatched: true },
        }
    }
}

/// Serialized form of a [`WebhookOutcome`] in the delivery report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WebhookStatus {
    Message(String),
    Dispatched { dispatched: bool },
}

/// Posts [`WebhookRecord`]s to the operator's webhook.
#[derive(Debug, Clone)]
pub struct WebhookForwarder {
    client: Client,
    timeout: Duration,
}

impl WebhookForwarder {
    /// `timeout` bounds the detached request, not the caller.
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Forward `record` if the webhook is enabled and configured.
    ///
    /// Never blocks on the network and never fails: every problem is folded
    /// into the returned outcome.
    pub fn forward(&self, config: &NotificationConfig, record: &WebhookRecord) -> WebhookOutcome {
        if !config.webhook_enabled() {
            info!(enabled_flag = %config.webhook_enabled, "zapier_not_enabled");
            return WebhookOutcome::NotEnabled;
        }

        if config.webhook_url.is_empty() {
            warn!("zapier_url_missing");
            return WebhookOutcome::UrlMissing;
        }

        let body = match serde_json::to_vec(record) {
            Ok(body) => body,
            Err(e) => return WebhookOutcome::TransportFault(e.to_string()),
        };

        let request = match self
            .client
            .post(config.webhook_url.as_str())
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
        {
            Ok(request) => request,
            Err(e) => {
                warn!(url = %config.webhook_url, error = %e, "zapier_request_build_failed");
                return WebhookOutcome::TransportFault(e.to_string());
            }
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "zapier_no_runtime");
                return WebhookOutcome::TransportFault(e.to_string());
            }
        };

        let client = self.client.clone();
        let url = config.webhook_url.clone();

        runtime.spawn(async move {
            match client.execute(request).await {
                Ok(resp) => {
                    info!(url = %url, status_code = resp.status().as_u16(), "zapier_delivery_complete")
                }
                Err(e) if e.is_timeout() => {
                    warn!(url = %url, error = %e, "zapier_delivery_timeout")
                }
                Err(e) => warn!(url = %url, error = %e, "zapier_delivery_failed"),
            }
        });

        info!(url = %config.webhook_url, email = %record.email, "zapier_dispatched");

        WebhookOutcome::Dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UnitSystem;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record() -> WebhookRecord {
        let profile = CanonicalProfile {
            gender: "Male".to_string(),
            goal: "Weight Loss".to_string(),
            activity: "Moderate".to_string(),
            age: "30".to_string(),
            unit_system: UnitSystem::Metric,
            height: "180cm".to_string(),
            weight: "80kg".to_string(),
        };
        WebhookRecord::new("a@b.com", "2000 kcal", &profile)
    }

    fn config(enabled: &str, url: &str) -> NotificationConfig {
        NotificationConfig {
            notification_email: "admin@example.com".to_string(),
            webhook_url: url.to_string(),
            webhook_enabled: enabled.to_string(),
        }
    }

    fn forwarder() -> WebhookForwarder {
        WebhookForwarder::new(Client::new(), Duration::from_secs(5))
    }

    async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<wiremock::Request> {
        for _ in 0..100 {
            let received = server.received_requests().await.unwrap_or_default();
            if received.len() >= count {
                return received;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        server.received_requests().await.unwrap_or_default()
    }

    #[test]
    fn test_record_serialization_keys() {
        let json = serde_json::to_value(record()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "email": "a@b.com",
                "age": "30",
                "sex": "Male",
                "weight": "80kg",
                "result": "2000 kcal",
                "goal": "Weight Loss",
                "activity": "Moderate",
            })
        );
    }

    #[tokio::test]
    async fn test_not_enabled_makes_no_request() {
        let server = MockServer::start().await;

        for flag in ["", "false", "1", "TRUE", "yes"] {
            let outcome = forwarder().forward(&config(flag, &server.uri()), &record());
            assert_eq!(outcome, WebhookOutcome::NotEnabled);
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enabled_without_url() {
        let outcome = forwarder().forward(&config("true", ""), &record());
        assert_eq!(outcome, WebhookOutcome::UrlMissing);
    }

    #[tokio::test]
    async fn test_enabled_posts_record_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks/catch/1"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = format!("{}/hooks/catch/1", server.uri());
        let outcome = forwarder().forward(&config("true", &url), &record());

        assert_eq!(outcome, WebhookOutcome::Dispatched);

        let received = wait_for_requests(&server, 1).await;
        assert_eq!(received.len(), 1);

        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        for key in ["email", "age", "sex", "weight", "result", "goal", "activity"] {
            assert!(body.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(body["sex"], "Male");
    }

    #[tokio::test]
    async fn test_forward_does_not_wait_for_slow_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let started = std::time::Instant::now();
        let outcome = forwarder().forward(&config("true", &server.uri()), &record());

        assert_eq!(outcome, WebhookOutcome::Dispatched);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_still_dispatched() {
        let outcome = forwarder().forward(&config("true", "http://127.0.0.1:9/hook"), &record());
        assert_eq!(outcome, WebhookOutcome::Dispatched);
    }

    #[tokio::test]
    async fn test_invalid_url_is_transport_fault() {
        let outcome = forwarder().forward(&config("true", "not a url"), &record());
        assert!(matches!(outcome, WebhookOutcome::TransportFault(ref msg) if !msg.is_empty()));
    }

    #[test]
    fn test_forward_outside_runtime_is_transport_fault() {
        let outcome = forwarder().forward(&config("true", "http://127.0.0.1:9/hook"), &record());
        assert!(matches!(outcome, WebhookOutcome::TransportFault(_)));
    }

    #[test]
    fn test_status_serialization() {
        let catalog = Catalog::identity();

        assert_eq!(
            serde_json::to_value(WebhookOutcome::NotEnabled.to_status(&catalog)).unwrap(),
            serde_json::json!("Zapier is not enabled!")
        );
        assert_eq!(
            serde_json::to_value(WebhookOutcome::UrlMissing.to_status(&catalog)).unwrap(),
            serde_json::json!("Zapier Webhook is missing!")
        );
        assert_eq!(
            serde_json::to_value(WebhookOutcome::Dispatched.to_status(&catalog)).unwrap(),
            serde_json::json!({"dispatched": true})
        );
    }
}
