use reqwest::Client;
use tokio::runtime::Handle;

use super::{AnalyticsEvent, AnalyticsSink};

// Set to true to see every dropped analytics post
const ENABLE_LOGS: bool = false;

use crate::{log_debug, log_warn};

/// Posts events to the analytics endpoint from detached tasks. Responses and
/// failures are discarded.
#[derive(Clone)]
pub struct HttpAnalytics {
    client: Client,
    endpoint: String,
}

impl HttpAnalytics {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl AnalyticsSink for HttpAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        let Ok(runtime) = Handle::try_current() else {
            log_warn!("no async runtime, dropping {} event", event.event_type.as_str());
            return;
        };

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        runtime.spawn(async move {
            let event_type = event.event_type.as_str();
            match client.post(&endpoint).json(&event).send().await {
                Ok(response) if !response.status().is_success() => {
                    log_debug!("analytics {event_type} rejected: HTTP {}", response.status());
                }
                Ok(_) => {}
                Err(err) => log_debug!("analytics {event_type} failed: {err}"),
            }
        });
    }
}
