//! Playback analytics. Events are write-only and best-effort: a sink must
//! never block the caller or report failures back to it.

pub mod http;

use serde::Serialize;
use serde_json::Value;

use crate::models::AnalyticsContext;

pub use http::HttpAnalytics;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PlayStart,
    Progress,
    CtaClick,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PlayStart => "play_start",
            EventType::Progress => "progress",
            EventType::CtaClick => "cta_click",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub visitor_id: String,
    pub campaign_id: i64,
    pub variation_set_id: Option<i64>,
    pub event_type: EventType,
    pub event_data: Value,
}

impl AnalyticsEvent {
    pub fn new(context: &AnalyticsContext, event_type: EventType, event_data: Value) -> Self {
        Self {
            visitor_id: context.visitor_id.clone(),
            campaign_id: context.campaign_id,
            variation_set_id: context.variation_set_id,
            event_type,
            event_data,
        }
    }
}

pub trait AnalyticsSink: Send + Sync {
    /// Hands the event off and returns immediately.
    fn track(&self, event: AnalyticsEvent);
}

/// Sink that drops everything. Used when analytics are switched off.
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn track(&self, _event: AnalyticsEvent) {}
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_serializes_with_wire_names() {
        let context = AnalyticsContext {
            visitor_id: "v-1".into(),
            campaign_id: 7,
            variation_set_id: Some(3),
        };
        let event = AnalyticsEvent::new(&context, EventType::PlayStart, json!({ "moduleIndex": 0 }));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["visitorId"], "v-1");
        assert_eq!(value["campaignId"], 7);
        assert_eq!(value["variationSetId"], 3);
        assert_eq!(value["eventType"], "play_start");
        assert_eq!(value["eventData"]["moduleIndex"], 0);
    }

    #[test]
    fn event_type_names_match_serde() {
        for event_type in [EventType::PlayStart, EventType::Progress, EventType::CtaClick] {
            assert_eq!(
                serde_json::to_value(event_type).unwrap(),
                Value::String(event_type.as_str().into())
            );
        }
    }
}
