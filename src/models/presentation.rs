use serde::{Deserialize, Serialize};

use super::timeline::{ModuleEntry, Timeline};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    pub slug: String,
    /// Seconds of watching before the call-to-action shows.
    #[serde(default)]
    pub cta_appear_time: Option<u32>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_url: Option<String>,
}

/// Per-campaign font overrides. Anything left out falls back to the preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FontOverrides {
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub headline_font: Option<String>,
    #[serde(default)]
    pub body_font: Option<String>,
    #[serde(default)]
    pub headline_size: Option<u16>,
    #[serde(default)]
    pub body_size: Option<u16>,
    #[serde(default)]
    pub headline_weight: Option<u16>,
    #[serde(default)]
    pub body_weight: Option<u16>,
    #[serde(default)]
    pub headline_color: Option<String>,
    #[serde(default)]
    pub body_color: Option<String>,
}

/// Response body of the presentation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationPayload {
    pub campaign: Campaign,
    pub visitor_id: String,
    #[serde(default)]
    pub variation_set_id: Option<i64>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub font_settings: FontOverrides,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

/// Identifiers stamped on every analytics event. Opaque to the player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsContext {
    pub visitor_id: String,
    pub campaign_id: i64,
    pub variation_set_id: Option<i64>,
}

/// Everything one playback session needs, in play order.
#[derive(Debug, Clone)]
pub struct PresentationBundle {
    pub campaign: Campaign,
    pub analytics: AnalyticsContext,
    pub theme: String,
    pub fonts: FontOverrides,
    pub timeline: Timeline,
}

impl From<PresentationPayload> for PresentationBundle {
    fn from(payload: PresentationPayload) -> Self {
        Self {
            analytics: AnalyticsContext {
                visitor_id: payload.visitor_id,
                campaign_id: payload.campaign.id,
                variation_set_id: payload.variation_set_id,
            },
            campaign: payload.campaign,
            theme: payload.theme.unwrap_or_else(|| "default".into()),
            fonts: payload.font_settings,
            timeline: Timeline::new(payload.modules),
        }
    }
}

impl PresentationBundle {
    pub fn cta_threshold_secs(&self) -> Option<u32> {
        self.campaign.cta_appear_time
    }
}
