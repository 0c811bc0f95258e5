//! One-shot fetch of a campaign's presentation bundle.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};

use crate::models::{PresentationBundle, PresentationPayload};
use crate::settings::PlayerSettings;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Why a presentation cannot be shown. Only used for logging; the viewer
/// sees the same "not available" state for all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    Transport(String),
    Status(u16),
    Malformed(String),
    EmptyTimeline,
}

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailable::Transport(err) => write!(f, "request failed: {err}"),
            Unavailable::Status(code) => write!(f, "server answered HTTP {code}"),
            Unavailable::Malformed(err) => write!(f, "malformed presentation: {err}"),
            Unavailable::EmptyTimeline => write!(f, "presentation has no modules"),
        }
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    Available(PresentationBundle),
    NotAvailable(Unavailable),
}

pub struct TimelineLoader {
    client: Client,
    settings: PlayerSettings,
}

impl TimelineLoader {
    /// The client keeps cookies so the server can tie the visitor id to the
    /// browser-style session.
    pub fn new(settings: PlayerSettings) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build presentation http client")?;
        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: Client, settings: PlayerSettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Single request, no retry. Every failure maps to `NotAvailable`.
    pub async fn load(&self, slug: &str) -> LoadOutcome {
        let url = self.settings.presentation_url(slug);
        log_info!("loading presentation for '{slug}' from {url}");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => return not_available(slug, Unavailable::Transport(err.to_string())),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return not_available(slug, Unavailable::Transport(err.to_string())),
        };

        match decode_presentation(status, &body) {
            LoadOutcome::NotAvailable(reason) => not_available(slug, reason),
            available => available,
        }
    }
}

/// Turns a raw response into an outcome.
pub fn decode_presentation(status: StatusCode, body: &str) -> LoadOutcome {
    if !status.is_success() {
        return LoadOutcome::NotAvailable(Unavailable::Status(status.as_u16()));
    }

    let payload: PresentationPayload = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(err) => return LoadOutcome::NotAvailable(Unavailable::Malformed(err.to_string())),
    };

    for module in &payload.modules {
        if module.variant.media_url().is_none() {
            log_warn!(
                "module {} ({}) has no {} url; it will end immediately",
                module.id,
                module.name,
                module.variant.media_type.as_str()
            );
        }
        if !module.slides_in_order() {
            log_warn!("module {} slides are out of order; sorting by start time", module.id);
        }
    }

    let bundle = PresentationBundle::from(payload);
    if bundle.timeline.is_empty() {
        return LoadOutcome::NotAvailable(Unavailable::EmptyTimeline);
    }
    LoadOutcome::Available(bundle)
}

fn not_available(slug: &str, reason: Unavailable) -> LoadOutcome {
    log_warn!("presentation '{slug}' not available: {reason}");
    LoadOutcome::NotAvailable(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http_stub::serve_once;

    const BODY: &str = r#"{
        "campaign": { "id": 7, "slug": "launch", "ctaAppearTime": 45,
                      "ctaText": "Join the challenge", "ctaUrl": "https://example.com/join" },
        "visitorId": "visitor-abc",
        "variationSetId": 3,
        "theme": "midnight",
        "fontSettings": { "preset": "bold", "bodySize": 28 },
        "modules": [
            { "id": 2, "name": "Pitch", "order": 1,
              "variant": { "id": 20, "name": "B", "mediaType": "video",
                           "videoUrl": "https://video.example.com/embed/2" },
              "slides": [] },
            { "id": 1, "name": "Intro", "order": 0,
              "variant": { "id": 10, "name": "A", "mediaType": "audio_slides",
                           "audioUrl": "https://cdn.example.com/intro.mp3", "duration": 20 },
              "slides": [ { "id": 11, "headline": "Welcome", "startTimeMs": 0 },
                          { "id": 12, "bodyText": "Day one", "startTimeMs": 5000 } ] }
        ]
    }"#;

    #[test]
    fn decodes_bundle_in_play_order() {
        let LoadOutcome::Available(bundle) = decode_presentation(StatusCode::OK, BODY) else {
            panic!("expected an available presentation");
        };

        assert_eq!(bundle.theme, "midnight");
        assert_eq!(bundle.cta_threshold_secs(), Some(45));
        assert_eq!(bundle.analytics.visitor_id, "visitor-abc");
        assert_eq!(bundle.analytics.campaign_id, 7);
        assert_eq!(bundle.analytics.variation_set_id, Some(3));
        assert_eq!(bundle.fonts.body_size, Some(28));

        let names: Vec<&str> = bundle
            .timeline
            .modules()
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Intro", "Pitch"]);
    }

    #[test]
    fn error_status_is_not_available() {
        let outcome = decode_presentation(StatusCode::NOT_FOUND, "{}");
        assert!(matches!(
            outcome,
            LoadOutcome::NotAvailable(Unavailable::Status(404))
        ));
    }

    #[test]
    fn empty_timeline_is_not_available() {
        let body = r#"{ "campaign": { "id": 1, "slug": "x" }, "visitorId": "v", "modules": [] }"#;
        let outcome = decode_presentation(StatusCode::OK, body);
        assert!(matches!(
            outcome,
            LoadOutcome::NotAvailable(Unavailable::EmptyTimeline)
        ));
    }

    #[test]
    fn garbage_body_is_not_available() {
        let outcome = decode_presentation(StatusCode::OK, "<html>oops</html>");
        assert!(matches!(outcome, LoadOutcome::NotAvailable(Unavailable::Malformed(_))));
    }

    #[test]
    fn missing_theme_defaults() {
        let body = r#"{ "campaign": { "id": 1, "slug": "x" }, "visitorId": "v",
            "modules": [ { "id": 1, "name": "m", "order": 0,
              "variant": { "id": 1, "name": "a", "mediaType": "audio_slides" } } ] }"#;
        let LoadOutcome::Available(bundle) = decode_presentation(StatusCode::OK, body) else {
            panic!("expected an available presentation");
        };
        assert_eq!(bundle.theme, "default");
        assert!(bundle.cta_threshold_secs().is_none());
    }

    fn loader_for(base_url: String) -> TimelineLoader {
        TimelineLoader::new(PlayerSettings {
            api_base_url: base_url,
            request_timeout_secs: 5,
            ..PlayerSettings::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn load_fetches_slug_path_and_decodes() {
        let (base_url, server) = serve_once("200 OK", BODY).await;
        let outcome = loader_for(base_url).load("launch").await;

        let request = server.await.unwrap();
        assert!(request
            .request_line
            .starts_with("GET /api/funnels/launch/presentation "));
        let LoadOutcome::Available(bundle) = outcome else {
            panic!("expected an available presentation, got {outcome:?}");
        };
        assert_eq!(bundle.campaign.slug, "launch");
        assert_eq!(bundle.timeline.len(), 2);
    }

    #[tokio::test]
    async fn load_maps_server_error_to_not_available() {
        let (base_url, server) = serve_once("500 Internal Server Error", BODY).await;
        let outcome = loader_for(base_url).load("launch").await;

        server.await.unwrap();
        assert!(matches!(
            outcome,
            LoadOutcome::NotAvailable(Unavailable::Status(500))
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_not_available() {
        let settings = PlayerSettings {
            api_base_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 2,
            ..PlayerSettings::default()
        };
        let loader = TimelineLoader::new(settings).unwrap();
        let outcome = loader.load("launch").await;
        assert!(matches!(outcome, LoadOutcome::NotAvailable(Unavailable::Transport(_))));
    }
}
