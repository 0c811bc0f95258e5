//! Timeline data models.
//!
//! A timeline is the ordered list of modules a funnel presentation plays
//! through. It is fetched once per playback session and never mutated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    AudioSlides,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::AudioSlides => "audio_slides",
            MediaKind::Video => "video",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: i64,
    pub name: String,
    pub media_type: MediaKind,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<u32>,
}

impl Variant {
    /// The one URL that matters for this variant's media kind.
    pub fn media_url(&self) -> Option<&str> {
        match self.media_type {
            MediaKind::AudioSlides => self.audio_url.as_deref(),
            MediaKind::Video => self.video_url.as_deref(),
        }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration.map(|secs| u64::from(secs) * 1000)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: i64,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub body_text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Offset from the start of the owning module's audio track.
    pub start_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntry {
    pub id: i64,
    pub name: String,
    pub order: i32,
    pub variant: Variant,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl ModuleEntry {
    pub fn media_kind(&self) -> MediaKind {
        self.variant.media_type
    }

    pub fn has_slide_sync(&self) -> bool {
        self.media_kind() == MediaKind::AudioSlides
    }

    pub fn slides_in_order(&self) -> bool {
        self.slides
            .windows(2)
            .all(|pair| pair[0].start_time_ms <= pair[1].start_time_ms)
    }
}

/// Ordered, read-only list of modules for one playback session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Timeline {
    modules: Vec<ModuleEntry>,
}

impl Timeline {
    /// Builds a timeline in play order: modules sorted by `order`, and each
    /// module's slides sorted by start offset. Both sorts are stable.
    pub fn new(mut modules: Vec<ModuleEntry>) -> Self {
        modules.sort_by_key(|module| module.order);
        for module in &mut modules {
            if !module.slides_in_order() {
                module.slides.sort_by_key(|slide| slide.start_time_ms);
            }
        }
        Self { modules }
    }

    pub fn modules(&self) -> &[ModuleEntry] {
        &self.modules
    }

    pub fn get(&self, index: usize) -> Option<&ModuleEntry> {
        self.modules.get(index)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn timeline_sorts_modules_by_order() {
        let timeline = Timeline::new(vec![
            audio_module(2, 5, 10, &[0]),
            video_module(1, 1, 10),
            audio_module(3, 9, 10, &[0]),
        ]);

        let ids: Vec<i64> = timeline.modules().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(timeline.get(2).map(|m| m.order), Some(9));
        assert!(timeline.get(3).is_none());
    }

    #[test]
    fn timeline_repairs_unordered_slides() {
        let timeline = Timeline::new(vec![audio_module(1, 0, 30, &[5000, 0, 12000])]);
        let starts: Vec<u64> = timeline.modules()[0]
            .slides
            .iter()
            .map(|s| s.start_time_ms)
            .collect();
        assert_eq!(starts, vec![0, 5000, 12000]);
    }

    #[test]
    fn variant_picks_url_by_media_kind() {
        let mut module = audio_module(1, 0, 30, &[0]);
        module.variant.video_url = Some("https://ignored".into());
        assert_eq!(
            module.variant.media_url(),
            Some("https://cdn.example.com/1.mp3")
        );

        module.variant.media_type = MediaKind::Video;
        assert_eq!(module.variant.media_url(), Some("https://ignored"));
        assert!(!module.has_slide_sync());
    }

    #[test]
    fn module_deserializes_from_camel_case() {
        let json = r#"{
            "id": 4, "name": "Intro", "order": 0,
            "variant": { "id": 40, "name": "B", "mediaType": "audio_slides",
                         "audioUrl": "https://a/b.mp3", "duration": 62 },
            "slides": [ { "id": 1, "headline": "Hi", "startTimeMs": 0 },
                        { "id": 2, "bodyText": "More", "startTimeMs": 4000 } ]
        }"#;

        let module: ModuleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(module.variant.media_type, MediaKind::AudioSlides);
        assert_eq!(module.variant.duration_ms(), Some(62_000));
        assert_eq!(module.slides[1].body_text.as_deref(), Some("More"));
        assert!(module.slides[1].headline.is_none());
    }
}
