pub mod headless;

use anyhow::Result;
use tokio::sync::watch;

use crate::models::{MediaKind, ModuleEntry};

pub use headless::HeadlessMedia;

/// What a media element is asked to play for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub kind: MediaKind,
    pub url: Option<String>,
    pub duration_ms: u64,
}

impl MediaSource {
    /// Uses the variant's duration when known. Otherwise audio lingers
    /// `fallback_linger_ms` past its last slide and video plays for
    /// `fallback_linger_ms`.
    pub fn for_module(module: &ModuleEntry, fallback_linger_ms: u64) -> Self {
        let duration_ms = module.variant.duration_ms().unwrap_or_else(|| {
            let last_slide_ms = if module.has_slide_sync() {
                module.slides.last().map_or(0, |slide| slide.start_time_ms)
            } else {
                0
            };
            last_slide_ms.saturating_add(fallback_linger_ms)
        });

        Self {
            kind: module.media_kind(),
            url: module.variant.media_url().map(str::to_string),
            duration_ms,
        }
    }
}

/// A single playable element (an audio tag or an embedded video player).
///
/// `ended` yields a counter that increases each time the current source
/// reaches its natural end. Pausing or swapping the source never bumps it.
pub trait MediaElement: Send + Sync {
    fn set_source(&self, source: MediaSource);
    fn play(&self) -> Result<()>;
    fn pause(&self);
    fn current_time_ms(&self) -> u64;
    fn ended(&self) -> watch::Receiver<u64>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timeline::fixtures::{audio_module, video_module};

    #[test]
    fn source_uses_variant_duration() {
        let source = MediaSource::for_module(&audio_module(1, 0, 42, &[0, 1000]), 10_000);
        assert_eq!(source.duration_ms, 42_000);
        assert_eq!(source.kind, MediaKind::AudioSlides);
        assert_eq!(source.url.as_deref(), Some("https://cdn.example.com/1.mp3"));
    }

    #[test]
    fn missing_duration_lingers_after_last_slide() {
        let mut module = audio_module(1, 0, 0, &[0, 8000]);
        module.variant.duration = None;
        assert_eq!(MediaSource::for_module(&module, 5000).duration_ms, 13_000);

        let mut video = video_module(2, 1, 0);
        video.variant.duration = None;
        assert_eq!(MediaSource::for_module(&video, 5000).duration_ms, 5000);
    }
}
