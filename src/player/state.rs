use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Slide;

use super::cta::CtaGate;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    #[default]
    NotStarted,
    Playing,
    /// The last module's media finished. Timers keep running.
    Ended,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// Only ever moves forward within a session.
    pub module_index: usize,
    pub active_slide: Option<Slide>,
    pub cta: CtaGate,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.status != PlaybackStatus::NotStarted
    }

    pub fn begin_session(
        &mut self,
        session_id: String,
        cta_threshold_secs: Option<u32>,
        started_at: DateTime<Utc>,
    ) {
        *self = Self {
            status: PlaybackStatus::Playing,
            session_id: Some(session_id),
            started_at: Some(started_at),
            module_index: 0,
            active_slide: None,
            cta: CtaGate::new(cta_threshold_secs),
        };
    }

    /// Moves to `index` if that is forward of the current module.
    pub fn advance_to(&mut self, index: usize) -> bool {
        if self.status != PlaybackStatus::Playing || index <= self.module_index {
            return false;
        }
        self.module_index = index;
        self.active_slide = None;
        true
    }

    pub fn finish(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Ended;
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.cta.elapsed_secs()
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}
