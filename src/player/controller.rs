use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tokio::{
    sync::{broadcast, watch, Mutex},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    analytics::{AnalyticsEvent, AnalyticsSink, EventType},
    media::{MediaElement, MediaSource},
    models::{MediaKind, PresentationBundle, Slide},
    settings::PlayerSettings,
};

use super::{select_active_slide, PlaybackState, PlaybackStatus};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Elapsed time and the CTA threshold are whole wall-clock seconds.
const ELAPSED_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerTiming {
    pub slide_poll: Duration,
    pub heartbeat: Duration,
    pub fallback_linger_ms: u64,
}

impl Default for PlayerTiming {
    fn default() -> Self {
        Self::from(&PlayerSettings::default())
    }
}

impl From<&PlayerSettings> for PlayerTiming {
    fn from(settings: &PlayerSettings) -> Self {
        Self {
            slide_poll: settings.slide_poll_interval(),
            heartbeat: settings.heartbeat_interval(),
            fallback_linger_ms: settings.fallback_linger_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    #[serde(rename_all = "camelCase")]
    ModuleStarted {
        index: usize,
        module_id: i64,
        name: String,
        kind: MediaKind,
    },
    #[serde(rename_all = "camelCase")]
    SlideChanged {
        module_index: usize,
        slide: Option<Slide>,
    },
    #[serde(rename_all = "camelCase")]
    CtaShown { elapsed_secs: u64 },
    #[serde(rename_all = "camelCase")]
    TimelineFinished { module_index: usize },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub position_ms: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CtaTarget {
    pub text: Option<String>,
    pub url: Option<String>,
}

struct PlaybackTasks {
    cancel_token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

/// Drives one playback session over a single media element.
///
/// Modules advance only when the media reports a natural end. Three periodic
/// tasks (slide poll, elapsed tick, analytics heartbeat) and the end listener
/// share one cancellation token and stop together.
#[derive(Clone)]
pub struct PlayerController {
    state: Arc<Mutex<PlaybackState>>,
    bundle: Arc<PresentationBundle>,
    media: Arc<dyn MediaElement>,
    analytics: Arc<dyn AnalyticsSink>,
    events_tx: broadcast::Sender<PlayerEvent>,
    tasks: Arc<Mutex<Option<PlaybackTasks>>>,
    timing: PlayerTiming,
}

impl PlayerController {
    pub fn new(
        bundle: PresentationBundle,
        media: Arc<dyn MediaElement>,
        analytics: Arc<dyn AnalyticsSink>,
        timing: PlayerTiming,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(PlaybackState::new())),
            bundle: Arc::new(bundle),
            media,
            analytics,
            events_tx,
            tasks: Arc::new(Mutex::new(None)),
            timing,
        }
    }

    pub fn bundle(&self) -> &PresentationBundle {
        &self.bundle
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events_tx.subscribe()
    }

    pub async fn get_state(&self) -> PlaybackState {
        self.state.lock().await.clone()
    }

    pub async fn get_snapshot(&self) -> PlayerSnapshot {
        let state = self.state.lock().await;
        PlayerSnapshot {
            position_ms: self.media.current_time_ms(),
            state: state.clone(),
        }
    }

    /// The viewer's explicit "start" action. Never called automatically.
    pub async fn start(&self) -> Result<PlaybackState> {
        if self.bundle.timeline.is_empty() {
            bail!("presentation has no modules");
        }

        // Subscribe before the first source loads so an instant end is seen.
        let ended_rx = self.media.ended();

        let session_id = Uuid::new_v4().to_string();
        let snapshot = {
            let mut state = self.state.lock().await;
            if state.is_active() {
                bail!("playback already started");
            }
            state.begin_session(
                session_id.clone(),
                self.bundle.cta_threshold_secs(),
                Utc::now(),
            );
            let cta_now_visible = state.cta.evaluate();

            self.track(
                EventType::PlayStart,
                json!({ "sessionId": session_id, "moduleIndex": 0 }),
            );
            self.load_module(&mut state, 0);
            self.refresh_slide(&mut state);
            if cta_now_visible {
                self.emit(PlayerEvent::CtaShown { elapsed_secs: 0 });
            }
            state.clone()
        };

        log_info!(
            "playback session {session_id} started for campaign '{}' ({} modules)",
            self.bundle.campaign.slug,
            self.bundle.timeline.len()
        );

        self.spawn_tasks(ended_rx).await;
        Ok(snapshot)
    }

    /// Leaves the presentation: stops every timer and forgets the session.
    pub async fn stop(&self) {
        self.cancel_tasks().await;
        self.media.pause();

        let mut state = self.state.lock().await;
        if let Some(session_id) = state.session_id.as_deref() {
            log_info!(
                "playback session {session_id} stopped after {}s",
                state.elapsed_secs()
            );
        }
        state.cancel();
    }

    /// The viewer clicked the call-to-action. Only possible while it shows.
    pub async fn click_cta(&self) -> Result<CtaTarget> {
        let state = self.state.lock().await;
        if !state.is_active() {
            bail!("playback not started");
        }
        if !state.cta.is_visible() {
            bail!("call-to-action is not visible yet");
        }

        self.track(
            EventType::CtaClick,
            json!({
                "sessionId": state.session_id,
                "elapsedSeconds": state.elapsed_secs(),
                "moduleIndex": state.module_index,
            }),
        );

        Ok(CtaTarget {
            text: self.bundle.campaign.cta_text.clone(),
            url: self.bundle.campaign.cta_url.clone(),
        })
    }

    /// Swaps the media source to module `index` and plays it. Called with the
    /// state lock held so the module index and source change together.
    fn load_module(&self, state: &mut PlaybackState, index: usize) {
        let Some(module) = self.bundle.timeline.get(index) else {
            return;
        };

        self.media
            .set_source(MediaSource::for_module(module, self.timing.fallback_linger_ms));
        if let Err(err) = self.media.play() {
            log_warn!("module {index} ({}) failed to play: {err:#}", module.name);
        }

        log_info!(
            "module {index} '{}' started ({})",
            module.name,
            module.media_kind().as_str()
        );
        self.emit(PlayerEvent::ModuleStarted {
            index,
            module_id: module.id,
            name: module.name.clone(),
            kind: module.media_kind(),
        });
        state.active_slide = None;
    }

    /// Recomputes the active slide from the media position against the
    /// current module's own slides. Video modules have no slide.
    fn refresh_slide(&self, state: &mut PlaybackState) {
        let Some(module) = self.bundle.timeline.get(state.module_index) else {
            return;
        };

        let next = if module.has_slide_sync() {
            select_active_slide(&module.slides, self.media.current_time_ms()).cloned()
        } else {
            None
        };

        let changed = match (&state.active_slide, &next) {
            (Some(current), Some(candidate)) => current.id != candidate.id,
            (None, None) => false,
            _ => true,
        };
        if changed {
            state.active_slide = next.clone();
            self.emit(PlayerEvent::SlideChanged {
                module_index: state.module_index,
                slide: next,
            });
        }
    }

    /// Returns false once the session is gone.
    async fn on_media_ended(&self) -> bool {
        let mut state = self.state.lock().await;
        if !state.is_active() {
            return false;
        }
        if state.status != PlaybackStatus::Playing {
            return true;
        }

        let next = state.module_index + 1;
        if next >= self.bundle.timeline.len() {
            state.finish();
            log_info!("timeline finished at module {}", state.module_index);
            self.emit(PlayerEvent::TimelineFinished {
                module_index: state.module_index,
            });
            return true;
        }

        if state.advance_to(next) {
            self.load_module(&mut state, next);
            self.refresh_slide(&mut state);
        }
        true
    }

    async fn on_slide_poll(&self) -> bool {
        let mut state = self.state.lock().await;
        if !state.is_active() {
            return false;
        }
        self.refresh_slide(&mut state);
        true
    }

    /// One second of watching. Returns false once the session is gone.
    async fn on_elapsed_tick(&self) -> bool {
        let mut state = self.state.lock().await;
        if !state.is_active() {
            return false;
        }
        if state.cta.tick() {
            let elapsed_secs = state.elapsed_secs();
            log_info!("call-to-action shown after {elapsed_secs}s");
            self.emit(PlayerEvent::CtaShown { elapsed_secs });
        }
        true
    }

    async fn on_heartbeat(&self) -> bool {
        let state = self.state.lock().await;
        if !state.is_active() {
            return false;
        }
        self.track(
            EventType::Progress,
            json!({
                "sessionId": state.session_id,
                "elapsedSeconds": state.elapsed_secs(),
                "moduleIndex": state.module_index,
            }),
        );
        true
    }

    async fn spawn_tasks(&self, mut ended_rx: watch::Receiver<u64>) {
        let mut tasks_guard = self.tasks.lock().await;
        if let Some(previous) = tasks_guard.take() {
            previous.cancel_token.cancel();
            for handle in previous.handles {
                handle.abort();
            }
        }
        // A `stop()` on another handle may have ended the session already.
        if !self.state.lock().await.is_active() {
            return;
        }

        let cancel_token = CancellationToken::new();
        let mut handles = Vec::with_capacity(4);

        let controller = self.clone();
        let token = cancel_token.clone();
        handles.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = ended_rx.changed() => {
                        if changed.is_err() || !controller.on_media_ended().await {
                            break;
                        }
                    }
                    _ = token.cancelled() => break,
                }
            }
        }));

        let controller = self.clone();
        let token = cancel_token.clone();
        let slide_poll = self.timing.slide_poll;
        handles.push(tokio::spawn(async move {
            let mut ticker = time::interval(slide_poll);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !controller.on_slide_poll().await {
                            break;
                        }
                    }
                    _ = token.cancelled() => break,
                }
            }
        }));

        let controller = self.clone();
        let token = cancel_token.clone();
        handles.push(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + ELAPSED_TICK, ELAPSED_TICK);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !controller.on_elapsed_tick().await {
                            break;
                        }
                    }
                    _ = token.cancelled() => break,
                }
            }
        }));

        let controller = self.clone();
        let token = cancel_token.clone();
        let heartbeat = self.timing.heartbeat;
        handles.push(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + heartbeat, heartbeat);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !controller.on_heartbeat().await {
                            break;
                        }
                    }
                    _ = token.cancelled() => break,
                }
            }
        }));

        *tasks_guard = Some(PlaybackTasks {
            cancel_token,
            handles,
        });
    }

    async fn cancel_tasks(&self) {
        if let Some(tasks) = self.tasks.lock().await.take() {
            tasks.cancel_token.cancel();
            for handle in tasks.handles {
                handle.abort();
            }
        }
    }

    fn track(&self, event_type: EventType, event_data: serde_json::Value) {
        self.analytics
            .track(AnalyticsEvent::new(&self.bundle.analytics, event_type, event_data));
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events_tx.send(event);
    }
}
