use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle, time::Instant};

use super::{MediaElement, MediaSource};

/// Media element without an output device. Its position follows the tokio
/// clock while playing and it reports an end once the source's duration has
/// elapsed. A source without a URL ends as soon as it is played.
#[derive(Clone)]
pub struct HeadlessMedia {
    inner: Arc<Mutex<HeadlessState>>,
    ended_tx: Arc<watch::Sender<u64>>,
}

#[derive(Default)]
struct HeadlessState {
    source: Option<MediaSource>,
    /// Position accumulated before the current play window.
    position_baseline_ms: u64,
    running_anchor: Option<Instant>,
    end_timer: Option<JoinHandle<()>>,
    /// Bumped on every source change so a stale end timer is ignored.
    generation: u64,
}

impl HeadlessState {
    fn duration_ms(&self) -> u64 {
        match &self.source {
            Some(source) if source.url.is_some() => source.duration_ms,
            _ => 0,
        }
    }

    fn position_ms(&self) -> u64 {
        let position = match self.running_anchor {
            Some(anchor) => self
                .position_baseline_ms
                .saturating_add(anchor.elapsed().as_millis() as u64),
            None => self.position_baseline_ms,
        };
        position.min(self.duration_ms())
    }

    fn halt(&mut self) {
        self.position_baseline_ms = self.position_ms();
        self.running_anchor = None;
        if let Some(timer) = self.end_timer.take() {
            timer.abort();
        }
    }
}

impl Default for HeadlessMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessMedia {
    pub fn new() -> Self {
        let (ended_tx, _) = watch::channel(0);
        Self {
            inner: Arc::new(Mutex::new(HeadlessState::default())),
            ended_tx: Arc::new(ended_tx),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.lock()
            .map(|state| state.running_anchor.is_some())
            .unwrap_or(false)
    }

    pub fn source(&self) -> Option<MediaSource> {
        self.lock().ok().and_then(|state| state.source.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HeadlessState>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("headless media state poisoned"))
    }
}

impl MediaElement for HeadlessMedia {
    fn set_source(&self, source: MediaSource) {
        if let Ok(mut state) = self.lock() {
            state.halt();
            state.generation = state.generation.wrapping_add(1);
            state.position_baseline_ms = 0;
            state.source = Some(source);
        }
    }

    fn play(&self) -> Result<()> {
        let runtime = Handle::try_current().map_err(|_| anyhow!("playback needs an async runtime"))?;
        let mut state = self.lock()?;
        if state.source.is_none() {
            bail!("no media source set");
        }
        if state.running_anchor.is_some() {
            return Ok(());
        }

        let remaining_ms = state.duration_ms().saturating_sub(state.position_baseline_ms);
        let generation = state.generation;
        state.running_anchor = Some(Instant::now());

        let inner = Arc::clone(&self.inner);
        let ended_tx = Arc::clone(&self.ended_tx);
        state.end_timer = Some(runtime.spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(remaining_ms)).await;
            let finished = match inner.lock() {
                Ok(mut state) if state.generation == generation => {
                    state.position_baseline_ms = state.duration_ms();
                    state.running_anchor = None;
                    state.end_timer = None;
                    true
                }
                _ => false,
            };
            if finished {
                ended_tx.send_modify(|count| *count = count.wrapping_add(1));
            }
        }));
        Ok(())
    }

    fn pause(&self) {
        if let Ok(mut state) = self.lock() {
            state.halt();
        }
    }

    fn current_time_ms(&self) -> u64 {
        self.lock().map(|state| state.position_ms()).unwrap_or(0)
    }

    fn ended(&self) -> watch::Receiver<u64> {
        self.ended_tx.subscribe()
    }
}
