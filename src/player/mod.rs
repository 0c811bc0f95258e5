pub mod controller;
pub mod cta;
pub mod slides;
pub mod state;

pub use controller::{CtaTarget, PlayerController, PlayerEvent, PlayerSnapshot, PlayerTiming};
pub use cta::CtaGate;
pub use slides::select_active_slide;
pub use state::{PlaybackState, PlaybackStatus};
