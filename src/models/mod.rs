pub mod presentation;
pub mod timeline;

pub use presentation::{
    AnalyticsContext, Campaign, FontOverrides, PresentationBundle, PresentationPayload,
};
pub use timeline::{MediaKind, ModuleEntry, Slide, Timeline, Variant};
