pub mod markup;
pub mod slide;
pub mod theme;

pub use markup::{parse_markup, strip_markup, Span, SpanKind};
pub use slide::{render_slide, BlockRole, LayoutMode, PresentationStyle, RenderedSlide, TextBlock};
pub use theme::{get_font_settings, get_theme, FontSettings, TextStyle, Theme};
