use crate::models::Slide;

/// The slide showing at `position_ms`: the last one whose start is not after
/// the position. Before the first start the first slide shows; an empty list
/// shows nothing. Expects starts in non-decreasing order.
pub fn select_active_slide(slides: &[Slide], position_ms: u64) -> Option<&Slide> {
    slides
        .iter()
        .take_while(|slide| slide.start_time_ms <= position_ms)
        .last()
        .or_else(|| slides.first())
}
