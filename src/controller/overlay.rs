use crate::domain::BoundingRect;

/// The visual highlight shown over the hovered element while grabbing.
///
/// Implementations own the single overlay resource: `show` creates it
/// lazily and repositions it on every call, `clear` removes it. At most
/// one overlay exists at any time.
pub trait HighlightOverlay {
    fn show(&mut self, rect: &BoundingRect);
    fn clear(&mut self);
}

/// Overlay for hosts without a visual surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOverlay;

impl HighlightOverlay for NoopOverlay {
    fn show(&mut self, _rect: &BoundingRect) {}
    fn clear(&mut self) {}
}
