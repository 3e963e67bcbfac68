use crate::domain::{Annotation, BoundingRect};

/// Side effects the reducer schedules; the runtime executes them in
/// order after the state transition.
#[derive(Debug, Clone)]
pub enum Command {
    /// Write-through persistence of the full collection.
    PersistAnnotations,
    /// Position the grab-mode highlight (created lazily by the overlay).
    ShowHighlight(BoundingRect),
    /// Remove the highlight unconditionally.
    ClearHighlight,
    /// Fire the host's creation callback.
    NotifyCreated(Annotation),
    /// Fire the host's update callback.
    NotifyUpdated(Annotation),
}
