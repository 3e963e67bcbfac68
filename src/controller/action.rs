use crate::domain::{Annotation, AnnotationId, AnnotationPatch};

/// Every way the widget state can change. Transitions are total: any
/// action is legal in any state.
#[derive(Debug)]
pub enum Action<N> {
    Enable,
    Disable,
    ToggleGrab,
    TogglePanel,
    SetHovered(Option<N>),
    /// Selecting always exits grab mode.
    SetSelected(Option<N>),
    /// Bulk replace; used only for the initial load from storage.
    SetAnnotations(Vec<Annotation>),
    /// The annotation arrives fully stamped (id, timestamps).
    AddAnnotation(Annotation),
    UpdateAnnotation {
        id: AnnotationId,
        patch: AnnotationPatch,
        /// Stamped by the caller so the reducer stays pure.
        updated_at: i64,
    },
    DeleteAnnotation(AnnotationId),
    ClearAll,
}
