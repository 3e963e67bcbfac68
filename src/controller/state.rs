use crate::domain::{Annotation, QaSession};

/// Composite widget state: three orthogonal mode flags, the transient
/// element refs, and the annotation collection in insertion order.
#[derive(Debug, Clone)]
pub struct WidgetState<N> {
    /// Master on/off switch
    pub enabled: bool,
    /// Element-picking mode
    pub grabbing: bool,
    /// Side panel visibility
    pub panel_open: bool,
    /// Element currently under the pointer while grabbing
    pub hovered: Option<N>,
    /// Element last selected for annotation
    pub selected: Option<N>,
    /// The live annotation collection
    pub annotations: Vec<Annotation>,
    /// Declared, inert; no current flow populates it
    pub session: Option<QaSession>,
}

impl<N> Default for WidgetState<N> {
    fn default() -> Self {
        Self {
            enabled: false,
            grabbing: false,
            panel_open: false,
            hovered: None,
            selected: None,
            annotations: Vec::new(),
            session: None,
        }
    }
}
