use super::action::Action;
use super::command::Command;
use super::state::WidgetState;
use crate::dom::DomNode;

/// Pure state transition. Mutates `state` in place and returns the side
/// effects the runtime should execute, in order.
pub fn reduce<N: DomNode>(state: &mut WidgetState<N>, action: Action<N>) -> Vec<Command> {
    match action {
        Action::Enable => {
            state.enabled = true;
            vec![]
        }
        Action::Disable => {
            // Selection is preserved across disable.
            state.enabled = false;
            state.grabbing = false;
            state.hovered = None;
            vec![Command::ClearHighlight]
        }
        Action::ToggleGrab => {
            state.grabbing = !state.grabbing;
            state.hovered = None;
            state.selected = None;
            // Any prior overlay goes away on both entry and exit.
            vec![Command::ClearHighlight]
        }
        Action::TogglePanel => {
            state.panel_open = !state.panel_open;
            vec![]
        }
        Action::SetHovered(element) => {
            let commands = element
                .as_ref()
                .and_then(|el| el.bounding_rect())
                .map(|rect| vec![Command::ShowHighlight(rect)])
                .unwrap_or_default();
            state.hovered = element;
            commands
        }
        Action::SetSelected(element) => {
            let was_grabbing = state.grabbing;
            state.selected = element;
            state.grabbing = false;
            if was_grabbing {
                vec![Command::ClearHighlight]
            } else {
                vec![]
            }
        }
        Action::SetAnnotations(annotations) => {
            state.annotations = annotations;
            vec![Command::PersistAnnotations]
        }
        Action::AddAnnotation(annotation) => {
            state.annotations.push(annotation.clone());
            vec![Command::PersistAnnotations, Command::NotifyCreated(annotation)]
        }
        Action::UpdateAnnotation {
            id,
            patch,
            updated_at,
        } => {
            let Some(annotation) = state.annotations.iter_mut().find(|a| a.id == id) else {
                return vec![];
            };
            annotation.apply(&patch);
            annotation.updated_at = updated_at;
            let snapshot = annotation.clone();
            vec![Command::PersistAnnotations, Command::NotifyUpdated(snapshot)]
        }
        Action::DeleteAnnotation(id) => {
            let before = state.annotations.len();
            state.annotations.retain(|a| a.id != id);
            if state.annotations.len() == before {
                // Deleting a non-existent id is a no-op.
                vec![]
            } else {
                vec![Command::PersistAnnotations]
            }
        }
        Action::ClearAll => {
            state.annotations.clear();
            state.selected = None;
            vec![Command::PersistAnnotations]
        }
    }
}
