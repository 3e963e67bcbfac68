use super::QaController;
use super::command::Command;
use crate::dom::DomNode;
use crate::infra::storage::save_annotations;

/// Execute one command against the controller's effect seams.
pub(super) fn run<N: DomNode>(controller: &mut QaController<N>, command: Command) {
    match command {
        Command::PersistAnnotations => {
            let key = controller.config.annotations_key();
            save_annotations(
                controller.storage.as_mut(),
                &key,
                &controller.state.annotations,
            );
        }
        Command::ShowHighlight(rect) => controller.overlay.show(&rect),
        Command::ClearHighlight => controller.overlay.clear(),
        Command::NotifyCreated(annotation) => {
            if let Some(callback) = &controller.config.on_annotation_create {
                callback(&annotation);
            }
        }
        Command::NotifyUpdated(annotation) => {
            if let Some(callback) = &controller.config.on_annotation_update {
                callback(&annotation);
            }
        }
    }
}
