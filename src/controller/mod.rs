//! Annotation lifecycle controller.
//!
//! One reducer-driven state machine coordinates the widget: enabled /
//! grab / panel flags, hover and selection tracking, and the annotation
//! collection's CRUD. Transitions are pure (`reducer`); persistence,
//! overlay management, and host callbacks run as commands (`runtime`).

mod action;
mod command;
mod overlay;
mod reducer;
mod runtime;
mod state;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use command::Command;
pub use overlay::{HighlightOverlay, NoopOverlay};
pub use state::WidgetState;

use crate::application::export::{
    copy_all_for_ai, export_all_to_markdown, github_issue_body, github_labels,
};
use crate::config::{KeyEvent, WidgetConfig};
use crate::dom::{DomNode, is_widget_element};
use crate::domain::{
    Annotation, AnnotationDraft, AnnotationId, AnnotationPatch, ExportError, GitHubIssue,
};
use crate::infra::clipboard::{ClipboardSink, SystemClipboard};
use crate::infra::platform::{SystemUrlOpener, UrlOpener};
use crate::infra::storage::{FileStorage, StorageArea, generate_id, load_annotations};
use chrono::Utc;
use std::collections::HashMap;

/// The annotation lifecycle controller. Owns the live annotation
/// collection and all UI-transient state; storage, overlay, clipboard,
/// and browser integration are pluggable seams.
pub struct QaController<N: DomNode> {
    config: WidgetConfig,
    state: WidgetState<N>,
    storage: Box<dyn StorageArea>,
    overlay: Box<dyn HighlightOverlay>,
    clipboard: Box<dyn ClipboardSink>,
    url_opener: Box<dyn UrlOpener>,
    /// Session-only association of annotations to created issues.
    issue_links: HashMap<AnnotationId, GitHubIssue>,
    started: bool,
}

impl<N: DomNode> QaController<N> {
    /// Controller with the default system-backed seams: file storage,
    /// the system clipboard, the platform browser opener, no overlay.
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            state: WidgetState::default(),
            storage: Box::new(FileStorage::new(FileStorage::default_dir())),
            overlay: Box::new(NoopOverlay),
            clipboard: Box::new(SystemClipboard),
            url_opener: Box::new(SystemUrlOpener),
            issue_links: HashMap::new(),
            started: false,
        }
    }

    pub fn with_storage(mut self, storage: Box<dyn StorageArea>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_overlay(mut self, overlay: Box<dyn HighlightOverlay>) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_url_opener(mut self, url_opener: Box<dyn UrlOpener>) -> Self {
        self.url_opener = url_opener;
        self
    }

    /// Run an action through the pure reducer, then execute the commands
    /// it produced.
    pub fn dispatch(&mut self, action: Action<N>) {
        let commands = reducer::reduce(&mut self.state, action);
        for command in commands {
            runtime::run(self, command);
        }
    }

    /// Begin the controller's lifecycle: loads the persisted collection
    /// once and arms the event surface. Idempotent.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let stored = load_annotations(self.storage.as_ref(), &self.config.annotations_key());
        if !stored.is_empty() {
            self.dispatch(Action::SetAnnotations(stored));
        }
    }

    /// End the lifecycle: exits grab mode (removing any overlay) and
    /// disarms the event surface. Idempotent.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        if self.state.grabbing {
            self.dispatch(Action::ToggleGrab);
        }
        self.started = false;
    }

    pub fn state(&self) -> &WidgetState<N> {
        &self.state
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.state.annotations
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn enable(&mut self) {
        self.dispatch(Action::Enable);
    }

    pub fn disable(&mut self) {
        self.dispatch(Action::Disable);
    }

    pub fn toggle_grab_mode(&mut self) {
        self.dispatch(Action::ToggleGrab);
    }

    pub fn toggle_panel(&mut self) {
        self.dispatch(Action::TogglePanel);
    }

    pub fn select_element(&mut self, element: N) {
        self.dispatch(Action::SetSelected(Some(element)));
    }

    pub fn clear_selection(&mut self) {
        self.dispatch(Action::SetSelected(None));
    }

    /// Stamp id and timestamps onto a draft, append it, notify the host,
    /// and hand the new record back.
    pub fn add_annotation(&mut self, draft: AnnotationDraft) -> Annotation {
        let now = Utc::now().timestamp_millis();
        let annotation = Annotation {
            id: generate_id(),
            kind: draft.kind,
            priority: draft.priority,
            title: draft.title,
            description: draft.description,
            element: draft.element,
            screenshot: draft.screenshot,
            created_at: now,
            updated_at: now,
            page_url: draft.page_url,
            resolved: draft.resolved,
        };
        self.dispatch(Action::AddAnnotation(annotation.clone()));
        annotation
    }

    /// Shallow-merge a patch into the annotation with the given id and
    /// refresh its `updated_at`. Unknown ids are ignored.
    pub fn update_annotation(&mut self, id: &str, patch: AnnotationPatch) {
        self.dispatch(Action::UpdateAnnotation {
            id: id.to_string(),
            patch,
            updated_at: Utc::now().timestamp_millis(),
        });
    }

    pub fn delete_annotation(&mut self, id: &str) {
        self.dispatch(Action::DeleteAnnotation(id.to_string()));
    }

    pub fn clear_all(&mut self) {
        self.dispatch(Action::ClearAll);
    }

    /// Hotkey toggles the widget; Escape exits grab mode. Inert unless
    /// started. Returns true when the event was handled.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if !self.started {
            return false;
        }

        if self.config.hotkey.matches(event) {
            if self.state.enabled {
                self.dispatch(Action::Disable);
            } else {
                self.dispatch(Action::Enable);
            }
            return true;
        }

        if event.key == "Escape" && self.state.grabbing {
            self.dispatch(Action::ToggleGrab);
            return true;
        }

        false
    }

    /// Grab-mode hover tracking. The widget's own DOM is skipped so the
    /// tool never targets itself.
    pub fn pointer_moved(&mut self, target: &N) {
        if !self.started || !self.state.grabbing {
            return;
        }

        if is_widget_element(target, &self.config.brand.marker_attribute()) {
            self.dispatch(Action::SetHovered(None));
            return;
        }

        self.dispatch(Action::SetHovered(Some(target.clone())));
    }

    /// Grab-mode click handling: selects the element and opens the
    /// panel. Returns true when the click was consumed, in which case
    /// the host must suppress the default action and propagation.
    pub fn element_clicked(&mut self, target: &N) -> bool {
        if !self.started || !self.state.grabbing {
            return false;
        }

        if is_widget_element(target, &self.config.brand.marker_attribute()) {
            return false;
        }

        self.dispatch(Action::SetSelected(Some(target.clone())));
        self.dispatch(Action::TogglePanel);
        true
    }

    /// Tokenless export path: open a pre-filled "new issue" form for
    /// every unresolved annotation. Does nothing without a configured
    /// repository.
    pub fn export_to_github(&mut self) {
        let Some(repo) = self.config.github_repo.clone() else {
            log::error!("no GitHub repository configured for export");
            return;
        };

        for annotation in self.state.annotations.iter().filter(|a| !a.resolved) {
            let title = format!("[QA] {}", annotation.title);
            let body = github_issue_body(annotation);
            let labels = github_labels(annotation).join(",");

            let url = match reqwest::Url::parse_with_params(
                &format!("https://github.com/{repo}/issues/new"),
                &[
                    ("title", title.as_str()),
                    ("body", body.as_str()),
                    ("labels", labels.as_str()),
                ],
            ) {
                Ok(url) => url,
                Err(err) => {
                    log::error!("failed to build issue URL: {err}");
                    continue;
                }
            };

            if let Err(err) = self.url_opener.open(url.as_str()) {
                log::warn!("failed to open issue form: {err}");
            }
        }

        if let Some(callback) = &self.config.on_export {
            callback(&self.state.annotations);
        }
    }

    /// Render the full collection as a Markdown report.
    pub fn export_to_markdown(&self) -> String {
        let markdown = export_all_to_markdown(&self.state.annotations);
        if let Some(callback) = &self.config.on_export {
            callback(&self.state.annotations);
        }
        markdown
    }

    /// Place the AI-formatted export on the clipboard. Clipboard denial
    /// propagates to the caller.
    pub fn export_to_clipboard(&mut self) -> Result<(), ExportError> {
        copy_all_for_ai(self.clipboard.as_mut(), &self.state.annotations)?;
        if let Some(callback) = &self.config.on_export {
            callback(&self.state.annotations);
        }
        Ok(())
    }

    /// Remember which issue an annotation was exported as. The map lives
    /// for this controller only; it is never persisted.
    pub fn record_issue(&mut self, annotation_id: impl Into<AnnotationId>, issue: GitHubIssue) {
        self.issue_links.insert(annotation_id.into(), issue);
    }

    pub fn issue_for(&self, annotation_id: &str) -> Option<&GitHubIssue> {
        self.issue_links.get(annotation_id)
    }
}
