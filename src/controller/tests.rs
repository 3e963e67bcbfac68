use super::*;
use crate::config::{Brand, KeyEvent, WidgetConfig};
use crate::dom::{MarkupDocument, MarkupNode};
use crate::domain::{AnnotationDraft, AnnotationPatch, AnnotationType, IssueState, Priority};
use crate::domain::{BoundingRect, ElementContext, GitHubIssue};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedStorage(Arc<Mutex<HashMap<String, String>>>);

impl crate::infra::storage::StorageArea for SharedStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.0.lock().unwrap().remove(key);
    }
}

#[derive(Clone, Default)]
struct RecordingOverlay(Arc<Mutex<Vec<String>>>);

impl HighlightOverlay for RecordingOverlay {
    fn show(&mut self, rect: &BoundingRect) {
        self.0.lock().unwrap().push(format!("show {}x{}", rect.width, rect.height));
    }

    fn clear(&mut self) {
        self.0.lock().unwrap().push("clear".to_string());
    }
}

#[derive(Clone, Default)]
struct RecordingOpener(Arc<Mutex<Vec<String>>>);

impl crate::infra::platform::UrlOpener for RecordingOpener {
    fn open(&mut self, url: &str) -> Result<()> {
        self.0.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

fn draft(title: &str) -> AnnotationDraft {
    AnnotationDraft {
        kind: AnnotationType::Bug,
        priority: Priority::High,
        title: title.into(),
        description: "details".into(),
        element: ElementContext {
            selector: "#target".into(),
            tag_name: "button".into(),
            ..Default::default()
        },
        screenshot: None,
        page_url: "http://localhost/page".into(),
        resolved: false,
    }
}

fn started_controller() -> QaController<MarkupNode<'static, 'static>> {
    let mut controller = QaController::new(WidgetConfig::default())
        .with_storage(Box::new(SharedStorage::default()));
    controller.start();
    controller
}

#[test]
fn add_annotation_stamps_id_and_matching_timestamps() {
    let mut controller = started_controller();

    let annotation = controller.add_annotation(draft("Broken button"));

    assert!(!annotation.id.is_empty());
    assert_eq!(annotation.created_at, annotation.updated_at);
    assert_eq!(controller.annotations().len(), 1);
    assert_eq!(controller.annotations()[0].id, annotation.id);
}

#[test]
fn add_annotation_fires_creation_callback() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let seen_by_callback = Arc::clone(&seen);

    let config = WidgetConfig {
        on_annotation_create: Some(Box::new(move |annotation| {
            seen_by_callback.lock().unwrap().push(annotation.title.clone());
        })),
        ..Default::default()
    };

    let mut controller: QaController<MarkupNode<'_, '_>> =
        QaController::new(config).with_storage(Box::new(SharedStorage::default()));
    controller.start();
    controller.add_annotation(draft("Broken button"));

    assert_eq!(*seen.lock().unwrap(), vec!["Broken button"]);
}

#[test]
fn update_refreshes_updated_at_and_keeps_other_fields() {
    let mut controller = started_controller();
    let annotation = controller.add_annotation(draft("before"));

    std::thread::sleep(std::time::Duration::from_millis(2));
    controller.update_annotation(
        &annotation.id,
        AnnotationPatch {
            title: Some("after".into()),
            ..Default::default()
        },
    );

    let updated = &controller.annotations()[0];
    assert_eq!(updated.title, "after");
    assert!(updated.updated_at > updated.created_at);
    assert_eq!(updated.created_at, annotation.created_at);
    assert_eq!(updated.description, "details");
    assert_eq!(updated.priority, Priority::High);
}

#[test]
fn delete_removes_by_id_and_tolerates_unknown_ids() {
    let mut controller = started_controller();
    let a = controller.add_annotation(draft("one"));
    controller.add_annotation(draft("two"));

    controller.delete_annotation(&a.id);
    assert_eq!(controller.annotations().len(), 1);
    assert!(controller.annotations().iter().all(|ann| ann.id != a.id));

    controller.delete_annotation("does-not-exist");
    assert_eq!(controller.annotations().len(), 1);
}

#[test]
fn collection_changes_write_through_to_storage() {
    let storage = SharedStorage::default();
    let mut controller: QaController<MarkupNode<'_, '_>> =
        QaController::new(WidgetConfig::default()).with_storage(Box::new(storage.clone()));
    controller.start();

    let annotation = controller.add_annotation(draft("persisted"));

    let key = Brand::default().annotations_key();
    let raw = storage.0.lock().unwrap().get(&key).cloned().unwrap();
    assert!(raw.contains(&annotation.id));

    controller.clear_all();
    let raw = storage.0.lock().unwrap().get(&key).cloned().unwrap();
    assert_eq!(raw, "[]");
}

#[test]
fn start_loads_persisted_annotations_once() {
    let storage = SharedStorage::default();

    let mut first: QaController<MarkupNode<'_, '_>> =
        QaController::new(WidgetConfig::default()).with_storage(Box::new(storage.clone()));
    first.start();
    first.add_annotation(draft("left behind"));

    let mut second: QaController<MarkupNode<'_, '_>> =
        QaController::new(WidgetConfig::default()).with_storage(Box::new(storage));
    second.start();

    assert_eq!(second.annotations().len(), 1);
    assert_eq!(second.annotations()[0].title, "left behind");
}

#[test]
fn hotkey_toggles_enabled_and_escape_exits_grab() {
    let mut controller = started_controller();

    let hotkey = KeyEvent {
        code: "KeyQ".into(),
        alt: true,
        ..Default::default()
    };

    assert!(controller.handle_key(&hotkey));
    assert!(controller.state().enabled);

    controller.toggle_grab_mode();
    assert!(controller.state().grabbing);

    let escape = KeyEvent {
        key: "Escape".into(),
        ..Default::default()
    };
    assert!(controller.handle_key(&escape));
    assert!(!controller.state().grabbing);

    // Escape outside grab mode is not handled.
    assert!(!controller.handle_key(&escape));

    assert!(controller.handle_key(&hotkey));
    assert!(!controller.state().enabled);
}

#[test]
fn event_surface_is_inert_until_started() {
    let mut controller: QaController<MarkupNode<'_, '_>> =
        QaController::new(WidgetConfig::default()).with_storage(Box::new(SharedStorage::default()));

    let hotkey = KeyEvent {
        code: "KeyQ".into(),
        alt: true,
        ..Default::default()
    };
    assert!(!controller.handle_key(&hotkey));
    assert!(!controller.state().enabled);
}

#[test]
fn grab_mode_hover_and_click_flow() {
    let markup = r#"<body>
        <div data-qaflow="toolbar"><button id="widget-btn">grab</button></div>
        <section><button id="page-btn" data-bounds="10,10,120,32">Pay</button></section>
    </body>"#;
    let doc = MarkupDocument::parse(markup).unwrap();
    let widget_button = doc.find_by_id("widget-btn").unwrap();
    let page_button = doc.find_by_id("page-btn").unwrap();

    let overlay = RecordingOverlay::default();
    let mut controller = QaController::new(WidgetConfig::default())
        .with_storage(Box::new(SharedStorage::default()))
        .with_overlay(Box::new(overlay.clone()));
    controller.start();

    // Pointer events are ignored while not grabbing.
    controller.pointer_moved(&page_button);
    assert!(controller.state().hovered.is_none());
    assert!(!controller.element_clicked(&page_button));

    controller.enable();
    controller.toggle_grab_mode();

    // The widget's own DOM never becomes a target.
    controller.pointer_moved(&widget_button);
    assert!(controller.state().hovered.is_none());
    assert!(!controller.element_clicked(&widget_button));

    controller.pointer_moved(&page_button);
    assert!(controller.state().hovered.is_some());

    // Click consumes the event, selects, exits grab, opens the panel.
    assert!(controller.element_clicked(&page_button));
    assert!(!controller.state().grabbing);
    assert!(controller.state().selected.is_some());
    assert!(controller.state().panel_open);

    let events = overlay.0.lock().unwrap().clone();
    assert!(events.contains(&"show 120x32".to_string()));
    // Leaving grab mode removed the overlay.
    assert_eq!(events.last().unwrap(), "clear");
}

#[test]
fn export_to_github_opens_one_form_per_unresolved_annotation() {
    let opener = RecordingOpener::default();
    let config = WidgetConfig {
        github_repo: Some("acme/shop".into()),
        ..Default::default()
    };
    let mut controller: QaController<MarkupNode<'_, '_>> = QaController::new(config)
        .with_storage(Box::new(SharedStorage::default()))
        .with_url_opener(Box::new(opener.clone()));
    controller.start();

    controller.add_annotation(draft("open one"));
    let resolved = controller.add_annotation(draft("already fixed"));
    controller.update_annotation(
        &resolved.id,
        AnnotationPatch {
            resolved: Some(true),
            ..Default::default()
        },
    );

    controller.export_to_github();

    let urls = opener.0.lock().unwrap().clone();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("https://github.com/acme/shop/issues/new?"));
    assert!(urls[0].contains("title=%5BQA%5D+open+one"));
    assert!(urls[0].contains("labels=qa%2Cbug%2Cpriority%3A+high"));
}

#[test]
fn export_to_github_without_repo_is_a_logged_no_op() {
    let opener = RecordingOpener::default();
    let mut controller: QaController<MarkupNode<'_, '_>> =
        QaController::new(WidgetConfig::default())
            .with_storage(Box::new(SharedStorage::default()))
            .with_url_opener(Box::new(opener.clone()));
    controller.start();
    controller.add_annotation(draft("unsendable"));

    controller.export_to_github();
    assert!(opener.0.lock().unwrap().is_empty());
}

#[test]
fn export_to_clipboard_places_ai_block_and_fires_callback() {
    let exported: Arc<Mutex<usize>> = Arc::default();
    let exported_by_callback = Arc::clone(&exported);

    let clipboard = crate::infra::clipboard::MemoryClipboard::default();
    let clipboard_handle = Arc::new(Mutex::new(clipboard));

    struct SharedClipboard(Arc<Mutex<crate::infra::clipboard::MemoryClipboard>>);
    impl crate::infra::clipboard::ClipboardSink for SharedClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), crate::domain::ExportError> {
            self.0.lock().unwrap().set_text(text)
        }
    }

    let config = WidgetConfig {
        on_export: Some(Box::new(move |annotations| {
            *exported_by_callback.lock().unwrap() = annotations.len();
        })),
        ..Default::default()
    };

    let mut controller: QaController<MarkupNode<'_, '_>> = QaController::new(config)
        .with_storage(Box::new(SharedStorage::default()))
        .with_clipboard(Box::new(SharedClipboard(Arc::clone(&clipboard_handle))));
    controller.start();
    controller.add_annotation(draft("for the agent"));

    controller.export_to_clipboard().unwrap();

    let contents = clipboard_handle.lock().unwrap().contents.clone().unwrap();
    assert!(contents.contains("# QA Issue: for the agent"));
    assert_eq!(*exported.lock().unwrap(), 1);
}

#[test]
fn export_to_markdown_returns_report() {
    let mut controller = started_controller();
    controller.add_annotation(draft("in the report"));

    let markdown = controller.export_to_markdown();
    assert!(markdown.contains("# QA Session Report"));
    assert!(markdown.contains("Total Issues: 1"));
    assert!(markdown.contains("## in the report"));
}

#[test]
fn issue_links_live_for_the_session_only() {
    let mut controller = started_controller();
    let annotation = controller.add_annotation(draft("linked"));

    controller.record_issue(
        annotation.id.clone(),
        GitHubIssue {
            id: 5,
            number: 12,
            title: "[QA] linked".into(),
            html_url: "https://github.com/acme/shop/issues/12".into(),
            state: IssueState::Open,
        },
    );

    assert_eq!(controller.issue_for(&annotation.id).unwrap().number, 12);
    assert!(controller.issue_for("other").is_none());
}

#[test]
fn stop_exits_grab_mode_and_clears_overlay() {
    let overlay = RecordingOverlay::default();
    let mut controller: QaController<MarkupNode<'_, '_>> =
        QaController::new(WidgetConfig::default())
            .with_storage(Box::new(SharedStorage::default()))
            .with_overlay(Box::new(overlay.clone()));
    controller.start();

    controller.enable();
    controller.toggle_grab_mode();
    controller.stop();

    assert!(!controller.state().grabbing);
    assert_eq!(overlay.0.lock().unwrap().last().unwrap(), "clear");
}
