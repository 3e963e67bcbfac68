//! End-to-end annotation workflow: grab an element from a markup
//! snapshot, annotate it, export it, and reload it from storage.

use grabqa::config::WidgetConfig;
use grabqa::controller::QaController;
use grabqa::dom::{AttributeMetadata, DomNode, MarkupDocument, MarkupNode, capture_context};
use grabqa::domain::{AnnotationDraft, AnnotationType, Priority};
use grabqa::infra::storage::StorageArea;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedStorage(Arc<Mutex<HashMap<String, String>>>);

impl StorageArea for SharedStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.0
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.0.lock().unwrap().remove(key);
    }
}

const PAGE: &str = r#"<body>
    <div data-qaflow="toolbar"><button>annotate</button></div>
    <main class="shop">
        <section data-component="Checkout" data-source-file="src/checkout.tsx:8">
            <button class="primary wide" data-bounds="120,40,180,44">Pay now</button>
        </section>
    </main>
</body>"#;

#[test]
fn grab_annotate_export_reload_workflow() {
    let doc = MarkupDocument::parse(PAGE).unwrap();
    // The first <button> in the document is the widget's own toolbar.
    let pay_button = page_button(&doc);

    let storage = SharedStorage::default();
    let mut controller = QaController::new(WidgetConfig::default())
        .with_storage(Box::new(storage.clone()));
    controller.start();
    controller.enable();
    controller.toggle_grab_mode();

    // Grab flow: hover then click the page element.
    controller.pointer_moved(&pay_button);
    assert!(controller.state().hovered.is_some());
    assert!(controller.element_clicked(&pay_button));
    assert!(controller.state().panel_open);

    // The selected element's snapshot feeds the annotation form.
    let selected = controller.state().selected.unwrap();
    let context = capture_context(&selected, &AttributeMetadata::default());
    assert_eq!(context.selector, "main.shop > section > button.primary.wide");
    assert_eq!(context.component_name.as_deref(), Some("Checkout"));
    assert_eq!(context.text_content, "Pay now");

    let annotation = controller.add_annotation(AnnotationDraft {
        kind: AnnotationType::Bug,
        priority: Priority::Critical,
        title: "Pay button does nothing".into(),
        description: "Clicking has no effect on checkout.".into(),
        element: context,
        screenshot: None,
        page_url: "http://localhost:3000/checkout".into(),
        resolved: false,
    });
    assert_eq!(annotation.created_at, annotation.updated_at);

    // The report includes the captured context.
    let markdown = controller.export_to_markdown();
    assert!(markdown.contains("Total Issues: 1"));
    assert!(markdown.contains("## Pay button does nothing"));
    assert!(markdown.contains("Selector: main.shop > section > button.primary.wide"));
    assert!(markdown.contains("Component: Checkout"));

    // A fresh controller over the same storage sees the collection.
    let mut reloaded: QaController<MarkupNode<'_, '_>> =
        QaController::new(WidgetConfig::default()).with_storage(Box::new(storage));
    reloaded.start();

    assert_eq!(reloaded.annotations().len(), 1);
    let restored = &reloaded.annotations()[0];
    assert_eq!(restored.id, annotation.id);
    assert_eq!(restored.title, "Pay button does nothing");
    assert_eq!(
        restored.element.selector,
        "main.shop > section > button.primary.wide"
    );
    assert_eq!(restored.element.component_name.as_deref(), Some("Checkout"));
}

fn page_button<'a, 'input>(doc: &'a MarkupDocument<'input>) -> MarkupNode<'a, 'input> {
    doc.find_first("main")
        .unwrap()
        .child_elements()
        .into_iter()
        .flat_map(|section| section.child_elements())
        .next()
        .unwrap()
}
