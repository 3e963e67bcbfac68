//! Annotation exporters.
//!
//! Pure, stateless formatters: Markdown reports, GitHub issue bodies and
//! labels, and AI-assistant prompt blocks. The clipboard copy is the only
//! function here with a side effect, and the only one that can fail.


use crate::domain::{Annotation, AnnotationType, ExportError};
use crate::infra::clipboard::ClipboardSink;
use crate::utils::text::truncate_chars;
use chrono::{Local, SecondsFormat, TimeZone, Utc};

/// Render a single annotation as a standalone Markdown section.
pub fn annotation_to_markdown(annotation: &Annotation) -> String {
    let mut md = String::new();

    md.push_str(&format!("## {}\n\n", annotation.title));
    md.push_str(&format!(
        "**Type:** {} | **Priority:** {}\n\n",
        annotation.kind.label(),
        annotation.priority.label()
    ));

    if !annotation.description.is_empty() {
        md.push_str(&format!("### Description\n{}\n\n", annotation.description));
    }

    md.push_str("### Element Context\n```\n");
    md.push_str(&format!("Selector: {}\n", annotation.element.selector));
    if let Some(component) = &annotation.element.component_name {
        md.push_str(&format!("Component: {component}\n"));
    }
    if let Some(file) = &annotation.element.file_path {
        md.push_str(&format!("File: {file}\n"));
    }
    md.push_str(&format!("Tag: <{}>\n", annotation.element.tag_name));
    if !annotation.element.id.is_empty() {
        md.push_str(&format!("ID: {}\n", annotation.element.id));
    }
    if !annotation.element.class_name.is_empty() {
        md.push_str(&format!("Classes: {}\n", annotation.element.class_name));
    }
    md.push_str("```\n\n");

    if !annotation.element.text_content.is_empty() {
        md.push_str(&format!(
            "### Text Content\n```\n{}\n```\n\n",
            annotation.element.text_content
        ));
    }

    md.push_str(&format!("**Page:** {}\n", annotation.page_url));
    md.push_str(&format!(
        "**Created:** {}\n",
        local_timestamp(annotation.created_at)
    ));

    md
}

/// Render the whole collection as a report: header with generation time
/// and total count, a per-type summary, then each annotation separated
/// by horizontal rules.
pub fn export_all_to_markdown(annotations: &[Annotation]) -> String {
    let mut md = String::new();

    md.push_str("# QA Session Report\n\n");
    md.push_str(&format!(
        "Generated: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str(&format!("Total Issues: {}\n\n---\n\n", annotations.len()));

    // Counts grouped by type, in order of first occurrence.
    let mut by_type: Vec<(AnnotationType, usize)> = Vec::new();
    for annotation in annotations {
        match by_type.iter_mut().find(|(kind, _)| *kind == annotation.kind) {
            Some((_, count)) => *count += 1,
            None => by_type.push((annotation.kind, 1)),
        }
    }

    md.push_str("## Summary\n");
    for (kind, count) in &by_type {
        md.push_str(&format!("- {}: {}\n", kind.label(), count));
    }
    md.push_str("\n---\n\n");

    for (index, annotation) in annotations.iter().enumerate() {
        md.push_str(&format!("### {}. {}\n\n", index + 1, annotation.title));
        md.push_str(&annotation_to_markdown(annotation));
        md.push_str("\n---\n\n");
    }

    md
}

/// Render an annotation as a GitHub issue body.
pub fn github_issue_body(annotation: &Annotation) -> String {
    let mut md = String::new();

    if !annotation.description.is_empty() {
        md.push_str(&format!("{}\n\n", annotation.description));
    }

    md.push_str("## Element Context\n\n");
    md.push_str("| Property | Value |\n|----------|-------|\n");
    md.push_str(&format!("| Selector | `{}` |\n", annotation.element.selector));
    if let Some(component) = &annotation.element.component_name {
        md.push_str(&format!("| Component | `{component}` |\n"));
    }
    if let Some(file) = &annotation.element.file_path {
        md.push_str(&format!("| File | `{file}` |\n"));
    }
    md.push_str(&format!("| Tag | `<{}>` |\n\n", annotation.element.tag_name));

    if !annotation.element.text_content.is_empty() {
        md.push_str(&format!(
            "## Element Text\n```\n{}\n```\n\n",
            truncate_chars(&annotation.element.text_content, 300)
        ));
    }

    md.push_str("## Metadata\n");
    md.push_str(&format!("- **Page:** {}\n", annotation.page_url));
    md.push_str(&format!("- **Priority:** {}\n", annotation.priority.label()));
    md.push_str(&format!("- **Created:** {}\n\n", iso_timestamp(annotation.created_at)));
    md.push_str("---\n");
    md.push_str("*Captured with [GrabQA](https://github.com/shean-studios/grab-qa)*");

    md
}

/// GitHub labels for an annotation: the fixed `qa` label plus the type
/// and priority mappings.
pub fn github_labels(annotation: &Annotation) -> Vec<String> {
    vec![
        "qa".to_string(),
        annotation.kind.github_label().to_string(),
        annotation.priority.github_label().to_string(),
    ]
}

/// Render an annotation as a prompt block for an AI coding assistant.
pub fn ai_prompt(annotation: &Annotation) -> String {
    let mut out = String::new();

    out.push_str(&format!("# QA Issue: {}\n\n", annotation.title));
    out.push_str(&format!("Type: {}\n", annotation.kind.label()));
    out.push_str(&format!("Priority: {}\n\n", annotation.priority.label()));

    if !annotation.description.is_empty() {
        out.push_str(&format!("## Description\n{}\n\n", annotation.description));
    }

    out.push_str("## Element to Fix\n");
    if let Some(file) = &annotation.element.file_path {
        out.push_str(&format!("File: {file}\n"));
    }
    if let Some(component) = &annotation.element.component_name {
        out.push_str(&format!("Component: {component}\n"));
    }
    out.push_str(&format!("CSS Selector: {}\n", annotation.element.selector));

    if !annotation.element.inner_html.is_empty() {
        out.push_str(&format!(
            "\n## Current HTML\n```html\n{}\n```",
            truncate_chars(&annotation.element.inner_html, 500)
        ));
    }

    out
}

/// Join the AI prompts for the whole collection and place the result on
/// the clipboard. Clipboard denial propagates to the caller.
pub fn copy_all_for_ai(
    clipboard: &mut dyn ClipboardSink,
    annotations: &[Annotation],
) -> Result<(), ExportError> {
    let content = annotations
        .iter()
        .map(ai_prompt)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");
    clipboard.set_text(&content)
}

fn local_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn iso_timestamp(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}
