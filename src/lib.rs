//! GrabQA — an embeddable QA annotation engine.
//!
//! A host application (a webview bridge, an instrumented renderer, a GUI
//! shell) owns the element tree and the event loop; this crate owns the
//! annotation lifecycle: element targeting, selector synthesis, the
//! annotation collection and its persistence, and the Markdown / AI /
//! GitHub export paths.

pub mod application;
pub mod config;
pub mod controller;
pub mod dom;
pub mod domain;
pub mod infra;
pub mod utils;

use std::future::Future;
use tokio::runtime::Runtime;

lazy_static::lazy_static! {
    static ref RUNTIME: Runtime = Runtime::new().expect("Failed to create Tokio runtime");
}

/// Drive an async operation (GitHub calls, mostly) from a synchronous host.
pub fn block_on<F: Future>(future: F) -> F::Output {
    RUNTIME.block_on(future)
}
