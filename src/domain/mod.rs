//! Domain types for the GrabQA annotation engine.
//! Defines the core data structures and business objects used throughout the crate.

pub mod annotation;
pub mod element;
pub mod error;
pub mod github;

pub use annotation::*;
pub use element::*;
pub use error::*;
pub use github::*;
