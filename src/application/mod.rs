//! Application layer (use-cases, policies).
//!
//! Pure formatting and export policies over the domain types, free of UI
//! and storage concerns.

pub mod export;
