//! Shared domain layer for the AlgoScales core.
//!
//! Every sibling crate depends on this one for the error enum, the
//! language/pattern/mode vocabulary, configuration, structured trace
//! events, and the streaming-text interface used by external assistant
//! providers.

pub mod config;
pub mod error;
pub mod stream;
pub mod trace;
pub mod types;
