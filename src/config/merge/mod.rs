//! Source composition.

mod merge_policy;
pub mod service;
