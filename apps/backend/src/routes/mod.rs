//! HTTP handlers, generic over the progress store.

pub mod attempts;
pub mod grading;
pub mod level;
pub mod study;
