//! HTTP handlers, one module per route group.

pub mod clippers;
pub mod search;
pub mod videos;
