//! Pure domain logic for the clipper catalog: search filter normalization,
//! SQL predicate compilation, and shared error types.
//!
//! This crate performs no I/O. Everything here is unit-testable without a
//! database, which is what keeps the search semantics pinned down
//! independently of the storage layer.

pub mod error;
pub mod predicate;
pub mod search;
pub mod types;
