//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod clipper_repo;
pub mod search_repo;
pub mod video_repo;

pub use clipper_repo::ClipperRepo;
pub use search_repo::SearchRepo;
pub use video_repo::VideoRepo;
