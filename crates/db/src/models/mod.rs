//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create/update DTO for writes

pub mod clipper;
pub mod search;
pub mod video;
