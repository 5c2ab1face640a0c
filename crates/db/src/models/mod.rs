//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) applied with `COALESCE`

pub mod finding;
pub mod session;
pub mod species;
pub mod taxon;
pub mod user;
