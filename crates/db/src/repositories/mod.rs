//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod finding_repo;
pub mod session_repo;
pub mod species_repo;
pub mod taxon_repo;
pub mod user_repo;

pub use finding_repo::FindingRepo;
pub use session_repo::SessionRepo;
pub use species_repo::SpeciesRepo;
pub use taxon_repo::TaxonRepo;
pub use user_repo::UserRepo;
