//! Domain types and pure logic for the Myco findings platform.
//!
//! Nothing in this crate touches the database, the network, or the
//! filesystem. The `db`, `api` and `cli` crates build on these types.

pub mod authorization;
pub mod demo;
pub mod error;
pub mod finding;
pub mod geo;
pub mod pagination;
pub mod roles;
pub mod species;
pub mod species_import;
pub mod taxonomy;
pub mod types;
