//! Request handlers, one module per resource.

pub mod auth;
pub mod findings;
pub mod species;
pub mod taxonomy;
