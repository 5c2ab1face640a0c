//! Credentials and tokens.
//!
//! - [`password`]: Argon2id hashing and the minimum-length rule.
//! - [`jwt`]: access tokens and opaque refresh tokens.

pub mod jwt;
pub mod password;
