//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 access-token issuance and validation.
//!
//! Both modules are plain functions with no shared state; handlers call them
//! directly (hashing from a blocking task, see [`crate::handlers`]).

pub mod jwt;
pub mod password;
