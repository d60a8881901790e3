//! Domain types and validation shared by the `chirpy` crates.
//!
//! Nothing in here performs I/O; the database and HTTP layers build on top.

pub mod chirp;
pub mod credentials;
pub mod error;
pub mod types;
