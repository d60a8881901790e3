//! Request extractors and middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`hits::count_fileserver_hits`] -- Counts requests to the static file server.

pub mod auth;
pub mod hits;
