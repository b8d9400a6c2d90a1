//! # Teamboard Shared Library
//!
//! Domain types, persistence and access control used by the Teamboard API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Tokens, password hashing and the access-control evaluator
//! - `store`: Persistence seam with PostgreSQL and in-memory backends
//! - `services`: Access-controlled operations over a store
//! - `pagination`: Page requests, page metadata and search helpers
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;
pub mod services;
pub mod store;

/// Current version of the Teamboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
