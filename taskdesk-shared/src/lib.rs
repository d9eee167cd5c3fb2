//! # TaskDesk Shared Library
//!
//! Domain types, credentials and persistence used by the TaskDesk API server.
//!
//! ## Module Organization
//!
//! - `auth`: Token issuance/verification, password hashing, caller identity
//! - `models`: Users, tasks and comments
//! - `store`: Store traits with PostgreSQL and in-memory backends
//! - `db`: Connection pool and migrations for the PostgreSQL backend

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the TaskDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
