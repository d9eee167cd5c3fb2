//! # TaskDesk API Server Library
//!
//! Router, handlers and configuration for the TaskDesk REST API.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and bearer gate
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors that reject with the JSON error body
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
