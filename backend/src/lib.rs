//! # Items Rust Backend
//!
//! A small CRUD service over a single persisted resource (an *item*) plus a
//! WebSocket channel that pushes periodic server status.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Request schemas, read representation and field validation
//! - [`models`]: Domain types shared by the repository implementations
//! - [`db`]: Repository pattern, storage backends and the service layer
//! - [`config`]: Server settings loaded from the environment
//! - [`http`]: Axum-based HTTP server, request handlers and the status stream
//!
//! ## Storage backends
//!
//! - `local-repo`: in-memory repository, used by default and in tests
//! - `postgres-repo`: Diesel/r2d2 repository against PostgreSQL
//!
//! Backends are constructed explicitly through [`db::RepositoryFactory`] and
//! injected into [`http::AppState`]; there is no process-wide repository.

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
