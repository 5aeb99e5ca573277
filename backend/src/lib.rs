//! # Blog Backend
//!
//! A small REST backend for a blog: articles and the comments attached to
//! them, stored in SQLite with soft-delete semantics.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Entity types shared by every layer (articles, comments, patches)
//! - [`db`]: Repository traits, SQLite and in-memory backends, service layer
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`models`]: Shared model helpers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
