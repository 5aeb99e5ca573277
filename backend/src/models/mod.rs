//! Shared model helpers.

pub mod macros;
