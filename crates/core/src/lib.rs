//! Core domain types, errors, and constants for `textcache`.
//!
//! This crate establishes the foundational data structures and error handling
//! used by the rest of the workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: The workspace `Error` enum and `Result` alias.
//! - **`types`**: `EntityIdentity`, the (type name, id) pair every storage
//!   path is derived from, and `Environment`, the host environment
//!   discriminator used when composing a backend.
//! - **`constants`**: Shared static values such as the default root directory,
//!   shard geometry and environment variable names.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::*,
};
