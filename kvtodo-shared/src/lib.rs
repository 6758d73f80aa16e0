//! # kvtodo Shared Library
//!
//! Core of the kvtodo service: a task list stored in a remote key-value
//! store, behind cookie-session authentication.
//!
//! ## Module Organization
//!
//! - `store`: key-value store trait, Redis and in-memory backends, key layout
//! - `models`: user and task records, task store
//! - `auth`: password hashing, credential store, sessions, authorization gate
//! - `error`: core error kinds

pub mod auth;
pub mod error;
pub mod models;
pub mod store;

pub use error::{CoreError, CoreResult};

/// Current version of the kvtodo shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
