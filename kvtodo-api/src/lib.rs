//! # kvtodo API Server Library
//!
//! HTTP front end for the kvtodo core.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `cookie`: Session cookie parsing and `Set-Cookie` values
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Session-authenticated caller extractor
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod cookie;
pub mod error;
pub mod extract;
pub mod routes;
