//! Connection-Credential Broker Library
//!
//! This library provides the core functionality for the room broker - a
//! stateless HTTP service that authorizes real-time media join requests
//! by minting short-lived connection credentials through an ordered
//! fallback chain of credential sources:
//!
//! 1. The operator's own production token issuer
//! 2. A statically provisioned server URL + token pair
//! 3. The shared cloud sandbox issuer
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> sources/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `models` - Data models
//! - `routes` - Axum router setup
//! - `sources` - Credential sources and the resolution policy

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sources;
