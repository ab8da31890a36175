//! Session Client Core Library
//!
//! A stateful HTTP client for backends that authenticate either with a static
//! API key or with an implicit session: a server-issued client ID echoed in a
//! header plus a rotating CSRF token delivered in a cookie.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`logging`] - Leveled, filtered line logging to a configurable sink
//! - [`config`] - Client configuration supplied once at construction
//! - [`session`] - Session state and the client-ID / CSRF wire convention
//! - [`client`] - Request pipeline, session negotiation, status classification

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod logging;
pub mod session;
mod user_agent;

// Re-export commonly used types
pub use client::{
    ApiResponse, Client, ClientError, ResponseCookie, classify_status, join_url,
};
pub use config::ClientConfig;
pub use logging::{LogConfig, LogLevel, LogSink, Logger, SharedWriter, UnknownLogLevel};
pub use session::Session;
