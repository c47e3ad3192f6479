//! Client library for the Asideka business-networking backend.
//!
//! Layers, from the wire up: `outbound` adapters implement the `domain`
//! ports, `client` attaches the session bearer token, `api` groups typed
//! endpoint calls and `query` caches their results for UI consumers.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod query;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::SessionClient;
pub use config::{ClientSettings, ConfigError};
pub use query::{Hooks, QueryCache, QueryState};
