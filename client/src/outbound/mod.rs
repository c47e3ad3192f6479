//! Outbound adapters implementing domain ports.

pub mod http;

pub use http::ReqwestTransport;
