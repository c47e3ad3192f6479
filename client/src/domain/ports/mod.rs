//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Outbound adapters (the reqwest transport, UI toast renderers) implement
//! these traits; the client and hooks layers depend only on them.

mod http_transport;
mod macros;
mod notifier;
mod token_source;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use http_transport::MockHttpTransport;
pub use http_transport::{ApiRequest, HttpMethod, HttpTransport, ResponseBody};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Notifier, TracingNotifier};
#[cfg(test)]
pub use token_source::MockTokenSource;
pub use token_source::{NoSession, TokenSource};
