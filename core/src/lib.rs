//! Client core for the count service.
//!
//! # Overview
//! Three layers, leaf first:
//! - [`transport`]: connection configuration and the blocking HTTP client.
//! - [`sdk`]: typed count operations returning [`SdkError`] on any failure.
//! - [`view`]: the UI-facing [`ViewState`] kept in sync with the server.
//!
//! # Design
//! - [`CountClient`] is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`, and the I/O happens in between
//!   behind the [`Transport`] trait.
//! - Clients are passed explicitly. [`ClientManager`] replaces the usual
//!   process-wide singleton with a value the caller owns.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod sdk;
pub mod transport;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CountClient, Operation};
pub use error::{ConfigError, ErrorKind, SdkError, SdkResult, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use sdk::CountSdk;
pub use transport::{create_client, ClientManager, HttpTransport, Transport, TransportConfig};
pub use types::{Count, CreateCount, Envelope, UpdateCount};
pub use view::{CountView, ViewState};
