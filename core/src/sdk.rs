//! Typed count operations over a transport.
//!
//! `CountSdk` glues [`CountClient`] to a [`Transport`]: build the request,
//! execute it, parse the response. A request that never got a response
//! becomes the "No response received from server" error; one that could not
//! be sent at all reports why. Everything else is decided by the parser. Every failure is logged once here before it is returned.

use std::sync::Arc;

use tracing::warn;

use crate::client::{CountClient, Operation};
use crate::error::{SdkError, SdkResult, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{HttpTransport, Transport, TransportConfig};
use crate::types::{Count, CreateCount, UpdateCount};

/// Count API bound to one transport.
#[derive(Debug, Clone)]
pub struct CountSdk<T> {
    client: CountClient,
    transport: T,
}

impl CountSdk<HttpTransport> {
    /// Build a dedicated HTTP client from `config`.
    pub fn with_config(config: TransportConfig) -> Self {
        let client = CountClient::new(&config.base_url);
        Self {
            client,
            transport: HttpTransport::new(config),
        }
    }
}

impl CountSdk<Arc<HttpTransport>> {
    /// Use a client shared through a [`crate::ClientManager`].
    pub fn shared(transport: Arc<HttpTransport>) -> Self {
        let client = CountClient::new(transport.base_url());
        Self { client, transport }
    }
}

impl<T: Transport> CountSdk<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: CountClient::new(base_url),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list_counts(&self) -> SdkResult<Vec<Count>> {
        let op = Operation::List;
        self.run(op, Ok(self.client.build_list_counts()), |c, r| c.parse_list_counts(r))
    }

    pub fn get_count(&self, id: i64) -> SdkResult<Count> {
        let op = Operation::Get(id);
        self.run(op, Ok(self.client.build_get_count(id)), |c, r| c.parse_get_count(id, r))
    }

    pub fn create_count(&self, input: &CreateCount) -> SdkResult<Count> {
        let op = Operation::Create;
        self.run(op, self.client.build_create_count(input), |c, r| c.parse_create_count(r))
    }

    pub fn update_count(&self, id: i64, input: &UpdateCount) -> SdkResult<Count> {
        let op = Operation::Update(id);
        self.run(op, self.client.build_update_count(id, input), |c, r| {
            c.parse_update_count(id, r)
        })
    }

    /// Returns the deleted record.
    pub fn delete_count(&self, id: i64) -> SdkResult<Count> {
        let op = Operation::Delete(id);
        self.run(op, Ok(self.client.build_delete_count(id)), |c, r| {
            c.parse_delete_count(id, r)
        })
    }

    pub fn increment_count(&self, id: i64) -> SdkResult<Count> {
        let op = Operation::Increment(id);
        self.run(op, Ok(self.client.build_increment_count(id)), |c, r| {
            c.parse_increment_count(id, r)
        })
    }

    pub fn decrement_count(&self, id: i64) -> SdkResult<Count> {
        let op = Operation::Decrement(id);
        self.run(op, Ok(self.client.build_decrement_count(id)), |c, r| {
            c.parse_decrement_count(id, r)
        })
    }

    fn run<R>(
        &self,
        op: Operation,
        request: SdkResult<HttpRequest>,
        parse: impl FnOnce(&CountClient, HttpResponse) -> SdkResult<R>,
    ) -> SdkResult<R> {
        let result = request.and_then(|req| {
            let response = self.transport.execute(&req).map_err(|err| match err {
                TransportError::Request(cause) => SdkError::request(cause, op.fallback_message()),
                TransportError::NoResponse(cause) => SdkError::transport(cause),
            })?;
            parse(&self.client, response)
        });
        if let Err(err) = &result {
            warn!(operation = ?op, kind = ?err.kind, status = ?err.status, "{}", err.message);
        }
        result
    }
}
