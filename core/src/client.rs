//! Stateless HTTP request builder and response parser for the count API.
//!
//! # Design
//! `CountClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! [`crate::CountSdk`] pairs them with a transport; this module never touches
//! the network.
//!
//! Parsing follows one protocol for every operation: a non-2xx status, an
//! envelope reporting failure, or a missing payload each become an
//! [`SdkError`] carrying the server's message or a per-operation fallback.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ErrorKind, SdkError, SdkResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Count, CreateCount, Envelope, UpdateCount};

const COUNTS_PATH: &str = "/counts";

/// Which count operation a request or response belongs to.
///
/// Carries the target id so fallback messages can name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get(i64),
    Create,
    Update(i64),
    Delete(i64),
    Increment(i64),
    Decrement(i64),
}

impl Operation {
    /// Message used when the server gives no `error` field of its own.
    pub fn fallback_message(self) -> String {
        match self {
            Operation::List => "Failed to get counts".to_string(),
            Operation::Get(id) => format!("Failed to get count with id {id}"),
            Operation::Create => "Failed to create count".to_string(),
            Operation::Update(id) => format!("Failed to update count with id {id}"),
            Operation::Delete(id) => format!("Failed to delete count with id {id}"),
            Operation::Increment(id) => format!("Failed to increment count with id {id}"),
            Operation::Decrement(id) => format!("Failed to decrement count with id {id}"),
        }
    }
}

/// Synchronous, stateless client for the count API.
#[derive(Debug, Clone)]
pub struct CountClient {
    base_url: String,
}

impl CountClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_counts(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}{COUNTS_PATH}", self.base_url))
    }

    pub fn build_get_count(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Get, self.count_url(id))
    }

    pub fn build_create_count(&self, input: &CreateCount) -> SdkResult<HttpRequest> {
        let path = format!("{}{COUNTS_PATH}", self.base_url);
        with_json_body(HttpMethod::Post, path, input, Operation::Create)
    }

    pub fn build_update_count(&self, id: i64, input: &UpdateCount) -> SdkResult<HttpRequest> {
        with_json_body(HttpMethod::Put, self.count_url(id), input, Operation::Update(id))
    }

    pub fn build_delete_count(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Delete, self.count_url(id))
    }

    pub fn build_increment_count(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Patch, format!("{}/increment", self.count_url(id)))
    }

    pub fn build_decrement_count(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Patch, format!("{}/decrement", self.count_url(id)))
    }

    /// An absent `data` on a successful list is an empty collection.
    pub fn parse_list_counts(&self, response: HttpResponse) -> SdkResult<Vec<Count>> {
        let data = parse_envelope::<Vec<Count>>(&response, Operation::List)?;
        Ok(data.unwrap_or_default())
    }

    pub fn parse_get_count(&self, id: i64, response: HttpResponse) -> SdkResult<Count> {
        parse_record(&response, Operation::Get(id), || not_found(id))
    }

    pub fn parse_create_count(&self, response: HttpResponse) -> SdkResult<Count> {
        parse_record(&response, Operation::Create, no_data_returned)
    }

    pub fn parse_update_count(&self, id: i64, response: HttpResponse) -> SdkResult<Count> {
        parse_record(&response, Operation::Update(id), || not_found(id))
    }

    /// Returns the record as it was before deletion.
    pub fn parse_delete_count(&self, id: i64, response: HttpResponse) -> SdkResult<Count> {
        parse_record(&response, Operation::Delete(id), || not_found(id))
    }

    pub fn parse_increment_count(&self, id: i64, response: HttpResponse) -> SdkResult<Count> {
        parse_record(&response, Operation::Increment(id), || not_found(id))
    }

    pub fn parse_decrement_count(&self, id: i64, response: HttpResponse) -> SdkResult<Count> {
        parse_record(&response, Operation::Decrement(id), || not_found(id))
    }

    fn count_url(&self, id: i64) -> String {
        format!("{}{COUNTS_PATH}/{id}", self.base_url)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }
}

fn with_json_body<B: Serialize>(
    method: HttpMethod,
    path: String,
    input: &B,
    op: Operation,
) -> SdkResult<HttpRequest> {
    let body = serde_json::to_string(input)
        .map_err(|e| SdkError::new(ErrorKind::Encode, op.fallback_message(), None).with_cause(e))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Decode a single-record response; `missing` decides what an absent
/// record means for this operation.
fn parse_record(
    response: &HttpResponse,
    op: Operation,
    missing: impl FnOnce() -> SdkError,
) -> SdkResult<Count> {
    parse_envelope::<Count>(response, op)?.ok_or_else(missing)
}

fn not_found(id: i64) -> SdkError {
    SdkError::new(
        ErrorKind::ContractViolation,
        format!("Count with id {id} not found"),
        Some(404),
    )
}

/// A create can never legitimately come back empty.
fn no_data_returned() -> SdkError {
    SdkError::new(
        ErrorKind::ContractViolation,
        "Failed to create count - no data returned",
        Some(500),
    )
}

/// Apply the status and envelope checks shared by every operation.
///
/// `success` and `error` are read before `data` is decoded, so a failure
/// envelope keeps its message even when `data` has an unexpected shape.
/// Returns the envelope's `data`, which may still be absent.
fn parse_envelope<T: DeserializeOwned>(response: &HttpResponse, op: Operation) -> SdkResult<Option<T>> {
    if !response.is_success() {
        return Err(SdkError::new(
            ErrorKind::HttpStatus,
            server_message(&response.body).unwrap_or_else(|| op.fallback_message()),
            Some(response.status),
        ));
    }

    let decode_error = |e: serde_json::Error| {
        SdkError::new(ErrorKind::Decode, op.fallback_message(), Some(response.status)).with_cause(e)
    };
    let value: Value = serde_json::from_str(&response.body).map_err(decode_error)?;

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = error_field(&value).unwrap_or_else(|| op.fallback_message());
        return Err(SdkError::new(ErrorKind::Application, message, Some(response.status)));
    }

    let envelope: Envelope<T> = serde_json::from_value(value).map_err(decode_error)?;
    Ok(envelope.data)
}

/// Pull the `error` field out of an error body, whatever else it holds.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    error_field(&value)
}

fn error_field(value: &Value) -> Option<String> {
    value
        .get("error")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
