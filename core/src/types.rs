//! Domain DTOs for the count API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! `updated_at` is always taken from the server; the client never stamps it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single count record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Count {
    pub id: i64,
    pub value: i64,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a new count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCount {
    pub value: i64,
}

/// Request payload for replacing the value of an existing count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateCount {
    pub value: i64,
}

/// Wrapper every backend response uses.
///
/// When `success` is false the server leaves `data` out and should fill in
/// `error`. Single-resource calls reporting success must carry `data`; the
/// parser in [`crate::client`] enforces that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
