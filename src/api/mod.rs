//! Language pack REST resources.
//!
//! The controllers here are framework-free: they take a [`Request`] and
//! return a [`Response`] carrying the status code and JSON body, leaving the
//! HTTP binding to whatever server hosts them. Storage goes through an
//! injected [`LanguagePackHandler`].

pub mod controller;
pub mod error;
pub mod handler;

use serde::Serialize;
use serde_json::Value;

pub use controller::{LanguagePackController, LanguagePacksController};
pub use error::{ApiError, Fault, MISSING_DATA};
pub use handler::LanguagePackHandler;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Incoming request as seen by a controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub body: Option<String>,
    pub content_type: Option<String>,
    /// Scheme and authority used to build resource URIs
    pub host_url: String,
}

impl Request {
    pub fn new(host_url: &str) -> Self {
        Self {
            host_url: host_url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_json_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self.content_type = Some(JSON_CONTENT_TYPE.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Option<Value>,
}

impl Response {
    pub fn json<T: Serialize>(status: u16, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self {
                status,
                body: Some(value),
            },
            Err(err) => Self::error(&ApiError::Internal(err.into())),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn error(err: &ApiError) -> Self {
        Self {
            status: err.status(),
            body: serde_json::to_value(err.fault()).ok(),
        }
    }

    /// `faultstring` of an error response
    pub fn faultstring(&self) -> Option<&str> {
        self.body.as_ref()?.get("faultstring")?.as_str()
    }
}
