use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fault message for create/update requests that carry no body
pub const MISSING_DATA: &str = "Missing argument: \"data\"";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The {name} resource {id} could not be found.")]
    ResourceNotFound { name: String, id: String },

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(name: &str, id: &str) -> Self {
        ApiError::ResourceNotFound {
            name: name.to_string(),
            id: id.to_string(),
        }
    }

    pub fn missing_data() -> Self {
        ApiError::BadRequest(MISSING_DATA.to_string())
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::ResourceNotFound { .. } => 404,
            ApiError::BadRequest(_) => 400,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn fault(&self) -> Fault {
        let faultcode = if self.status() < 500 { "Client" } else { "Server" };
        Fault {
            faultcode: faultcode.to_string(),
            faultstring: self.to_string(),
        }
    }
}

/// Error body returned to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub faultcode: String,
    pub faultstring: String,
}
