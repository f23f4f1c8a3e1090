//! Resource lifecycle error types

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by resource handlers
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {resource_type} {id:?}")]
    NotFound { resource_type: String, id: String },

    #[error("error on {operation} {resource_type} {id:?}, {message}")]
    Api {
        operation: String,
        resource_type: String,
        id: String,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation failed for {attribute:?}: {message}")]
    Validation { attribute: String, message: String },

    #[error("Timeout after {elapsed:?}: {message}")]
    Timeout { elapsed: Duration, message: String },

    /// The remote create succeeded but the resource never became usable.
    /// `id` must be kept so the resource can be deleted later.
    #[error("{resource_type} {id:?} was created but is not ready: {source}")]
    CreatedNotReady {
        resource_type: String,
        id: String,
        source: Box<CloudError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Wrap a remote failure with the operation name and resource identifier.
    pub fn api(
        operation: impl Into<String>,
        resource_type: impl Into<String>,
        id: impl Into<String>,
        err: impl std::fmt::Display,
    ) -> Self {
        CloudError::Api {
            operation: operation.into(),
            resource_type: resource_type.into(),
            id: id.into(),
            message: err.to_string(),
        }
    }

    pub fn validation(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        CloudError::Validation {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    pub fn created_not_ready(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        source: CloudError,
    ) -> Self {
        CloudError::CreatedNotReady {
            resource_type: resource_type.into(),
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// Identifier of a resource left behind by a failed create
    pub fn created_id(&self) -> Option<&str> {
        match self {
            CloudError::CreatedNotReady { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::NotFound { .. })
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            CloudError::Timeout { .. } => true,
            CloudError::CreatedNotReady { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
