//! UCloud provider error types

use netform_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UCloudError {
    #[error("{resource_type} {id:?} not found")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    #[error("API error (RetCode {code}): {message}")]
    Api { code: i32, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl UCloudError {
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        UCloudError::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, UCloudError::NotFound { .. })
    }
}

impl From<UCloudError> for CloudError {
    fn from(err: UCloudError) -> Self {
        match err {
            UCloudError::NotFound { resource_type, id } => CloudError::NotFound {
                resource_type: resource_type.to_string(),
                id,
            },
            UCloudError::InvalidConfig(msg) => CloudError::InvalidConfig(msg),
            UCloudError::MissingEnvVar(var) => {
                CloudError::InvalidConfig(format!("missing environment variable {var}"))
            }
            UCloudError::JsonError(e) => CloudError::Json(e),
            UCloudError::IoError(e) => CloudError::Io(e),
            UCloudError::YamlError(e) => CloudError::InvalidConfig(e.to_string()),
            other @ (UCloudError::Api { .. } | UCloudError::Transport(_)) => {
                CloudError::api("request", "ucloud", "", other)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, UCloudError>;
