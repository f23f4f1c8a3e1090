//! Provider configuration
//!
//! Built from environment variables or a YAML/JSON file:
//!
//! ```yaml
//! region: cn-bj2
//! project_id: org-xxxx
//! timeouts:
//!   create: 180
//!   delete: 300
//! ```

use crate::api::RequestBase;
use crate::error::{Result, UCloudError};
use netform_cloud::{RetryConfig, StateChangeConf};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.ucloud.cn";

/// Timeouts for long-running operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Ceiling for waiting on a newly created resource
    #[serde(with = "duration_secs")]
    pub create: Duration,

    /// Ceiling for the delete-then-check loop
    #[serde(with = "duration_secs")]
    pub delete: Duration,

    /// Wait before the first state refresh
    #[serde(with = "duration_secs")]
    pub poll_delay: Duration,

    /// Wait between state refreshes
    #[serde(with = "duration_secs")]
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(3 * 60),
            delete: Duration::from_secs(5 * 60),
            poll_delay: Duration::from_secs(2),
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl Timeouts {
    pub fn state_change_conf(&self) -> StateChangeConf {
        StateChangeConf {
            delay: self.poll_delay,
            min_interval: self.poll_interval,
            timeout: self.create,
        }
    }

    pub fn delete_retry(&self) -> RetryConfig {
        RetryConfig::with_timeout(self.delete)
    }
}

/// UCloud provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub region: String,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub timeouts: Timeouts,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ProviderConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            project_id: None,
            base_url: default_base_url(),
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Create ProviderConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let region = std::env::var("UCLOUD_REGION")
            .map_err(|_| UCloudError::MissingEnvVar("UCLOUD_REGION".to_string()))?;
        let project_id = std::env::var("UCLOUD_PROJECT_ID").ok();
        let base_url = std::env::var("UCLOUD_API_URL").unwrap_or_else(|_| default_base_url());

        let config = Self {
            region,
            project_id,
            base_url,
            timeouts: Timeouts::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => {
                return Err(UCloudError::InvalidConfig(format!(
                    "unsupported config file format: {}",
                    path.display()
                )));
            }
        };

        config.validate()?;
        tracing::debug!(region = %config.region, "Loaded provider config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(UCloudError::InvalidConfig("region must not be empty".to_string()));
        }
        if self.timeouts.create.is_zero() || self.timeouts.delete.is_zero() {
            return Err(UCloudError::InvalidConfig(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Common parameters for every request
    pub fn request_base(&self) -> RequestBase {
        RequestBase {
            region: self.region.clone(),
            project_id: self.project_id.clone(),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_from_yaml_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("ucloud.yaml");
        fs::write(
            &path,
            "region: cn-bj2\nproject_id: org-test\ntimeouts:\n  create: 60\n",
        )
        .unwrap();

        let config = ProviderConfig::from_file(&path).unwrap();
        assert_eq!(config.region, "cn-bj2");
        assert_eq!(config.project_id.as_deref(), Some("org-test"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeouts.create, Duration::from_secs(60));
        // unspecified timeouts keep their defaults
        assert_eq!(config.timeouts.delete, Duration::from_secs(300));
    }

    #[test]
    fn test_from_json_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("ucloud.json");
        fs::write(&path, r#"{"region": "hk", "base_url": "http://localhost:8080"}"#).unwrap();

        let config = ProviderConfig::from_file(&path).unwrap();
        assert_eq!(config.region, "hk");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeouts, Timeouts::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("ucloud.toml");
        fs::write(&path, "region = \"hk\"").unwrap();

        assert!(matches!(
            ProviderConfig::from_file(&path),
            Err(UCloudError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_region_rejected() {
        assert!(ProviderConfig::new("  ").validate().is_err());
        assert!(ProviderConfig::new("cn-bj2").validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("UCLOUD_REGION", Some("cn-sh2")),
                ("UCLOUD_PROJECT_ID", Some("org-env")),
                ("UCLOUD_API_URL", None),
            ],
            || {
                let config = ProviderConfig::from_env().unwrap();
                assert_eq!(config.region, "cn-sh2");
                assert_eq!(config.project_id.as_deref(), Some("org-env"));
                assert_eq!(config.base_url, DEFAULT_BASE_URL);
            },
        );
    }

    #[test]
    #[serial]
    fn test_from_env_missing_region() {
        temp_env::with_var_unset("UCLOUD_REGION", || {
            assert!(matches!(
                ProviderConfig::from_env(),
                Err(UCloudError::MissingEnvVar(_))
            ));
        });
    }

    #[test]
    fn test_request_base() {
        let base = ProviderConfig::new("cn-bj2")
            .with_project_id("org-1")
            .request_base();
        assert_eq!(base.region, "cn-bj2");
        assert_eq!(base.project_id.as_deref(), Some("org-1"));
    }
}
