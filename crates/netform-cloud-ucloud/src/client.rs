//! Provider context handed to every resource handler

use crate::api::{DescribeSubnetRequest, DescribeVpcRequest, SubnetInfo, VpcApi, VpcInfo};
use crate::config::ProviderConfig;
use crate::error::{Result, UCloudError};
use std::sync::Arc;

/// Transport plus configuration for one provider instance
#[derive(Clone)]
pub struct UCloudClient {
    api: Arc<dyn VpcApi>,
    config: Arc<ProviderConfig>,
}

impl std::fmt::Debug for UCloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UCloudClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UCloudClient {
    pub fn new(api: Arc<dyn VpcApi>, config: ProviderConfig) -> Self {
        Self {
            api,
            config: Arc::new(config),
        }
    }

    pub fn api(&self) -> &dyn VpcApi {
        self.api.as_ref()
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Get a VPC by ID. An empty result set is reported as not found.
    pub async fn describe_vpc_by_id(&self, id: &str) -> Result<VpcInfo> {
        let req = DescribeVpcRequest {
            base: self.config.request_base(),
            vpc_ids: vec![id.to_string()],
        };

        tracing::debug!(id, "DescribeVPC");
        let resp = self.api.describe_vpc(req).await?;

        resp.data_set
            .into_iter()
            .find(|v| v.vpc_id == id)
            .ok_or_else(|| UCloudError::not_found("vpc", id))
    }

    /// Get a subnet by ID. An empty result set is reported as not found.
    pub async fn describe_subnet_by_id(&self, id: &str) -> Result<SubnetInfo> {
        let req = DescribeSubnetRequest {
            base: self.config.request_base(),
            subnet_ids: vec![id.to_string()],
        };

        tracing::debug!(id, "DescribeSubnet");
        let resp = self.api.describe_subnet(req).await?;

        resp.data_set
            .into_iter()
            .find(|s| s.subnet_id == id)
            .ok_or_else(|| UCloudError::not_found("subnet", id))
    }
}
