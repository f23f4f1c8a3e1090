//! UCloud VPC API surface
//!
//! Request and response types use the PascalCase wire names of the UCloud
//! API. The transport itself (signing, HTTP, transport-level retries) lives
//! behind [`VpcApi`] and is supplied by the embedding program.

use crate::error::{Result, UCloudError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Remote calls consumed by the VPC and subnet handlers
#[async_trait]
pub trait VpcApi: Send + Sync {
    async fn create_vpc(&self, req: CreateVpcRequest) -> Result<CreateVpcResponse>;

    async fn describe_vpc(&self, req: DescribeVpcRequest) -> Result<DescribeVpcResponse>;

    /// Append networks to a VPC
    async fn add_vpc_network(&self, req: AddVpcNetworkRequest) -> Result<()>;

    /// Replace the full network list of a VPC
    async fn update_vpc_network(&self, req: UpdateVpcNetworkRequest) -> Result<()>;

    async fn delete_vpc(&self, req: DeleteVpcRequest) -> Result<()>;

    async fn create_subnet(&self, req: CreateSubnetRequest) -> Result<CreateSubnetResponse>;

    async fn describe_subnet(&self, req: DescribeSubnetRequest) -> Result<DescribeSubnetResponse>;

    async fn update_subnet_attribute(&self, req: UpdateSubnetAttributeRequest) -> Result<()>;

    async fn delete_subnet(&self, req: DeleteSubnetRequest) -> Result<()>;
}

/// Parameters shared by every request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBase {
    #[serde(rename = "Region")]
    pub region: String,

    #[serde(rename = "ProjectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// Response envelope returned by every action
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "RetCode")]
    pub ret_code: i32,

    #[serde(rename = "Action", default)]
    pub action: String,

    #[serde(rename = "Message", default)]
    pub message: String,

    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, turning a non-zero RetCode into an error
    pub fn into_result(self) -> Result<T> {
        if self.ret_code != 0 {
            let message = if self.message.is_empty() {
                format!("{} failed", self.action)
            } else {
                self.message
            };
            return Err(UCloudError::Api {
                code: self.ret_code,
                message,
            });
        }
        Ok(self.data)
    }
}

// --- VPC ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateVpcRequest {
    #[serde(flatten)]
    pub base: RequestBase,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Network")]
    pub network: Vec<String>,

    #[serde(rename = "Tag", skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(rename = "Remark", skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateVpcResponse {
    #[serde(rename = "VPCId")]
    pub vpc_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeVpcRequest {
    #[serde(flatten)]
    pub base: RequestBase,

    #[serde(rename = "VPCIds")]
    pub vpc_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeVpcResponse {
    #[serde(rename = "DataSet", default)]
    pub data_set: Vec<VpcInfo>,
}

/// VPC as returned by DescribeVPC
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcInfo {
    #[serde(rename = "VPCId")]
    pub vpc_id: String,

    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "Tag", default)]
    pub tag: String,

    #[serde(rename = "Network", default)]
    pub network: Vec<String>,

    #[serde(rename = "NetworkInfo", default)]
    pub network_info: Vec<VpcNetworkInfo>,

    #[serde(rename = "SubnetCount", default)]
    pub subnet_count: i32,

    /// Unix seconds
    #[serde(rename = "CreateTime", default)]
    pub create_time: i64,

    /// Unix seconds
    #[serde(rename = "UpdateTime", default)]
    pub update_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcNetworkInfo {
    #[serde(rename = "Network")]
    pub network: String,

    #[serde(rename = "SubnetCount", default)]
    pub subnet_count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddVpcNetworkRequest {
    #[serde(flatten)]
    pub base: RequestBase,

    #[serde(rename = "VPCId")]
    pub vpc_id: String,

    #[serde(rename = "Network")]
    pub network: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateVpcNetworkRequest {
    #[serde(flatten)]
    pub base: RequestBase,

    #[serde(rename = "VPCId")]
    pub vpc_id: String,

    #[serde(rename = "Network")]
    pub network: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteVpcRequest {
    #[serde(flatten)]
    pub base: RequestBase,

    #[serde(rename = "VPCId")]
    pub vpc_id: String,
}

// --- Subnet ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSubnetRequest {
    #[serde(flatten)]
    pub base: RequestBase,

    #[serde(rename = "VPCId")]
    pub vpc_id: String,

    /// Network address, e.g. "192.168.1.0"
    #[serde(rename = "Subnet")]
    pub subnet: String,

    #[serde(rename = "Netmask")]
    pub netmask: u8,

    #[serde(rename = "SubnetName")]
    pub subnet_name: String,

    #[serde(rename = "Tag", skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(rename = "Remark", skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSubnetResponse {
    #[serde(rename = "SubnetId")]
    pub subnet_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeSubnetRequest {
    #[serde(flatten)]
    pub base: RequestBase,

    #[serde(rename = "SubnetIds")]
    pub subnet_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeSubnetResponse {
    #[serde(rename = "DataSet", default)]
    pub data_set: Vec<SubnetInfo>,
}

/// Subnet as returned by DescribeSubnet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubnetInfo {
    #[serde(rename = "SubnetId")]
    pub subnet_id: String,

    #[serde(rename = "SubnetName", default)]
    pub subnet_name: String,

    #[serde(rename = "VPCId", default)]
    pub vpc_id: String,

    #[serde(rename = "Subnet", default)]
    pub subnet: String,

    #[serde(rename = "Netmask", default)]
    pub netmask: u8,

    #[serde(rename = "Tag", default)]
    pub tag: String,

    #[serde(rename = "Remark", default)]
    pub remark: String,

    /// Unix seconds
    #[serde(rename = "CreateTime", default)]
    pub create_time: i64,
}

impl SubnetInfo {
    /// CIDR notation, e.g. "192.168.1.0/24"
    pub fn cidr_block(&self) -> String {
        format!("{}/{}", self.subnet, self.netmask)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSubnetAttributeRequest {
    #[serde(flatten)]
    pub base: RequestBase,

    #[serde(rename = "SubnetId")]
    pub subnet_id: String,

    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Tag", skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteSubnetRequest {
    #[serde(flatten)]
    pub base: RequestBase,

    #[serde(rename = "SubnetId")]
    pub subnet_id: String,
}
