//! UCloud networking provider for netform
//!
//! This crate implements the `Resource` trait for UCloud VPCs and subnets,
//! translating declared configuration into VPC API calls.
//!
//! # Resources
//!
//! - `ucloud_vpc`: create, read, CIDR-block updates, delete, import
//! - `ucloud_subnet`: create, read, name/tag updates, delete, import
//!
//! # Requirements
//!
//! - A [`VpcApi`] transport (request signing and HTTP live in the embedding program)
//! - `UCLOUD_REGION` (and optionally `UCLOUD_PROJECT_ID`) for [`ProviderConfig::from_env`]
//!
//! # Example
//!
//! ```ignore
//! use netform_cloud::Resource;
//! use netform_cloud_ucloud::{ProviderConfig, UCloudClient, VpcConfig, VpcResource};
//!
//! let client = UCloudClient::new(transport, ProviderConfig::from_env()?);
//! let vpc = VpcResource::new(client);
//!
//! let state = vpc.create(&VpcConfig::new(["192.168.0.0/16"])?).await?;
//! println!("created {} ({})", state.id, state.name);
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod subnet;
pub mod util;
pub mod validate;
pub mod vpc;

pub use api::VpcApi;
pub use client::UCloudClient;
pub use config::{ProviderConfig, Timeouts};
pub use error::{Result, UCloudError};
pub use subnet::{SubnetConfig, SubnetResource, SubnetState};
pub use validate::{CidrBlock, DEFAULT_TAG};
pub use vpc::{
    NetworkChange, NetworkInfo, VpcConfig, VpcResource, VpcState, validate_network_update,
};
