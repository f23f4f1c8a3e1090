//! `ucloud_vpc` resource
//!
//! Only `cidr_blocks` can change in place. Additions go through
//! AddVPCNetwork; removals go through UpdateVPCNetwork, which replaces the
//! whole network list since the API has no subtractive call. An apply may
//! add or remove networks but not both.

use crate::api::{
    AddVpcNetworkRequest, CreateVpcRequest, DeleteVpcRequest, UpdateVpcNetworkRequest, VpcInfo,
};
use crate::client::UCloudClient;
use crate::util::{prefixed_unique_id, timestamp_to_string};
use crate::validate::{CidrBlock, state_func_tag, validate_name, validate_tag};
use async_trait::async_trait;
use netform_cloud::{
    AttributeChange, CloudError, Plan, ReadOutcome, Refresh, Resource, Result, RetryOutcome,
    retry,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const RESOURCE_TYPE: &str = "ucloud_vpc";
const NAME_PREFIX: &str = "tf-vpc-";

/// Declared VPC configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpcConfig {
    #[serde(default)]
    pub name: Option<String>,

    pub cidr_blocks: BTreeSet<CidrBlock>,

    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub remark: Option<String>,
}

impl VpcConfig {
    /// Parse and validate the CIDR blocks of a new configuration
    pub fn new<I, S>(cidr_blocks: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cidr_blocks = cidr_blocks
            .into_iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<BTreeSet<CidrBlock>>>()?;

        let config = Self {
            name: None,
            cidr_blocks,
            tag: None,
            remark: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cidr_blocks.is_empty() {
            return Err(CloudError::validation(
                "cidr_blocks",
                "at least one CIDR block is required",
            ));
        }
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(tag) = &self.tag {
            validate_tag("tag", tag)?;
        }
        Ok(())
    }

    fn network(&self) -> Vec<String> {
        self.cidr_blocks.iter().map(ToString::to_string).collect()
    }
}

/// One entry of the computed `network_info` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub cidr_block: String,
}

/// Refreshed VPC state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpcState {
    pub id: String,
    pub name: String,
    pub cidr_blocks: BTreeSet<CidrBlock>,
    pub tag: String,
    pub remark: String,
    pub network_info: Vec<NetworkInfo>,
    pub create_time: String,
    pub update_time: String,
}

impl VpcState {
    fn from_info(info: VpcInfo, remark: String) -> Result<Self> {
        let cidr_blocks = info
            .network
            .iter()
            .map(|s| s.parse())
            .collect::<Result<BTreeSet<CidrBlock>>>()
            .map_err(|e| CloudError::api("DescribeVPC", "vpc", &info.vpc_id, e))?;

        Ok(Self {
            name: info.name,
            tag: info.tag,
            remark,
            cidr_blocks,
            network_info: info
                .network_info
                .into_iter()
                .map(|n| NetworkInfo {
                    cidr_block: n.network,
                })
                .collect(),
            create_time: timestamp_to_string(info.create_time),
            update_time: timestamp_to_string(info.update_time),
            id: info.vpc_id,
        })
    }

    /// Configuration equivalent to this state, with computed values filled in
    pub fn to_config(&self) -> VpcConfig {
        VpcConfig {
            name: Some(self.name.clone()),
            cidr_blocks: self.cidr_blocks.clone(),
            tag: Some(self.tag.clone()),
            remark: Some(self.remark.clone()),
        }
    }
}

/// Accepted change of the CIDR-block set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkChange {
    Unchanged,
    /// Networks to append
    Add(Vec<CidrBlock>),
    /// Full replacement list, dropping at least one network
    Overwrite(Vec<CidrBlock>),
}

/// Reject a change that adds and removes networks in the same apply.
pub fn validate_network_update(
    old: &BTreeSet<CidrBlock>,
    new: &BTreeSet<CidrBlock>,
) -> Result<NetworkChange> {
    let added: Vec<CidrBlock> = new.difference(old).copied().collect();
    let removed: Vec<CidrBlock> = old.difference(new).copied().collect();

    match (added.is_empty(), removed.is_empty()) {
        (true, true) => Ok(NetworkChange::Unchanged),
        (false, true) => Ok(NetworkChange::Add(added)),
        (true, false) => Ok(NetworkChange::Overwrite(new.iter().copied().collect())),
        (false, false) => Err(CloudError::validation(
            "cidr_blocks",
            format!(
                "expected only create or delete operation for network, could not apply both of them \
                 (adding {}, removing {}); please apply the deletion first, and then apply the creation",
                join(&added),
                join(&removed)
            ),
        )),
    }
}

fn join(blocks: &[CidrBlock]) -> String {
    blocks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classify the change from `prior` to `proposed`
pub fn plan_change(id: &str, prior: Option<&VpcConfig>, proposed: &VpcConfig) -> Result<Plan> {
    proposed.validate()?;

    let Some(prior) = prior else {
        return Ok(Plan::create(RESOURCE_TYPE));
    };

    let mut changes = Vec::new();

    if validate_network_update(&prior.cidr_blocks, &proposed.cidr_blocks)?
        != NetworkChange::Unchanged
    {
        changes.push(AttributeChange::in_place("cidr_blocks"));
    }

    // name and remark are optional+computed: leaving them out keeps the current value
    if proposed.name.is_some() && proposed.name != prior.name {
        changes.push(AttributeChange::force_new("name"));
    }
    if state_func_tag(proposed.tag.as_deref()) != state_func_tag(prior.tag.as_deref()) {
        changes.push(AttributeChange::force_new("tag"));
    }
    if proposed.remark.is_some() && proposed.remark != prior.remark {
        changes.push(AttributeChange::force_new("remark"));
    }

    Ok(Plan::from_changes(RESOURCE_TYPE, id, changes))
}

/// VPC resource handler
#[derive(Debug, Clone)]
pub struct VpcResource {
    client: UCloudClient,
}

impl VpcResource {
    pub fn new(client: UCloudClient) -> Self {
        Self { client }
    }

    async fn read_vpc(&self, id: &str, remark: String) -> Result<ReadOutcome<VpcState>> {
        match self.client.describe_vpc_by_id(id).await {
            Ok(info) => Ok(ReadOutcome::Found(VpcState::from_info(info, remark)?)),
            Err(e) if e.is_not_found() => {
                tracing::info!(id, "VPC not found, removing from state");
                Ok(ReadOutcome::Absent)
            }
            Err(e) => Err(CloudError::api("reading", "vpc", id, e)),
        }
    }

    async fn read_existing(&self, id: &str, remark: String) -> Result<VpcState> {
        self.read_vpc(id, remark)
            .await?
            .found()
            .ok_or_else(|| CloudError::NotFound {
                resource_type: RESOURCE_TYPE.to_string(),
                id: id.to_string(),
            })
    }

    /// Poll DescribeVPC until the new VPC is visible
    async fn wait_for_initialized(&self, id: &str) -> Result<()> {
        let client = &self.client;
        let conf = client.config().timeouts.state_change_conf();

        conf.wait_for_state(&format!("vpc {id:?}"), move || async move {
            match client.describe_vpc_by_id(id).await {
                Ok(info) => Ok(Refresh::Ready(info)),
                Err(e) if e.is_not_found() => Ok(Refresh::Pending),
                Err(e) => Err(CloudError::api("reading", "vpc", id, e)),
            }
        })
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Resource for VpcResource {
    type Config = VpcConfig;
    type State = VpcState;

    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn plan(&self, prior: Option<&VpcConfig>, proposed: &VpcConfig) -> Result<Plan> {
        plan_change("", prior, proposed)
    }

    async fn create(&self, config: &VpcConfig) -> Result<VpcState> {
        config.validate()?;

        let name = config
            .name
            .clone()
            .unwrap_or_else(|| prefixed_unique_id(NAME_PREFIX));
        let req = CreateVpcRequest {
            base: self.client.config().request_base(),
            name: name.clone(),
            network: config.network(),
            tag: Some(state_func_tag(config.tag.as_deref())),
            remark: config.remark.clone(),
        };

        tracing::info!(name = %name, network = ?req.network, "Creating VPC");
        let resp = self
            .client
            .api()
            .create_vpc(req)
            .await
            .map_err(|e| CloudError::api("creating", "vpc", &name, e))?;
        let id = resp.vpc_id;

        let ready = async {
            self.wait_for_initialized(&id).await?;
            self.read_existing(&id, config.remark.clone().unwrap_or_default())
                .await
        };
        match ready.await {
            Ok(state) => {
                tracing::info!(id = %id, "VPC created");
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "VPC created but not ready");
                Err(CloudError::created_not_ready(RESOURCE_TYPE, id, e))
            }
        }
    }

    async fn read(&self, id: &str, prior: Option<&VpcState>) -> Result<ReadOutcome<VpcState>> {
        // DescribeVPC does not return the remark
        let remark = prior.map(|p| p.remark.clone()).unwrap_or_default();
        self.read_vpc(id, remark).await
    }

    async fn update(&self, id: &str, old: &VpcConfig, new: &VpcConfig) -> Result<VpcState> {
        new.validate()?;

        let plan = plan_change(id, Some(old), new)?;
        if let Some(attribute) = plan.replaced_by().first() {
            return Err(CloudError::validation(
                *attribute,
                "cannot be changed in place, the resource must be replaced",
            ));
        }

        match validate_network_update(&old.cidr_blocks, &new.cidr_blocks)? {
            NetworkChange::Unchanged => {}
            NetworkChange::Add(added) => {
                let req = AddVpcNetworkRequest {
                    base: self.client.config().request_base(),
                    vpc_id: id.to_string(),
                    network: added.iter().map(ToString::to_string).collect(),
                };
                tracing::info!(id, network = ?req.network, "AddVPCNetwork");
                self.client
                    .api()
                    .add_vpc_network(req)
                    .await
                    .map_err(|e| CloudError::api("AddVPCNetwork", "vpc", id, e))?;
            }
            NetworkChange::Overwrite(all) => {
                let req = UpdateVpcNetworkRequest {
                    base: self.client.config().request_base(),
                    vpc_id: id.to_string(),
                    network: all.iter().map(ToString::to_string).collect(),
                };
                tracing::info!(id, network = ?req.network, "UpdateVPCNetwork");
                self.client
                    .api()
                    .update_vpc_network(req)
                    .await
                    .map_err(|e| CloudError::api("UpdateVPCNetwork", "vpc", id, e))?;
            }
        }

        let remark = new.remark.clone().or_else(|| old.remark.clone());
        self.read_existing(id, remark.unwrap_or_default()).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let client = &self.client;

        match client.describe_vpc_by_id(id).await {
            Err(e) if e.is_not_found() => {
                tracing::info!(id, "VPC already deleted");
                return Ok(());
            }
            Err(e) => return Err(CloudError::api("reading", "vpc", id, e)),
            Ok(_) => {}
        }

        let req = DeleteVpcRequest {
            base: client.config().request_base(),
            vpc_id: id.to_string(),
        };
        let req = &req;
        let conf = client.config().timeouts.delete_retry();

        tracing::info!(id, "Deleting VPC");
        retry(&conf, "delete vpc", move || async move {
            if let Err(e) = client.api().delete_vpc(req.clone()).await {
                if e.is_not_found() {
                    return RetryOutcome::Done(());
                }
                return RetryOutcome::Abort(CloudError::api("deleting", "vpc", id, e));
            }

            match client.describe_vpc_by_id(id).await {
                Err(e) if e.is_not_found() => RetryOutcome::Done(()),
                Err(e) => RetryOutcome::Abort(CloudError::api(
                    "reading vpc when deleting",
                    "vpc",
                    id,
                    e,
                )),
                Ok(_) => RetryOutcome::Retry(CloudError::api(
                    "deleting",
                    "vpc",
                    id,
                    "the specified vpc has not been deleted due to unknown error",
                )),
            }
        })
        .await
    }
}
