//! `ucloud_subnet` resource

use crate::api::{
    CreateSubnetRequest, DeleteSubnetRequest, SubnetInfo, UpdateSubnetAttributeRequest,
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

pub const RESOURCE_TYPE: &str = "ucloud_subnet";
const NAME_PREFIX: &str = "tf-subnet-";

/// Declared subnet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetConfig {
    pub vpc_id: String,

    pub cidr_block: CidrBlock,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub remark: Option<String>,
}

impl SubnetConfig {
    pub fn new(vpc_id: impl Into<String>, cidr_block: &str) -> Result<Self> {
        let config = Self {
            vpc_id: vpc_id.into(),
            cidr_block: cidr_block.parse()?,
            name: None,
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
        if self.vpc_id.trim().is_empty() {
            return Err(CloudError::validation("vpc_id", "must not be empty"));
        }
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(tag) = &self.tag {
            validate_tag("tag", tag)?;
        }
        Ok(())
    }
}

/// Refreshed subnet state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetState {
    pub id: String,
    pub vpc_id: String,
    pub cidr_block: CidrBlock,
    pub name: String,
    pub tag: String,
    pub remark: String,
    pub create_time: String,
}

impl SubnetState {
    fn from_info(info: SubnetInfo) -> Result<Self> {
        let cidr_block = info
            .cidr_block()
            .parse()
            .map_err(|e| CloudError::api("DescribeSubnet", "subnet", &info.subnet_id, e))?;

        Ok(Self {
            cidr_block,
            vpc_id: info.vpc_id,
            name: info.subnet_name,
            tag: info.tag,
            remark: info.remark,
            create_time: timestamp_to_string(info.create_time),
            id: info.subnet_id,
        })
    }

    pub fn to_config(&self) -> SubnetConfig {
        SubnetConfig {
            vpc_id: self.vpc_id.clone(),
            cidr_block: self.cidr_block,
            name: Some(self.name.clone()),
            tag: Some(self.tag.clone()),
            remark: Some(self.remark.clone()),
        }
    }
}

/// Classify the change from `prior` to `proposed`
pub fn plan_change(
    id: &str,
    prior: Option<&SubnetConfig>,
    proposed: &SubnetConfig,
) -> Result<Plan> {
    proposed.validate()?;

    let Some(prior) = prior else {
        return Ok(Plan::create(RESOURCE_TYPE));
    };

    let mut changes = Vec::new();
    if proposed.vpc_id != prior.vpc_id {
        changes.push(AttributeChange::force_new("vpc_id"));
    }
    if proposed.cidr_block != prior.cidr_block {
        changes.push(AttributeChange::force_new("cidr_block"));
    }
    if proposed.remark.is_some() && proposed.remark != prior.remark {
        changes.push(AttributeChange::force_new("remark"));
    }
    if proposed.name.is_some() && proposed.name != prior.name {
        changes.push(AttributeChange::in_place("name"));
    }
    if state_func_tag(proposed.tag.as_deref()) != state_func_tag(prior.tag.as_deref()) {
        changes.push(AttributeChange::in_place("tag"));
    }

    Ok(Plan::from_changes(RESOURCE_TYPE, id, changes))
}

/// Subnet resource handler
#[derive(Debug, Clone)]
pub struct SubnetResource {
    client: UCloudClient,
}

impl SubnetResource {
    pub fn new(client: UCloudClient) -> Self {
        Self { client }
    }

    async fn read_existing(&self, id: &str) -> Result<SubnetState> {
        self.read(id, None)
            .await?
            .found()
            .ok_or_else(|| CloudError::NotFound {
                resource_type: RESOURCE_TYPE.to_string(),
                id: id.to_string(),
            })
    }

    async fn wait_for_initialized(&self, id: &str) -> Result<()> {
        let client = &self.client;
        let conf = client.config().timeouts.state_change_conf();

        conf.wait_for_state(&format!("subnet {id:?}"), move || async move {
            match client.describe_subnet_by_id(id).await {
                Ok(info) => Ok(Refresh::Ready(info)),
                Err(e) if e.is_not_found() => Ok(Refresh::Pending),
                Err(e) => Err(CloudError::api("reading", "subnet", id, e)),
            }
        })
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Resource for SubnetResource {
    type Config = SubnetConfig;
    type State = SubnetState;

    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn plan(&self, prior: Option<&SubnetConfig>, proposed: &SubnetConfig) -> Result<Plan> {
        plan_change("", prior, proposed)
    }

    async fn create(&self, config: &SubnetConfig) -> Result<SubnetState> {
        config.validate()?;

        let name = config
            .name
            .clone()
            .unwrap_or_else(|| prefixed_unique_id(NAME_PREFIX));
        let req = CreateSubnetRequest {
            base: self.client.config().request_base(),
            vpc_id: config.vpc_id.clone(),
            subnet: config.cidr_block.network().to_string(),
            netmask: config.cidr_block.prefix(),
            subnet_name: name.clone(),
            tag: Some(state_func_tag(config.tag.as_deref())),
            remark: config.remark.clone(),
        };

        tracing::info!(
            name = %name,
            vpc_id = %config.vpc_id,
            cidr_block = %config.cidr_block,
            "Creating subnet"
        );
        let resp = self
            .client
            .api()
            .create_subnet(req)
            .await
            .map_err(|e| CloudError::api("creating", "subnet", &name, e))?;
        let id = resp.subnet_id;

        let ready = async {
            self.wait_for_initialized(&id).await?;
            self.read_existing(&id).await
        };
        match ready.await {
            Ok(state) => {
                tracing::info!(id = %id, "Subnet created");
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Subnet created but not ready");
                Err(CloudError::created_not_ready(RESOURCE_TYPE, id, e))
            }
        }
    }

    async fn read(
        &self,
        id: &str,
        _prior: Option<&SubnetState>,
    ) -> Result<ReadOutcome<SubnetState>> {
        match self.client.describe_subnet_by_id(id).await {
            Ok(info) => Ok(ReadOutcome::Found(SubnetState::from_info(info)?)),
            Err(e) if e.is_not_found() => {
                tracing::info!(id, "Subnet not found, removing from state");
                Ok(ReadOutcome::Absent)
            }
            Err(e) => Err(CloudError::api("reading", "subnet", id, e)),
        }
    }

    async fn update(
        &self,
        id: &str,
        old: &SubnetConfig,
        new: &SubnetConfig,
    ) -> Result<SubnetState> {
        let plan = plan_change(id, Some(old), new)?;
        if let Some(attribute) = plan.replaced_by().first() {
            return Err(CloudError::validation(
                *attribute,
                "cannot be changed in place, the resource must be replaced",
            ));
        }

        if plan.has_changes() {
            let mut req = UpdateSubnetAttributeRequest {
                base: self.client.config().request_base(),
                subnet_id: id.to_string(),
                name: None,
                tag: None,
            };
            for change in &plan.changes {
                match change.attribute.as_str() {
                    "name" => req.name = new.name.clone(),
                    "tag" => req.tag = Some(state_func_tag(new.tag.as_deref())),
                    _ => {}
                }
            }

            tracing::info!(id, name = ?req.name, tag = ?req.tag, "UpdateSubnetAttribute");
            self.client
                .api()
                .update_subnet_attribute(req)
                .await
                .map_err(|e| CloudError::api("UpdateSubnetAttribute", "subnet", id, e))?;
        }

        self.read_existing(id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let client = &self.client;

        match client.describe_subnet_by_id(id).await {
            Err(e) if e.is_not_found() => {
                tracing::info!(id, "Subnet already deleted");
                return Ok(());
            }
            Err(e) => return Err(CloudError::api("reading", "subnet", id, e)),
            Ok(_) => {}
        }

        let req = DeleteSubnetRequest {
            base: client.config().request_base(),
            subnet_id: id.to_string(),
        };
        let req = &req;
        let conf = client.config().timeouts.delete_retry();

        tracing::info!(id, "Deleting subnet");
        retry(&conf, "delete subnet", move || async move {
            if let Err(e) = client.api().delete_subnet(req.clone()).await {
                if e.is_not_found() {
                    return RetryOutcome::Done(());
                }
                return RetryOutcome::Abort(CloudError::api("deleting", "subnet", id, e));
            }

            match client.describe_subnet_by_id(id).await {
                Err(e) if e.is_not_found() => RetryOutcome::Done(()),
                Err(e) => RetryOutcome::Abort(CloudError::api(
                    "reading subnet when deleting",
                    "subnet",
                    id,
                    e,
                )),
                Ok(_) => RetryOutcome::Retry(CloudError::api(
                    "deleting",
                    "subnet",
                    id,
                    "the specified subnet has not been deleted due to unknown error",
                )),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netform_cloud::ActionType;

    #[test]
    fn test_config_validation() {
        assert!(SubnetConfig::new("uvnet-1", "192.168.1.0/24").is_ok());
        assert!(SubnetConfig::new("", "192.168.1.0/24").is_err());
        assert!(SubnetConfig::new("uvnet-1", "192.168.1.1/24").is_err());
    }

    #[test]
    fn test_plan_change() {
        let prior = SubnetConfig::new("uvnet-1", "192.168.1.0/24")
            .unwrap()
            .with_name("web")
            .with_tag("Default")
            .with_remark("");

        let same = SubnetConfig::new("uvnet-1", "192.168.1.0/24").unwrap();
        assert_eq!(
            plan_change("subnet-1", Some(&prior), &same).unwrap().action_type,
            ActionType::NoOp
        );

        let renamed = same.clone().with_name("api").with_tag("prod");
        let plan = plan_change("subnet-1", Some(&prior), &renamed).unwrap();
        assert_eq!(plan.action_type, ActionType::Update);
        assert_eq!(plan.changes.len(), 2);

        let moved = SubnetConfig::new("uvnet-1", "192.168.2.0/24").unwrap();
        let plan = plan_change("subnet-1", Some(&prior), &moved).unwrap();
        assert_eq!(plan.action_type, ActionType::Replace);
        assert_eq!(plan.replaced_by(), vec!["cidr_block"]);
    }
}
