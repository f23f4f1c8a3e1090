use async_trait::async_trait;
use netform_cloud_ucloud::api::*;
use netform_cloud_ucloud::{ProviderConfig, Result, UCloudClient, UCloudError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A remote call observed by [`FakeApi`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateVpc(CreateVpcRequest),
    DescribeVpc(Vec<String>),
    AddVpcNetwork(Vec<String>),
    UpdateVpcNetwork(Vec<String>),
    DeleteVpc(String),
    CreateSubnet(CreateSubnetRequest),
    DescribeSubnet(Vec<String>),
    UpdateSubnetAttribute(UpdateSubnetAttributeRequest),
    DeleteSubnet(String),
}

#[derive(Default)]
struct Inner {
    vpcs: HashMap<String, VpcInfo>,
    subnets: HashMap<String, SubnetInfo>,
    calls: Vec<Call>,
    next_id: u32,
    /// Describe calls that still report a freshly created resource as missing
    invisible_reads: u32,
    /// Delete calls succeed but the resource stays
    stuck_delete: bool,
    /// Delete calls fail with an API error
    fail_delete: bool,
    /// Describe calls fail with an API error
    fail_describe: bool,
}

/// In-memory VPC API that records every call
#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Arc<Mutex<Inner>>,
}

#[allow(dead_code)]
impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> UCloudClient {
        UCloudClient::new(Arc::new(self.clone()), ProviderConfig::new("cn-bj2"))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Calls other than Describe*
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::DescribeVpc(_) | Call::DescribeSubnet(_)))
            .collect()
    }

    pub fn set_invisible_reads(&self, n: u32) {
        self.inner.lock().unwrap().invisible_reads = n;
    }

    pub fn set_stuck_delete(&self, stuck: bool) {
        self.inner.lock().unwrap().stuck_delete = stuck;
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.inner.lock().unwrap().fail_delete = fail;
    }

    pub fn set_fail_describe(&self, fail: bool) {
        self.inner.lock().unwrap().fail_describe = fail;
    }

    pub fn insert_vpc(&self, id: &str, network: &[&str]) {
        let info = VpcInfo {
            vpc_id: id.to_string(),
            name: format!("{id}-name"),
            tag: "Default".to_string(),
            network: network.iter().map(|s| s.to_string()).collect(),
            network_info: network
                .iter()
                .map(|s| VpcNetworkInfo {
                    network: s.to_string(),
                    subnet_count: 0,
                })
                .collect(),
            subnet_count: 0,
            create_time: 1546300800,
            update_time: 1546300800,
        };
        self.inner.lock().unwrap().vpcs.insert(id.to_string(), info);
    }

    pub fn remove_vpc(&self, id: &str) {
        self.inner.lock().unwrap().vpcs.remove(id);
    }

    pub fn vpc(&self, id: &str) -> Option<VpcInfo> {
        self.inner.lock().unwrap().vpcs.get(id).cloned()
    }

    pub fn subnet(&self, id: &str) -> Option<SubnetInfo> {
        self.inner.lock().unwrap().subnets.get(id).cloned()
    }

    fn api_error(message: &str) -> UCloudError {
        UCloudError::Api {
            code: 230,
            message: message.to_string(),
        }
    }
}

fn network_info(network: &[String]) -> Vec<VpcNetworkInfo> {
    network
        .iter()
        .map(|n| VpcNetworkInfo {
            network: n.clone(),
            subnet_count: 0,
        })
        .collect()
}

#[async_trait]
impl VpcApi for FakeApi {
    async fn create_vpc(&self, req: CreateVpcRequest) -> Result<CreateVpcResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::CreateVpc(req.clone()));
        inner.next_id += 1;
        let id = format!("uvnet-{:04}", inner.next_id);

        let info = VpcInfo {
            vpc_id: id.clone(),
            name: req.name,
            tag: req.tag.unwrap_or_default(),
            network_info: network_info(&req.network),
            network: req.network,
            subnet_count: 0,
            create_time: 1546300800,
            update_time: 1546300800,
        };
        inner.vpcs.insert(id.clone(), info);
        Ok(CreateVpcResponse { vpc_id: id })
    }

    async fn describe_vpc(&self, req: DescribeVpcRequest) -> Result<DescribeVpcResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DescribeVpc(req.vpc_ids.clone()));
        if inner.fail_describe {
            return Err(Self::api_error("describe failed"));
        }
        if inner.invisible_reads > 0 {
            inner.invisible_reads -= 1;
            return Ok(DescribeVpcResponse::default());
        }

        let data_set = req
            .vpc_ids
            .iter()
            .filter_map(|id| inner.vpcs.get(id).cloned())
            .collect();
        Ok(DescribeVpcResponse { data_set })
    }

    async fn add_vpc_network(&self, req: AddVpcNetworkRequest) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::AddVpcNetwork(req.network.clone()));
        let vpc = inner
            .vpcs
            .get_mut(&req.vpc_id)
            .ok_or_else(|| UCloudError::not_found("vpc", &req.vpc_id))?;
        vpc.network.extend(req.network);
        vpc.network_info = network_info(&vpc.network);
        vpc.update_time += 60;
        Ok(())
    }

    async fn update_vpc_network(&self, req: UpdateVpcNetworkRequest) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::UpdateVpcNetwork(req.network.clone()));
        let vpc = inner
            .vpcs
            .get_mut(&req.vpc_id)
            .ok_or_else(|| UCloudError::not_found("vpc", &req.vpc_id))?;
        vpc.network_info = network_info(&req.network);
        vpc.network = req.network;
        vpc.update_time += 60;
        Ok(())
    }

    async fn delete_vpc(&self, req: DeleteVpcRequest) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DeleteVpc(req.vpc_id.clone()));
        if inner.fail_delete {
            return Err(Self::api_error("vpc has subnets"));
        }
        if !inner.stuck_delete {
            inner.vpcs.remove(&req.vpc_id);
        }
        Ok(())
    }

    async fn create_subnet(&self, req: CreateSubnetRequest) -> Result<CreateSubnetResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::CreateSubnet(req.clone()));
        if !inner.vpcs.contains_key(&req.vpc_id) {
            return Err(UCloudError::not_found("vpc", &req.vpc_id));
        }
        inner.next_id += 1;
        let id = format!("subnet-{:04}", inner.next_id);

        let info = SubnetInfo {
            subnet_id: id.clone(),
            subnet_name: req.subnet_name,
            vpc_id: req.vpc_id,
            subnet: req.subnet,
            netmask: req.netmask,
            tag: req.tag.unwrap_or_default(),
            remark: req.remark.unwrap_or_default(),
            create_time: 1546300800,
        };
        inner.subnets.insert(id.clone(), info);
        Ok(CreateSubnetResponse { subnet_id: id })
    }

    async fn describe_subnet(&self, req: DescribeSubnetRequest) -> Result<DescribeSubnetResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DescribeSubnet(req.subnet_ids.clone()));
        if inner.fail_describe {
            return Err(Self::api_error("describe failed"));
        }
        if inner.invisible_reads > 0 {
            inner.invisible_reads -= 1;
            return Ok(DescribeSubnetResponse::default());
        }

        let data_set = req
            .subnet_ids
            .iter()
            .filter_map(|id| inner.subnets.get(id).cloned())
            .collect();
        Ok(DescribeSubnetResponse { data_set })
    }

    async fn update_subnet_attribute(&self, req: UpdateSubnetAttributeRequest) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::UpdateSubnetAttribute(req.clone()));
        let subnet = inner
            .subnets
            .get_mut(&req.subnet_id)
            .ok_or_else(|| UCloudError::not_found("subnet", &req.subnet_id))?;
        if let Some(name) = req.name {
            subnet.subnet_name = name;
        }
        if let Some(tag) = req.tag {
            subnet.tag = tag;
        }
        Ok(())
    }

    async fn delete_subnet(&self, req: DeleteSubnetRequest) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DeleteSubnet(req.subnet_id.clone()));
        if inner.fail_delete {
            return Err(Self::api_error("subnet in use"));
        }
        if !inner.stuck_delete {
            inner.subnets.remove(&req.subnet_id);
        }
        Ok(())
    }
}
