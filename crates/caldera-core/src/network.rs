use crate::graph::{ResourceGraph, ResourceSpec};
use crate::CoreError;
use caldera_schema::{ProvisionConfig, ResourceId, SubnetId};
use serde::Serialize;
use tracing::debug;

/// Number of public subnets declared per network.
///
/// The reference deployment spreads public subnets across two availability
/// zones; the cluster itself only ever attaches to the first.
pub const PUBLIC_SUBNET_COUNT: usize = 2;

/// One virtual network. NAT gateways are deliberately zero: the cluster's
/// own nodes are the only egress/ingress actors, so private-subnet NAT
/// infrastructure is omitted entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcSpec {
    pub nat_gateways: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubnetType {
    Public,
}

/// A public subnet placed in one availability zone of the configured region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetSpec {
    pub name: String,
    pub availability_zone: String,
    pub subnet_type: SubnetType,
    pub map_public_ip_on_launch: bool,
}

/// Handles the downstream builders reference: the VPC node and the declared
/// subnets in declaration order. The first subnet is the one the cluster
/// attaches to ("first" = list order, not a scored choice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkOutput {
    pub vpc: ResourceId,
    pub subnet_ids: Vec<SubnetId>,
}

impl NetworkOutput {
    /// The subnet cluster nodes are placed in.
    pub fn cluster_subnet(&self) -> Option<&SubnetId> {
        self.subnet_ids.first()
    }
}

/// Declare the virtual network: one VPC, zero NAT gateways, public-only
/// subnets. Subnet-to-VPC edges are stated by the assembler.
pub fn build_network(
    config: &ProvisionConfig,
    graph: &mut ResourceGraph,
) -> Result<NetworkOutput, CoreError> {
    let vpc = graph.add("vpc", ResourceSpec::Vpc(VpcSpec { nat_gateways: 0 }))?;

    let mut subnet_ids = Vec::with_capacity(PUBLIC_SUBNET_COUNT);
    for (index, az_suffix) in ('a'..='z').take(PUBLIC_SUBNET_COUNT).enumerate() {
        let id = graph.add(
            format!("public_subnet_{index}"),
            ResourceSpec::Subnet(SubnetSpec {
                name: "public".to_owned(),
                availability_zone: format!("{}{az_suffix}", config.env.region),
                subnet_type: SubnetType::Public,
                map_public_ip_on_launch: true,
            }),
        )?;
        subnet_ids.push(SubnetId::new(id.into_inner()));
    }

    debug!(
        region = %config.env.region,
        subnets = subnet_ids.len(),
        "declared network"
    );
    Ok(NetworkOutput { vpc, subnet_ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use caldera_schema::ConfigDocument;

    fn config() -> ProvisionConfig {
        let doc = ConfigDocument::parse_str(
            r#"
emr:
  account: "123456789012"
  region: cn-northwest-1
  construct_id: emr-stack
  ec2:
    key_pair: emr-keys
    master_instance_type: m5.xlarge
    slave_instance_type: m5.2xlarge
    market: ON_DEMAND
  emr_cluster:
    s3_script_bucket: scripts-bucket
    service_role_name: emr-service-role
    instance_profile_name: prof-a
    domain_name: analytics
    s3_log_bucket: logs-bucket
    relase_label: emr-6.3.0
    step_file_bucket_name: steps-bucket
    step_script_file_name: setup_atlas.sh
"#,
        )
        .unwrap();
        ProvisionConfig::from_document(&doc).unwrap()
    }

    #[test]
    fn declares_vpc_without_nat() {
        let mut graph = ResourceGraph::new();
        let out = build_network(&config(), &mut graph).unwrap();
        let vpc = graph.node(&out.vpc).unwrap();
        match &vpc.spec {
            ResourceSpec::Vpc(spec) => assert_eq!(spec.nat_gateways, 0),
            other => panic!("expected vpc spec, got {other:?}"),
        }
    }

    #[test]
    fn declares_public_subnets_across_zones() {
        let mut graph = ResourceGraph::new();
        let out = build_network(&config(), &mut graph).unwrap();
        assert_eq!(out.subnet_ids.len(), PUBLIC_SUBNET_COUNT);
        assert!(!out.subnet_ids.is_empty(), "cluster needs a subnet");

        let azs: Vec<String> = out
            .subnet_ids
            .iter()
            .map(|id| match &graph.node(&ResourceId::new(id.as_str())).unwrap().spec {
                ResourceSpec::Subnet(s) => s.availability_zone.clone(),
                other => panic!("expected subnet spec, got {other:?}"),
            })
            .collect();
        assert_eq!(azs, vec!["cn-northwest-1a", "cn-northwest-1b"]);
    }

    #[test]
    fn cluster_subnet_is_first_in_declaration_order() {
        let mut graph = ResourceGraph::new();
        let out = build_network(&config(), &mut graph).unwrap();
        assert_eq!(out.cluster_subnet().unwrap().as_str(), "public_subnet_0");
    }
}
