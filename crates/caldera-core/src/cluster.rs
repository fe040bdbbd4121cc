use crate::graph::{ResourceGraph, ResourceSpec};
use crate::identity::IdentityOutput;
use crate::network::NetworkOutput;
use crate::CoreError;
use caldera_schema::{Market, ProvisionConfig, ResourceId, RoleName, StepFailurePolicy, SubnetId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Software application set installed on every cluster. Fixed: this is the
/// reference deployment profile, not a configuration surface.
pub const APPLICATIONS: [&str; 7] = [
    "Hadoop",
    "Hive",
    "HBase",
    "Presto",
    "Hue",
    "ZooKeeper",
    "Spark",
];

/// EBS root volume size for every node, in GiB.
pub const ROOT_VOLUME_SIZE_GB: u32 = 50;

/// Interpreter binary forced for both driver and worker Spark processes.
pub const PYSPARK_INTERPRETER: &str = "/usr/bin/python3";

/// A node group of uniform size, instance type, and pricing market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceGroup {
    pub instance_count: u32,
    pub instance_type: String,
    pub market: Market,
}

/// One tuning override: a classification mapped to properties, with one
/// level of nesting for shell-environment exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TuningOverride {
    pub classification: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<TuningOverride>,
}

/// An ordered bootstrap action: run a script from S3 via the regional
/// script-runner, with an explicit failure policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapStep {
    pub name: String,
    pub jar: String,
    pub args: Vec<String>,
    pub action_on_failure: StepFailurePolicy,
}

/// The full cluster declaration handed to the provisioning engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSpec {
    pub name: String,
    pub release_label: String,
    pub applications: Vec<String>,
    pub master: InstanceGroup,
    pub core: InstanceGroup,
    pub ec2_key_name: String,
    pub ec2_subnet_id: SubnetId,
    pub keep_alive_when_no_steps: bool,
    pub job_flow_role: RoleName,
    pub service_role: RoleName,
    pub configurations: Vec<TuningOverride>,
    pub log_uri: String,
    pub visible_to_all_users: bool,
    pub ebs_root_volume_size_gb: u32,
    pub steps: Vec<BootstrapStep>,
}

/// The three tuning overrides every cluster gets:
/// the Python 3 interpreter for PySpark driver and workers, Arrow as the
/// columnar interchange format, and maximizeResourceAllocation so each node
/// group dedicates its full resources to one job at a time.
pub fn tuning_overrides() -> Vec<TuningOverride> {
    vec![
        TuningOverride {
            classification: "spark-env".to_owned(),
            properties: BTreeMap::new(),
            configurations: vec![TuningOverride {
                classification: "export".to_owned(),
                properties: BTreeMap::from([
                    ("PYSPARK_PYTHON".to_owned(), PYSPARK_INTERPRETER.to_owned()),
                    (
                        "PYSPARK_DRIVER_PYTHON".to_owned(),
                        PYSPARK_INTERPRETER.to_owned(),
                    ),
                ]),
                configurations: Vec::new(),
            }],
        },
        TuningOverride {
            classification: "spark-defaults".to_owned(),
            properties: BTreeMap::from([(
                "spark.sql.execution.arrow.enabled".to_owned(),
                "true".to_owned(),
            )]),
            configurations: Vec::new(),
        },
        TuningOverride {
            classification: "spark".to_owned(),
            properties: BTreeMap::from([(
                "maximizeResourceAllocation".to_owned(),
                "true".to_owned(),
            )]),
            configurations: Vec::new(),
        },
    ]
}

/// S3 URI of the regional script-runner jar used to execute bootstrap
/// scripts.
pub fn script_runner_jar(region: &str) -> String {
    format!("s3://{region}.elasticmapreduce/libs/script-runner/script-runner.jar")
}

/// Step name derived from the script file stem (`setup_atlas.sh` →
/// `setup_atlas`).
fn step_name(script_file: &str) -> String {
    script_file
        .rsplit_once('.')
        .map_or(script_file, |(stem, _)| stem)
        .to_owned()
}

/// Assemble the cluster declaration from the network output, the identity
/// output, and configuration.
///
/// Fails with `UnresolvedDependency` if either upstream output is empty;
/// the declaration only ever references a subnet and identities that exist
/// in the graph.
pub fn build_cluster(
    config: &ProvisionConfig,
    network: &NetworkOutput,
    identity: &IdentityOutput,
    graph: &mut ResourceGraph,
) -> Result<ResourceId, CoreError> {
    let subnet = network
        .cluster_subnet()
        .ok_or(CoreError::UnresolvedDependency {
            resource: "network subnet",
        })?;
    if identity.service_role_name.is_empty() {
        return Err(CoreError::UnresolvedDependency {
            resource: "service role",
        });
    }
    if identity.instance_profile_name.is_empty() {
        return Err(CoreError::UnresolvedDependency {
            resource: "instance profile",
        });
    }

    let spec = ClusterSpec {
        name: config.cluster.domain_name.clone(),
        release_label: config.cluster.release_label.clone(),
        applications: APPLICATIONS.iter().map(|&a| a.to_owned()).collect(),
        master: InstanceGroup {
            instance_count: config.ec2.master_instance_count,
            instance_type: config.ec2.master_instance_type.clone(),
            market: config.ec2.market,
        },
        core: InstanceGroup {
            instance_count: config.ec2.core_instance_count,
            instance_type: config.ec2.slave_instance_type.clone(),
            market: config.ec2.market,
        },
        ec2_key_name: config.ec2.key_pair.clone(),
        ec2_subnet_id: subnet.clone(),
        keep_alive_when_no_steps: true,
        job_flow_role: identity.instance_profile_name.clone(),
        service_role: identity.service_role_name.clone(),
        configurations: tuning_overrides(),
        log_uri: format!(
            "s3://{}/{}/elasticmapreduce/",
            config.cluster.s3_log_bucket, config.env.region
        ),
        visible_to_all_users: true,
        ebs_root_volume_size_gb: ROOT_VOLUME_SIZE_GB,
        steps: vec![BootstrapStep {
            name: step_name(&config.cluster.step_script_file_name),
            jar: script_runner_jar(&config.env.region),
            args: vec![format!(
                "s3://{}/{}",
                config.cluster.step_file_bucket_name, config.cluster.step_script_file_name
            )],
            action_on_failure: config.cluster.step_failure_policy,
        }],
    };

    let id = graph.add("emr_cluster", ResourceSpec::Cluster(Box::new(spec)))?;
    debug!(cluster = %config.cluster.domain_name, "declared cluster");
    Ok(id)
}
