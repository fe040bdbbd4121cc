use crate::graph::{ResourceGraph, ResourceSpec};
use crate::CoreError;
use caldera_schema::{BucketName, ProvisionConfig, ResourceId, RoleName};
use serde::Serialize;
use tracing::debug;

/// Principal trusted by the cluster service role.
pub const EMR_SERVICE_PRINCIPAL: &str = "elasticmapreduce.amazonaws.com";
/// Principal trusted by the node instance role.
pub const EC2_SERVICE_PRINCIPAL: &str = "ec2.amazonaws.com";
/// Baseline managed policy for cluster orchestration.
pub const EMR_SERVICE_MANAGED_POLICY: &str = "service-role/AmazonElasticMapReduceRole";
/// Baseline managed policy for node-level cluster participation.
pub const EMR_NODE_MANAGED_POLICY: &str = "service-role/AmazonElasticMapReduceforEC2Role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    Allow,
    Deny,
}

/// One permission statement: effect, actions, fully qualified resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatement {
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

/// An ordered set of permission statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDocument {
    pub statements: Vec<PolicyStatement>,
}

/// A service identity assumable by exactly one trusted principal.
///
/// Inline policies are part of the declaration itself: a role is never
/// registered without its policies already fully formed (no two-phase
/// create-then-attach).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<RoleName>,
    pub assumed_by: String,
    pub managed_policies: Vec<String>,
    pub inline_policies: Vec<PolicyDocument>,
}

/// Wrapper letting cluster nodes assume the node instance role. References
/// exactly one role, by graph id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceProfileSpec {
    pub instance_profile_name: RoleName,
    pub role: ResourceId,
}

/// Graph ids and names the cluster spec builder references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityOutput {
    pub service_role: ResourceId,
    pub service_role_name: RoleName,
    pub node_role: ResourceId,
    pub instance_profile: ResourceId,
    pub instance_profile_name: RoleName,
}

/// ARN partition for a region. The reference deployment lives in the China
/// partition; standard regions resolve to `aws`.
pub fn arn_partition(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else {
        "aws"
    }
}

/// ARN matching every object under the configured script bucket, and
/// nothing else. Never an unscoped wildcard.
pub fn script_objects_arn(region: &str, bucket: &BucketName) -> String {
    format!("arn:{}:s3:::{bucket}/*", arn_partition(region))
}

/// Reject bucket names that would widen or break the policy resource.
///
/// Validated before any identity is declared, so a bad bucket never leaves
/// a half-formed or over-broad identity behind.
fn validate_policy_bucket(bucket: &BucketName) -> Result<(), CoreError> {
    let invalid = |reason: &'static str| CoreError::InvalidPolicyResource {
        bucket: bucket.to_string(),
        reason,
    };
    let name = bucket.as_str();
    if name.is_empty() {
        return Err(invalid("is empty"));
    }
    if !(3..=63).contains(&name.len()) {
        return Err(invalid("must be 3 to 63 characters"));
    }
    if name.contains(['*', '?']) {
        return Err(invalid("must not contain wildcards"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "must contain only lowercase letters, digits, hyphens, and dots",
        ));
    }
    let first = name.chars().next().unwrap_or('-');
    let last = name.chars().last().unwrap_or('-');
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(invalid("must start and end with a letter or digit"));
    }
    Ok(())
}

/// Declare the three identities the cluster needs: service role, node
/// instance role, and the instance profile wrapping the node role.
///
/// The script bucket is validated first; on failure no identity is added
/// to the graph. The profile-to-role edge is stated by the assembler.
pub fn build_identities(
    config: &ProvisionConfig,
    graph: &mut ResourceGraph,
) -> Result<IdentityOutput, CoreError> {
    validate_policy_bucket(&config.cluster.s3_script_bucket)?;

    let read_scripts = PolicyDocument {
        statements: vec![PolicyStatement {
            effect: Effect::Allow,
            actions: vec!["s3:GetObject".to_owned()],
            resources: vec![script_objects_arn(
                &config.env.region,
                &config.cluster.s3_script_bucket,
            )],
        }],
    };

    let service_role = graph.add(
        "emr_service_role",
        ResourceSpec::Role(RoleSpec {
            role_name: Some(config.cluster.service_role_name.clone()),
            assumed_by: EMR_SERVICE_PRINCIPAL.to_owned(),
            managed_policies: vec![EMR_SERVICE_MANAGED_POLICY.to_owned()],
            inline_policies: vec![read_scripts],
        }),
    )?;

    // The node role carries no configured name; the engine may generate one.
    let node_role = graph.add(
        "emr_node_role",
        ResourceSpec::Role(RoleSpec {
            role_name: None,
            assumed_by: EC2_SERVICE_PRINCIPAL.to_owned(),
            managed_policies: vec![EMR_NODE_MANAGED_POLICY.to_owned()],
            inline_policies: Vec::new(),
        }),
    )?;

    let instance_profile = graph.add(
        "emr_instance_profile",
        ResourceSpec::InstanceProfile(InstanceProfileSpec {
            instance_profile_name: config.cluster.instance_profile_name.clone(),
            role: node_role.clone(),
        }),
    )?;

    debug!(
        service_role = %config.cluster.service_role_name,
        instance_profile = %config.cluster.instance_profile_name,
        "declared identities"
    );
    Ok(IdentityOutput {
        service_role,
        service_role_name: config.cluster.service_role_name.clone(),
        node_role,
        instance_profile,
        instance_profile_name: config.cluster.instance_profile_name.clone(),
    })
}
