use crate::config::ProvisionConfig;
use crate::document::{ConfigDocument, ConfigError};

/// Built-in starter configuration, written by `caldera init`.
///
/// Mirrors the reference deployment: China-partition region, on-demand
/// market, default node counts.
pub const SAMPLE_CONFIG: &str = r#"emr:
  account: "123456789012"
  region: cn-northwest-1
  construct_id: emr-stack

  ec2:
    key_pair: emr-keys
    master_instance_type: m5.xlarge
    slave_instance_type: m5.2xlarge
    market: ON_DEMAND
    # master_instance_count: 1
    # core_instance_count: 2

  emr_cluster:
    s3_script_bucket: scripts-bucket
    service_role_name: emr-service-role
    instance_profile_name: emr-instance-profile
    domain_name: analytics
    s3_log_bucket: logs-bucket
    relase_label: emr-6.3.0
    step_file_bucket_name: steps-bucket
    step_script_file_name: setup_atlas.sh
    # step_failure_policy: CONTINUE
"#;

/// Parse and validate the built-in sample.
pub fn sample_config() -> Result<ProvisionConfig, ConfigError> {
    let doc = ConfigDocument::parse_str(SAMPLE_CONFIG)?;
    ProvisionConfig::from_document(&doc)
}
