use crate::document::{ConfigDocument, ConfigError};
use crate::types::{BucketName, RoleName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default master group size when `ec2.master_instance_count` is absent.
pub const DEFAULT_MASTER_COUNT: u32 = 1;
/// Default core group size when `ec2.core_instance_count` is absent.
pub const DEFAULT_CORE_COUNT: u32 = 2;

/// Pricing market for cluster instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Market {
    OnDemand,
    Spot,
}

impl Market {
    fn parse(key: &str, raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "ON_DEMAND" => Ok(Self::OnDemand),
            "SPOT" => Ok(Self::Spot),
            other => Err(ConfigError::InvalidConfigurationValue {
                key: key.to_owned(),
                expected: "one of ON_DEMAND, SPOT",
                found: format!("`{other}`"),
            }),
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OnDemand => "ON_DEMAND",
            Self::Spot => "SPOT",
        })
    }
}

/// What the provisioning run does when a bootstrap step fails.
///
/// Defaults to `Continue`: one optional setup script must not block cluster
/// availability. Overridable via `emr_cluster.step_failure_policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepFailurePolicy {
    Continue,
    TerminateCluster,
}

impl StepFailurePolicy {
    fn parse(key: &str, raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "CONTINUE" => Ok(Self::Continue),
            "TERMINATE_CLUSTER" => Ok(Self::TerminateCluster),
            other => Err(ConfigError::InvalidConfigurationValue {
                key: key.to_owned(),
                expected: "one of CONTINUE, TERMINATE_CLUSTER",
                found: format!("`{other}`"),
            }),
        }
    }
}

impl fmt::Display for StepFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Continue => "CONTINUE",
            Self::TerminateCluster => "TERMINATE_CLUSTER",
        })
    }
}

/// Deployment target: account, region, and the stack's construct identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvSection {
    pub account: String,
    pub region: String,
    pub construct_id: String,
}

/// Compute-node sizing and pricing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ec2Section {
    pub key_pair: String,
    pub master_instance_type: String,
    pub slave_instance_type: String,
    pub market: Market,
    pub master_instance_count: u32,
    pub core_instance_count: u32,
}

/// Cluster naming, storage locations, and bootstrap script coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterSection {
    pub s3_script_bucket: BucketName,
    pub service_role_name: RoleName,
    pub instance_profile_name: RoleName,
    pub domain_name: String,
    pub s3_log_bucket: BucketName,
    pub release_label: String,
    pub step_file_bucket_name: BucketName,
    pub step_script_file_name: String,
    pub step_failure_policy: StepFailurePolicy,
}

/// The validated, immutable view of one configuration document.
///
/// Constructed exactly once per provisioning run and passed by reference
/// into every builder; no builder reads ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisionConfig {
    pub env: EnvSection,
    pub ec2: Ec2Section,
    pub cluster: ClusterSection,
}

impl ProvisionConfig {
    /// Validate a raw document into the typed configuration.
    ///
    /// Every required field is checked for presence and shape here, before
    /// any builder runs. The first offending field aborts validation.
    pub fn from_document(doc: &ConfigDocument) -> Result<Self, ConfigError> {
        let env = EnvSection {
            account: doc.str_at("account")?.to_owned(),
            region: doc.str_at("region")?.to_owned(),
            construct_id: doc.str_at("construct_id")?.to_owned(),
        };

        let market = Market::parse("ec2.market", doc.str_at("ec2.market")?)?;
        let ec2 = Ec2Section {
            key_pair: doc.str_at("ec2.key_pair")?.to_owned(),
            master_instance_type: doc.str_at("ec2.master_instance_type")?.to_owned(),
            slave_instance_type: doc.str_at("ec2.slave_instance_type")?.to_owned(),
            market,
            master_instance_count: doc
                .count_at("ec2.master_instance_count")?
                .unwrap_or(DEFAULT_MASTER_COUNT),
            core_instance_count: doc
                .count_at("ec2.core_instance_count")?
                .unwrap_or(DEFAULT_CORE_COUNT),
        };

        let step_failure_policy = match doc.opt_str_at("emr_cluster.step_failure_policy")? {
            Some(raw) => StepFailurePolicy::parse("emr_cluster.step_failure_policy", raw)?,
            None => StepFailurePolicy::Continue,
        };
        let cluster = ClusterSection {
            s3_script_bucket: doc.str_at("emr_cluster.s3_script_bucket")?.into(),
            service_role_name: doc.str_at("emr_cluster.service_role_name")?.into(),
            instance_profile_name: doc.str_at("emr_cluster.instance_profile_name")?.into(),
            domain_name: doc.str_at("emr_cluster.domain_name")?.to_owned(),
            s3_log_bucket: doc.str_at("emr_cluster.s3_log_bucket")?.into(),
            // `relase_label` is misspelled in deployed config files; the key
            // is preserved exactly for compatibility with them.
            release_label: doc.str_at("emr_cluster.relase_label")?.to_owned(),
            step_file_bucket_name: doc.str_at("emr_cluster.step_file_bucket_name")?.into(),
            step_script_file_name: doc.str_at("emr_cluster.step_script_file_name")?.to_owned(),
            step_failure_policy,
        };

        Ok(Self { env, ec2, cluster })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
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
"#;

    fn config() -> ProvisionConfig {
        let doc = ConfigDocument::parse_str(FULL).unwrap();
        ProvisionConfig::from_document(&doc).expect("full config should validate")
    }

    #[test]
    fn validates_full_document() {
        let cfg = config();
        assert_eq!(cfg.env.region, "cn-northwest-1");
        assert_eq!(cfg.ec2.market, Market::OnDemand);
        assert_eq!(cfg.cluster.release_label, "emr-6.3.0");
        assert_eq!(cfg.cluster.instance_profile_name, "prof-a");
    }

    #[test]
    fn counts_default_to_reference_topology() {
        let cfg = config();
        assert_eq!(cfg.ec2.master_instance_count, DEFAULT_MASTER_COUNT);
        assert_eq!(cfg.ec2.core_instance_count, DEFAULT_CORE_COUNT);
    }

    #[test]
    fn counts_overridable() {
        let overridden = FULL.replace(
            "  ec2:\n",
            "  ec2:\n    master_instance_count: 1\n    core_instance_count: 4\n",
        );
        let doc = ConfigDocument::parse_str(&overridden).unwrap();
        let cfg = ProvisionConfig::from_document(&doc).unwrap();
        assert_eq!(cfg.ec2.core_instance_count, 4);
    }

    #[test]
    fn invalid_market_cites_the_key() {
        let doc =
            ConfigDocument::parse_str(&FULL.replace("ON_DEMAND", "INVALID")).unwrap();
        let err = ProvisionConfig::from_document(&doc).unwrap_err();
        match err {
            ConfigError::InvalidConfigurationValue { key, .. } => assert_eq!(key, "ec2.market"),
            other => panic!("expected InvalidConfigurationValue, got {other}"),
        }
    }

    #[test]
    fn spot_market_accepted() {
        let doc = ConfigDocument::parse_str(&FULL.replace("ON_DEMAND", "SPOT")).unwrap();
        let cfg = ProvisionConfig::from_document(&doc).unwrap();
        assert_eq!(cfg.ec2.market, Market::Spot);
    }

    #[test]
    fn each_missing_required_key_is_named() {
        let required = [
            ("account: \"123456789012\"", "account"),
            ("key_pair: emr-keys", "ec2.key_pair"),
            ("market: ON_DEMAND", "ec2.market"),
            ("s3_script_bucket: scripts-bucket", "emr_cluster.s3_script_bucket"),
            ("relase_label: emr-6.3.0", "emr_cluster.relase_label"),
            (
                "step_script_file_name: setup_atlas.sh",
                "emr_cluster.step_script_file_name",
            ),
        ];
        for (line, key) in required {
            let stripped: String = FULL
                .lines()
                .filter(|l| !l.contains(line))
                .collect::<Vec<_>>()
                .join("\n");
            let doc = ConfigDocument::parse_str(&stripped).unwrap();
            let err = ProvisionConfig::from_document(&doc).unwrap_err();
            match err {
                ConfigError::MissingConfigurationField(k) => assert_eq!(k, key),
                other => panic!("expected MissingConfigurationField for {key}, got {other}"),
            }
        }
    }

    #[test]
    fn empty_role_name_is_a_configuration_error_not_a_late_failure() {
        let doc = ConfigDocument::parse_str(
            &FULL.replace("service_role_name: emr-service-role", "service_role_name: \"\""),
        )
        .unwrap();
        let err = ProvisionConfig::from_document(&doc).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidConfigurationValue { ref key, .. }
                if key == "emr_cluster.service_role_name"
        ));
    }

    #[test]
    fn step_failure_policy_defaults_to_continue() {
        assert_eq!(config().cluster.step_failure_policy, StepFailurePolicy::Continue);
    }

    #[test]
    fn step_failure_policy_overridable() {
        let overridden = FULL.replace(
            "  emr_cluster:\n",
            "  emr_cluster:\n    step_failure_policy: TERMINATE_CLUSTER\n",
        );
        let doc = ConfigDocument::parse_str(&overridden).unwrap();
        let cfg = ProvisionConfig::from_document(&doc).unwrap();
        assert_eq!(
            cfg.cluster.step_failure_policy,
            StepFailurePolicy::TerminateCluster
        );
    }

    #[test]
    fn bogus_step_failure_policy_rejected() {
        let overridden = FULL.replace(
            "  emr_cluster:\n",
            "  emr_cluster:\n    step_failure_policy: SHRUG\n",
        );
        let doc = ConfigDocument::parse_str(&overridden).unwrap();
        let err = ProvisionConfig::from_document(&doc).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidConfigurationValue { ref key, .. }
                if key == "emr_cluster.step_failure_policy"
        ));
    }

    #[test]
    fn market_serializes_screaming_snake() {
        assert_eq!(serde_json::to_string(&Market::OnDemand).unwrap(), "\"ON_DEMAND\"");
        assert_eq!(
            serde_json::to_string(&StepFailurePolicy::TerminateCluster).unwrap(),
            "\"TERMINATE_CLUSTER\""
        );
    }
}
