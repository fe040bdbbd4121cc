//! Configuration document parsing and validation for caldera.
//!
//! This crate defines the schema layer: raw YAML document access with
//! dotted-path accessors (`ConfigDocument`), the validated typed view the
//! builders consume (`ProvisionConfig`), and the string newtypes shared
//! across the workspace. Validation is fail-fast: every key a builder
//! consumes must be present and well-shaped before any builder runs.

pub mod config;
pub mod document;
pub mod sample;
pub mod types;

pub use config::{
    ClusterSection, Ec2Section, EnvSection, Market, ProvisionConfig, StepFailurePolicy,
};
pub use document::{ConfigDocument, ConfigError};
pub use sample::{sample_config, SAMPLE_CONFIG};
pub use types::{BucketName, ResourceId, RoleName, SubnetId};
