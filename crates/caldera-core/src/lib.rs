//! Resource builders and graph assembly for caldera.
//!
//! This crate turns a validated [`caldera_schema::ProvisionConfig`] into a
//! dependency-ordered declarative resource graph: the network builder, the
//! identity & policy builder, the cluster spec builder, and the stack
//! assembler that states every edge and registers the topologically sorted
//! graph with the external provisioning engine behind [`ResourceRegistrar`].
//!
//! Construction is fail-fast and all-or-nothing: either a complete,
//! internally consistent graph is produced, or nothing is registered.

pub mod assembly;
pub mod cluster;
pub mod graph;
pub mod identity;
pub mod network;
pub mod stack;

pub use assembly::{CloudAssembly, RegisteredResource, ResourceRegistrar, ASSEMBLY_FORMAT_VERSION};
pub use cluster::{
    build_cluster, BootstrapStep, ClusterSpec, InstanceGroup, TuningOverride, APPLICATIONS,
    ROOT_VOLUME_SIZE_GB,
};
pub use graph::{ResourceGraph, ResourceNode, ResourceSpec};
pub use identity::{
    build_identities, Effect, IdentityOutput, InstanceProfileSpec, PolicyDocument,
    PolicyStatement, RoleSpec,
};
pub use network::{build_network, NetworkOutput, SubnetSpec, VpcSpec, PUBLIC_SUBNET_COUNT};
pub use stack::{assemble, register, synthesize};

use caldera_schema::ResourceId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(#[from] caldera_schema::ConfigError),
    #[error("invalid policy resource: bucket `{bucket}` {reason}")]
    InvalidPolicyResource { bucket: String, reason: &'static str },
    #[error("unresolved dependency: {resource} output is not available")]
    UnresolvedDependency { resource: &'static str },
    #[error("duplicate resource id: {0}")]
    DuplicateResource(ResourceId),
    #[error("unknown resource id in edge: {0}")]
    UnknownResource(ResourceId),
    #[error("dependency cycle among resources: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
