use crate::graph::{ResourceNode, ResourceSpec};
use crate::CoreError;
use caldera_schema::ResourceId;
use serde::Serialize;

/// Format version of the emitted assembly document.
pub const ASSEMBLY_FORMAT_VERSION: u32 = 1;

/// The provisioning engine's resource-registration API.
///
/// The stack assembler calls `register` once per resource, in dependency
/// order, stating the dependencies the engine cannot infer from a simple
/// reference scan. Implementations own everything past this boundary
/// (plan, diff, apply, rollback).
pub trait ResourceRegistrar {
    fn register(
        &mut self,
        node: &ResourceNode,
        depends_on: &[ResourceId],
    ) -> Result<(), CoreError>;
}

/// One registered resource as it appears in the assembly document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisteredResource {
    pub id: ResourceId,
    #[serde(flatten)]
    pub spec: ResourceSpec,
    pub depends_on: Vec<ResourceId>,
}

/// The engine-native declarative artifact: every resource in submission
/// order, with declared dependencies. Serializes to canonical JSON; the
/// blake3 fingerprint of that JSON is the assembly's identity, so two runs
/// over the same configuration compare equal by hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudAssembly {
    pub format_version: u32,
    pub construct_id: String,
    pub resources: Vec<RegisteredResource>,
}

impl CloudAssembly {
    pub fn new(construct_id: impl Into<String>) -> Self {
        Self {
            format_version: ASSEMBLY_FORMAT_VERSION,
            construct_id: construct_id.into(),
            resources: Vec::new(),
        }
    }

    pub fn resource_ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.resources.iter().map(|r| &r.id)
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredResource> {
        self.resources.iter().find(|r| r.id == *id)
    }

    pub fn canonical_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn pretty_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Blake3 hex digest of the canonical JSON form.
    pub fn fingerprint(&self) -> Result<String, CoreError> {
        let canonical = self.canonical_json()?;
        Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
    }
}

impl ResourceRegistrar for CloudAssembly {
    fn register(
        &mut self,
        node: &ResourceNode,
        depends_on: &[ResourceId],
    ) -> Result<(), CoreError> {
        self.resources.push(RegisteredResource {
            id: node.id.clone(),
            spec: node.spec.clone(),
            depends_on: depends_on.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::VpcSpec;

    fn vpc_node() -> ResourceNode {
        ResourceNode {
            id: ResourceId::new("vpc"),
            spec: ResourceSpec::Vpc(VpcSpec { nat_gateways: 0 }),
        }
    }

    #[test]
    fn registration_preserves_order_and_dependencies() {
        let mut assembly = CloudAssembly::new("emr-stack");
        let node = vpc_node();
        assembly.register(&node, &[]).unwrap();
        assembly
            .register(
                &ResourceNode {
                    id: ResourceId::new("subnet"),
                    spec: node.spec.clone(),
                },
                &[ResourceId::new("vpc")],
            )
            .unwrap();

        let ids: Vec<_> = assembly.resource_ids().map(ResourceId::as_str).collect();
        assert_eq!(ids, vec!["vpc", "subnet"]);
        assert_eq!(
            assembly.get("subnet").unwrap().depends_on,
            vec![ResourceId::new("vpc")]
        );
    }

    #[test]
    fn json_carries_kind_tag_and_version() {
        let mut assembly = CloudAssembly::new("emr-stack");
        assembly.register(&vpc_node(), &[]).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&assembly.canonical_json().unwrap()).unwrap();
        assert_eq!(json["format_version"], 1);
        assert_eq!(json["construct_id"], "emr-stack");
        assert_eq!(json["resources"][0]["kind"], "vpc");
        assert_eq!(json["resources"][0]["nat_gateways"], 0);
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let mut a = CloudAssembly::new("emr-stack");
        a.register(&vpc_node(), &[]).unwrap();
        let mut b = CloudAssembly::new("emr-stack");
        b.register(&vpc_node(), &[]).unwrap();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());

        let c = CloudAssembly::new("other-stack");
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
    }
}
