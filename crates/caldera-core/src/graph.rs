use crate::cluster::ClusterSpec;
use crate::identity::{InstanceProfileSpec, RoleSpec};
use crate::network::{SubnetSpec, VpcSpec};
use crate::CoreError;
use caldera_schema::ResourceId;
use serde::Serialize;

/// Declarative specification for one resource in the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceSpec {
    Vpc(VpcSpec),
    Subnet(SubnetSpec),
    Role(RoleSpec),
    InstanceProfile(InstanceProfileSpec),
    Cluster(Box<ClusterSpec>),
}

impl ResourceSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Vpc(_) => "vpc",
            Self::Subnet(_) => "subnet",
            Self::Role(_) => "role",
            Self::InstanceProfile(_) => "instance_profile",
            Self::Cluster(_) => "cluster",
        }
    }
}

/// One node in the resource graph: a stable id plus its declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceNode {
    pub id: ResourceId,
    #[serde(flatten)]
    pub spec: ResourceSpec,
}

/// Directed dependency: `from` must be created after `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: ResourceId,
    pub to: ResourceId,
}

/// The declarative resource graph: nodes plus explicit dependency edges.
///
/// Edges are stated, never inferred from construction order. Emission order
/// comes from [`ResourceGraph::toposort`], which is deterministic: among
/// ready nodes, insertion order wins.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
    edges: Vec<Edge>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its id. Ids must be unique within one graph.
    pub fn add(
        &mut self,
        id: impl Into<ResourceId>,
        spec: ResourceSpec,
    ) -> Result<ResourceId, CoreError> {
        let id = id.into();
        if self.nodes.iter().any(|n| n.id == id) {
            return Err(CoreError::DuplicateResource(id));
        }
        self.nodes.push(ResourceNode {
            id: id.clone(),
            spec,
        });
        Ok(id)
    }

    /// State that `from` depends on (must be created after) `to`.
    ///
    /// Both endpoints must already be in the graph; an edge naming an
    /// unregistered resource is a hard error, not a forward reference.
    pub fn depends_on(&mut self, from: &ResourceId, to: &ResourceId) -> Result<(), CoreError> {
        for endpoint in [from, to] {
            if !self.contains(endpoint) {
                return Err(CoreError::UnknownResource(endpoint.clone()));
            }
        }
        let edge = Edge {
            from: from.clone(),
            to: to.clone(),
        };
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
        Ok(())
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.nodes.iter().any(|n| n.id == *id)
    }

    pub fn node(&self, id: &ResourceId) -> Option<&ResourceNode> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Ids this node depends on, in the order the edges were stated.
    pub fn dependencies_of(&self, id: &ResourceId) -> Vec<ResourceId> {
        self.edges
            .iter()
            .filter(|e| e.from == *id)
            .map(|e| e.to.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dependency-ordered view of the graph (dependencies first).
    ///
    /// Kahn's algorithm with a stable tie-break: among nodes whose
    /// dependencies are all emitted, the earliest-inserted goes first. A
    /// cycle yields [`CoreError::DependencyCycle`] naming the stuck nodes.
    pub fn toposort(&self) -> Result<Vec<&ResourceNode>, CoreError> {
        let mut emitted: Vec<&ResourceId> = Vec::with_capacity(self.nodes.len());
        let mut ordered: Vec<&ResourceNode> = Vec::with_capacity(self.nodes.len());

        while ordered.len() < self.nodes.len() {
            let next = self.nodes.iter().find(|n| {
                !emitted.contains(&&n.id)
                    && self
                        .edges
                        .iter()
                        .filter(|e| e.from == n.id)
                        .all(|e| emitted.contains(&&e.to))
            });
            match next {
                Some(node) => {
                    emitted.push(&node.id);
                    ordered.push(node);
                }
                None => {
                    let stuck = self
                        .nodes
                        .iter()
                        .filter(|n| !emitted.contains(&&n.id))
                        .map(|n| n.id.to_string())
                        .collect();
                    return Err(CoreError::DependencyCycle(stuck));
                }
            }
        }
        Ok(ordered)
    }
}
