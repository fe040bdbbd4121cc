use crate::assembly::{CloudAssembly, ResourceRegistrar};
use crate::cluster::build_cluster;
use crate::graph::ResourceGraph;
use crate::identity::build_identities;
use crate::network::build_network;
use crate::CoreError;
use caldera_schema::{ProvisionConfig, ResourceId};
use tracing::{debug, info};

/// Run every builder and state every dependency edge, producing the
/// complete resource graph for one configuration.
///
/// Edges are declared here, in one place, rather than implied by builder
/// call order: cluster → instance profile → node role, cluster → service
/// role, cluster → subnet, and each subnet → vpc.
pub fn assemble(config: &ProvisionConfig) -> Result<ResourceGraph, CoreError> {
    let mut graph = ResourceGraph::new();

    let network = build_network(config, &mut graph)?;
    let identity = build_identities(config, &mut graph)?;
    let cluster = build_cluster(config, &network, &identity, &mut graph)?;

    for subnet in &network.subnet_ids {
        let subnet = ResourceId::new(subnet.as_str());
        graph.depends_on(&subnet, &network.vpc)?;
    }
    graph.depends_on(&identity.instance_profile, &identity.node_role)?;
    graph.depends_on(&cluster, &identity.instance_profile)?;
    graph.depends_on(&cluster, &identity.service_role)?;
    let cluster_subnet = network
        .cluster_subnet()
        .ok_or(CoreError::UnresolvedDependency {
            resource: "network subnet",
        })?;
    graph.depends_on(&cluster, &ResourceId::new(cluster_subnet.as_str()))?;

    debug!(
        nodes = graph.len(),
        edges = graph.edges().count(),
        "assembled resource graph"
    );
    Ok(graph)
}

/// Register a complete graph with the provisioning engine, dependencies
/// first.
///
/// The graph is topologically sorted before the first `register` call, so
/// either the whole ordered graph is submitted or nothing is.
pub fn register(
    graph: &ResourceGraph,
    registrar: &mut dyn ResourceRegistrar,
) -> Result<(), CoreError> {
    let ordered = graph.toposort()?;
    for node in ordered {
        let depends_on = graph.dependencies_of(&node.id);
        registrar.register(node, &depends_on)?;
    }
    Ok(())
}

/// Compile one configuration into the engine-native assembly artifact.
pub fn synthesize(config: &ProvisionConfig) -> Result<CloudAssembly, CoreError> {
    let graph = assemble(config)?;
    let mut assembly = CloudAssembly::new(config.env.construct_id.clone());
    register(&graph, &mut assembly)?;
    info!(
        construct_id = %config.env.construct_id,
        resources = assembly.resources.len(),
        "synthesized assembly"
    );
    Ok(assembly)
}
