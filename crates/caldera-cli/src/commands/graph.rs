use super::{colorize_kind, json_pretty, load_config, EXIT_SUCCESS};
use caldera_core::assemble;
use std::path::Path;

pub fn run(config_path: &Path, json: bool) -> Result<u8, String> {
    let config = load_config(config_path)?;
    let graph = assemble(&config).map_err(|e| e.to_string())?;
    let ordered = graph.toposort().map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "order": ordered.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            "edges": graph
                .edges()
                .map(|e| serde_json::json!({ "from": &e.from, "to": &e.to }))
                .collect::<Vec<_>>(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        for (index, node) in ordered.iter().enumerate() {
            println!(
                "{:>2}. {} ({})",
                index + 1,
                node.id,
                colorize_kind(node.spec.kind())
            );
            for dep in graph.dependencies_of(&node.id) {
                println!("      └─ depends on {dep}");
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
