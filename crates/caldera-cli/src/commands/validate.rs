use super::{json_pretty, load_config, EXIT_SUCCESS};
use std::path::Path;

pub fn run(config_path: &Path, json: bool) -> Result<u8, String> {
    let config = load_config(config_path)?;

    if json {
        let payload = serde_json::json!({
            "status": "valid",
            "construct_id": config.env.construct_id,
            "region": config.env.region,
            "market": config.ec2.market,
            "master_instance_count": config.ec2.master_instance_count,
            "core_instance_count": config.ec2.core_instance_count,
            "step_failure_policy": config.cluster.step_failure_policy,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "✓ configuration valid: '{}' in {}",
            config.env.construct_id, config.env.region
        );
        println!(
            "  nodes:  {} master / {} core ({}, {})",
            config.ec2.master_instance_count,
            config.ec2.core_instance_count,
            config.ec2.master_instance_type,
            config.ec2.slave_instance_type
        );
        println!(
            "  market: {}  step failure policy: {}",
            config.ec2.market, config.cluster.step_failure_policy
        );
    }
    Ok(EXIT_SUCCESS)
}
