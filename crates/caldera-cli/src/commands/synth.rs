use super::{json_pretty, load_config, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use caldera_core::synthesize;
use std::fs;
use std::path::Path;

pub fn run(config_path: &Path, out: Option<&Path>, json: bool) -> Result<u8, String> {
    let config = load_config(config_path)?;

    let pb = if json {
        None
    } else {
        Some(spinner("synthesizing assembly..."))
    };
    let assembly = match synthesize(&config) {
        Ok(a) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, "assembly synthesized");
            }
            a
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "synthesis failed");
            }
            return Err(e.to_string());
        }
    };
    let fingerprint = assembly.fingerprint().map_err(|e| e.to_string())?;
    let rendered = assembly.pretty_json().map_err(|e| e.to_string())?;

    if let Some(path) = out {
        fs::write(path, &rendered).map_err(|e| format!("failed to write assembly: {e}"))?;
    }

    if json {
        let payload = serde_json::json!({
            "construct_id": assembly.construct_id.clone(),
            "resources": assembly.resources.len(),
            "fingerprint": fingerprint,
            "out": out.map(|p| p.display().to_string()),
            "assembly": assembly,
        });
        println!("{}", json_pretty(&payload)?);
    } else if let Some(path) = out {
        println!(
            "synthesized '{}' ({} resources)",
            assembly.construct_id,
            assembly.resources.len()
        );
        println!("fingerprint: {fingerprint}");
        println!("wrote assembly to {}", path.display());
    } else {
        println!("{rendered}");
    }
    Ok(EXIT_SUCCESS)
}
