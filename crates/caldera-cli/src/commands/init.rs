use super::{json_pretty, EXIT_SUCCESS};
use caldera_schema::SAMPLE_CONFIG;
use std::path::Path;

const DEST_CONFIG: &str = "app-config.yml";

pub fn run(force: bool, json: bool) -> Result<u8, String> {
    let dest = Path::new(DEST_CONFIG);
    if dest.exists() && !force {
        return Err(format!(
            "refusing to overwrite existing ./{DEST_CONFIG} (pass --force)"
        ));
    }
    std::fs::write(dest, SAMPLE_CONFIG)
        .map_err(|e| format!("failed to write configuration: {e}"))?;

    if json {
        let payload = serde_json::json!({
            "status": "written",
            "path": format!("./{DEST_CONFIG}"),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("wrote ./{DEST_CONFIG}");
        println!("edit the account, region, and bucket fields, then run `caldera synth`");
    }
    Ok(EXIT_SUCCESS)
}
