pub mod completions;
pub mod graph;
pub mod init;
pub mod synth;
pub mod validate;

use caldera_schema::{ConfigDocument, ProvisionConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_GRAPH_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Read and validate the configuration document every subcommand starts
/// from.
pub fn load_config(path: &Path) -> Result<ProvisionConfig, String> {
    tracing::debug!("loading configuration from {}", path.display());
    let doc = ConfigDocument::parse_file(path).map_err(|e| e.to_string())?;
    ProvisionConfig::from_document(&doc).map_err(|e| e.to_string())
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn colorize_kind(kind: &str) -> String {
    use console::Style;
    match kind {
        "vpc" | "subnet" => Style::new().cyan().apply_to(kind).to_string(),
        "role" | "instance_profile" => Style::new().yellow().apply_to(kind).to_string(),
        "cluster" => Style::new().green().bold().apply_to(kind).to_string(),
        other => other.to_owned(),
    }
}
