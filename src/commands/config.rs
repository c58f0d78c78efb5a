//! Config command handlers: show effective configuration.

use crate::app_config::{LoadedConfig, Settings};

pub fn run_config_show_command(settings: &Settings, loaded: &LoadedConfig) {
    for line in render_config(settings, loaded) {
        println!("{line}");
    }
}

fn render_config(settings: &Settings, loaded: &LoadedConfig) -> Vec<String> {
    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    vec![
        format!("config_path = {resolved_path}"),
        format!(
            "config_file = {}",
            if loaded.loaded_from_file {
                "loaded"
            } else {
                "not found (using defaults)"
            }
        ),
        format!("download_dir = {}", settings.download_dir.display()),
        format!(
            "storage_threshold_bytes = {}",
            settings.storage_threshold_bytes
        ),
        format!("verbosity = {}", settings.verbosity.as_str()),
        format!(
            "transfer_client_remove_command = {}",
            settings
                .transfer_client_remove_command
                .as_deref()
                .unwrap_or("<unset>")
        ),
        format!(
            "peer_client_remove_command = {}",
            settings
                .peer_client_remove_command
                .as_deref()
                .unwrap_or("<unset>")
        ),
    ]
}
