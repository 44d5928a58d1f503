//! CLI smoke entry point.
//!
//! # Responsibility
//! - Bootstrap the process-wide registry with the built-in packages.
//! - Print the registered packages with their enabled state.
//!
//! Usage: `extreg [config.json]`

use extreg_core::logging::init_logging_from_config;
use extreg_core::{load_config, register_builtin_extensions, ExtensionRegistry, RegistryConfig};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("extreg: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path)).map_err(|err| err.to_string())?,
        None => RegistryConfig::default(),
    };
    init_logging_from_config(&config).map_err(|err| err.to_string())?;

    let registry = ExtensionRegistry::install(config).map_err(|err| err.to_string())?;
    register_builtin_extensions(registry).map_err(|err| err.to_string())?;
    log::info!(
        "event=cli_start module=cli status=ok packages={}",
        registry.num_registered_packages()
    );

    println!("extreg_core version={}", extreg_core::core_version());
    for index in 0..registry.num_registered_packages() {
        let Some(name) = registry.registered_package_name(index) else {
            continue;
        };
        let uri = registry
            .get_extension(&name)
            .and_then(|descriptor| descriptor.uris.first().cloned())
            .unwrap_or_default();
        println!(
            "{index}\t{name}\tenabled={}\t{uri}",
            registry.is_enabled(&name)
        );
    }
    Ok(())
}
