use anyhow::{Context, Result};
use clap::Parser;
use recolor_core::config::CONFIG_PATH;
use recolor_core::output::should_use_color;
use recolor_core::{Config, ConfigError, MappingError, OutputFormatter, ScanError, VersionResult};
use std::path::{Path, PathBuf};
use std::process;

mod cli;
mod mapping;
mod replace;

use cli::{Cli, Commands, OutputFormat};

fn main() {
    let cli = Cli::parse();

    // Handle -C directory flag
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change to directory: {}", dir.display()))
            .unwrap_or_else(|e| {
                eprintln!("Error: {e:#}");
                process::exit(2);
            });
    }

    let result = load_config(cli.config.as_deref()).and_then(|(config, config_dir)| {
        let use_color = !cli.no_color && should_use_color(config.defaults.use_color);
        run(cli.command, &config, &config_dir, use_color)
    });

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code(&e));
        },
    }
}

fn run(command: Commands, config: &Config, config_dir: &Path, use_color: bool) -> Result<()> {
    match command {
        Commands::Replace {
            root,
            mapping,
            filter,
            log_file,
            output,
            quiet,
        } => replace::handle_replace(
            &root, mapping, filter, log_file, config, config_dir, use_color, output, quiet,
        ),

        Commands::Mapping { mapping, output } => {
            mapping::handle_mapping(mapping, config, config_dir, output)
        },

        Commands::Version { output } => handle_version(output),
    }
}

/// Load the config and the directory its relative paths resolve against
fn load_config(explicit: Option<&Path>) -> Result<(Config, PathBuf)> {
    if let Some(path) = explicit {
        let config = Config::load_from_path(path)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        return Ok((config, dir));
    }

    let config = Config::load()?;
    let dir = Path::new(CONFIG_PATH)
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok((config, dir))
}

/// 2 for invalid input (root, mapping, config), 3 for everything else
fn exit_code(err: &anyhow::Error) -> i32 {
    let invalid_input = err.downcast_ref::<ScanError>().is_some()
        || err.downcast_ref::<MappingError>().is_some()
        || err.downcast_ref::<ConfigError>().is_some();

    if invalid_input {
        2
    } else {
        3
    }
}

fn handle_version(output: OutputFormat) -> Result<()> {
    let version_result = VersionResult {
        name: "recolor".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("{}", version_result.format(output.into()));
    Ok(())
}
