use anyhow::{Context, Result};
use std::path::PathBuf;

use scope_data::{config, Config};

/// Show the current effective configuration.
pub fn show_config(orthology_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load_with_orthology_dir(orthology_dir)?;
    let config_path = config::config_file_path();

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  orthology_dir: {}", config.orthology_dir.display());
    println!("  data_dir: {}", config.data_dir.display());
    println!("  search.index_cache_capacity: {}", config.search.index_cache_capacity);
    println!("  search.query_cache_capacity: {}", config.search.query_cache_capacity);

    println!("\nPriority: CLI args > ENV vars (SCOPE_*) > Config file > Defaults");

    Ok(())
}

/// Print a specific config value, or the whole config file.
pub fn get_config(key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'scope config init' to create it.");
        }
        return Ok(());
    };

    let config = Config::load()?;
    match key.as_str() {
        "orthology_dir" => println!("{}", config.orthology_dir.display()),
        "data_dir" => println!("{}", config.data_dir.display()),
        "index_cache_capacity" => println!("{}", config.search.index_cache_capacity),
        "query_cache_capacity" => println!("{}", config.search.query_cache_capacity),
        _ => anyhow::bail!(
            "Unknown config key: {}\n\nValid keys: orthology_dir, data_dir, index_cache_capacity, query_cache_capacity",
            key
        ),
    }

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to point scope at your orthology tables and datasets.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
