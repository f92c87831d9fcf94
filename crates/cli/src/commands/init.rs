use anyhow::{Context, Result};
use std::env;

use legwork_core::Config;

/// Write a starter `.legwork.json` into the current directory.
pub fn init_command(force: bool) -> Result<()> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let config_path = cwd.join(".legwork.json");

    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    let mut starter = Config::default();
    starter.manage.settings = Some("project.settings".to_string());
    starter
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!("✅ Created config: {}", config_path.display());
    println!("   Point manage.settings at your Django settings module to get started.");
    Ok(())
}
