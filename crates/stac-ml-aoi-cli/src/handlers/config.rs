//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output).await,
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output).await,
    }
}

/// Handle config init subcommand
async fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let mut targets = Vec::new();

    // Without a specific option, initialize both
    if args.user || !args.project {
        let user_path = Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?;
        targets.push(("User", user_path));
    }
    if args.project || !args.user {
        targets.push(("Project", PathBuf::from(PROJECT_CONFIG_FILE)));
    }

    let mut created_any = false;
    for (scope, path) in targets {
        if write_default(&path, args.force)? {
            output.success(&format!("✓ Created {} config at {}", scope.to_lowercase(), path.display()))?;
            created_any = true;
        } else {
            output.warning(&format!("{} config already exists at {}", scope, path.display()))?;
        }
    }

    if created_any {
        output.info("Configuration files created with default values.")?;
        output.info("Edit them to change the default validation mode or logging.")?;
    }

    Ok(())
}

/// Write the default configuration unless a file is already there
fn write_default(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    Config::default().save(path)?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(true)
}

/// Handle config show subcommand
async fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = render(config, args.format)?;
    output.writeln(content.trim_end())
}

fn render(config: &Config, format: ConfigFormat) -> Result<String> {
    Ok(match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}
