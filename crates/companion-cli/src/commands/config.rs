use anyhow::{Context, Result, bail};
use companion_core::config::WidgetConfig;
use companion_infrastructure::{CompanionPaths, ConfigService};
use std::path::PathBuf;

pub fn service(config_dir: Option<PathBuf>) -> Result<ConfigService> {
    ConfigService::from_paths(&CompanionPaths::new(config_dir))
        .context("Failed to resolve the widget config location")
}

pub fn show(config_dir: Option<PathBuf>) -> Result<()> {
    let service = service(config_dir)?;
    let config = service
        .get_config()
        .with_context(|| format!("Failed to load {}", service.path().display()))?;

    println!("# {}", service.path().display());
    print!("{}", config.to_toml_string()?);
    Ok(())
}

pub fn init(config_dir: Option<PathBuf>, force: bool) -> Result<()> {
    let service = service(config_dir)?;
    if service.path().exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            service.path().display()
        );
    }

    service.save(&WidgetConfig::default())?;
    println!("Wrote {}", service.path().display());
    Ok(())
}
