mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

use crate::bundle::language;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./sceneprep.toml",
        "./config.toml",
        "~/.config/sceneprep/config.toml",
        "/etc/sceneprep/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.batch.workers == 0 {
        anyhow::bail!("batch.workers must be at least 1");
    }

    if config.scan.video_extensions.is_empty() {
        anyhow::bail!("scan.video_extensions cannot be empty");
    }

    let dupes = &config.duplicates;
    if dupes.size_threshold_percent > 100 {
        anyhow::bail!(
            "duplicates.size_threshold_percent must be <= 100, got {}",
            dupes.size_threshold_percent
        );
    }
    if dupes.similarity_threshold > 100 {
        anyhow::bail!(
            "duplicates.similarity_threshold must be <= 100, got {}",
            dupes.similarity_threshold
        );
    }
    if dupes.page_size == 0 || dupes.max_pages == 0 {
        anyhow::bail!("duplicates.page_size and duplicates.max_pages must be at least 1");
    }

    let preferred = &config.bundle.preferred_language;
    if !preferred.eq_ignore_ascii_case("all") && language::to_alpha3(preferred).is_none() {
        tracing::warn!(
            language = %preferred,
            "bundle.preferred_language is not a known ISO 639 code"
        );
    }

    if let Some(ref archive) = config.bundle.torrent_archive {
        if !archive.is_dir() {
            tracing::warn!("Torrent archive does not exist: {:?}", archive);
        }
    }

    if let Some(ref snapshot) = dupes.snapshot {
        if !snapshot.exists() {
            tracing::warn!("Catalog snapshot does not exist: {:?}", snapshot);
        }
    }

    Ok(())
}
