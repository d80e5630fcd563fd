use anyhow::{Context, Result, bail};
use dumpconf::DesiredParameters;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("sysdump"))
}

/// Default desired state file
pub fn default_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("desired.toml"))
}

/// Supported desired state file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "Unsupported config format: {} (expected .toml or .json)",
                path.display()
            ),
        }
    }
}

/// Load the desired state.
///
/// An explicit path must exist. Without one, the default file is used
/// when present, otherwise every parameter is left unspecified.
pub fn load(path: Option<&Path>) -> Result<DesiredParameters> {
    let path = match path {
        Some(p) => PathBuf::from(expand(p.to_string_lossy().into_owned())),
        None => {
            let default = default_path()?;
            if !default.exists() {
                log::debug!("no desired state file at {}", default.display());
                return Ok(DesiredParameters::default());
            }
            default
        }
    };

    load_file(&path)
}

/// Parse a desired state file
pub fn load_file(path: &Path) -> Result<DesiredParameters> {
    let format = ConfigFormat::from_path(path)?;
    let content =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;

    log::debug!("loading desired state from {}", path.display());
    let mut desired: DesiredParameters = match format {
        ConfigFormat::Toml => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in {}", path.display()))?,
        ConfigFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
    };

    // Path-valued settings may be written with ~
    desired.copy_directory = desired.copy_directory.map(expand);
    Ok(desired)
}

fn expand(path: String) -> String {
    shellexpand::tilde(&path).into_owned()
}
