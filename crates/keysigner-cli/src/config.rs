//! CLI configuration loading and resolution.
//!
//! Tool locations come from `~/.keysigner/config.huml` with priority order:
//! CLI flags > environment variables > config file > defaults.

use anyhow::{bail, Context, Result};
use keysigner_core::command::SecretPassing;
use keysigner_core::toolchain::Toolchain;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration loaded from config.huml file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CliConfig {
    /// keytool program name or path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keytool: Option<String>,
    /// openssl program name or path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openssl: Option<String>,
    /// apksigner program name or path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apksigner: Option<String>,
    /// Directory with the Bouncy Castle jar and the test key pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lib_dir: Option<PathBuf>,
    /// Security provider class used for BKS keystores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_class: Option<String>,
    /// Pass passwords to the tools through environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets_via_env: Option<bool>,
}

/// Returns the config directory path (~/.keysigner).
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(".keysigner"))
        .context("Could not determine home directory")
}

/// Returns the default config file path (~/.keysigner/config.huml).
pub fn default_config_path() -> Result<PathBuf> {
    config_dir().map(|dir| dir.join("config.huml"))
}

/// Returns the config file path in effect: `--config`, then
/// `KEYSIGNER_CONFIG`, then the default.
pub fn config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }
    match std::env::var("KEYSIGNER_CONFIG") {
        Ok(p) => Ok(PathBuf::from(p)),
        Err(_) => default_config_path(),
    }
}

/// Load configuration from the config file.
///
/// Returns `Ok(None)` if the config file doesn't exist.
/// Returns an error if the file exists but is invalid.
pub fn load_config(override_path: Option<&Path>) -> Result<Option<CliConfig>> {
    let path = config_path(override_path)?;

    if !path.exists() {
        return Ok(None);
    }

    let content =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;

    let config: CliConfig = huml_rs::serde::from_str(&content)
        .with_context(|| format!("Invalid HUML in {}", path.display()))?;

    validate_config(&config)?;
    check_file_permissions(&path);

    Ok(Some(config))
}

/// Reject values that can never name a program or directory.
fn validate_config(config: &CliConfig) -> Result<()> {
    let programs = [
        ("keytool", &config.keytool),
        ("openssl", &config.openssl),
        ("apksigner", &config.apksigner),
        ("provider_class", &config.provider_class),
    ];
    for (key, value) in programs {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            bail!("'{}' must not be empty", key);
        }
    }

    if config
        .lib_dir
        .as_ref()
        .is_some_and(|dir| dir.as_os_str().is_empty())
    {
        bail!("'lib_dir' must not be empty");
    }

    Ok(())
}

/// Warn if config file has overly permissive permissions (on Unix).
#[cfg(unix)]
fn check_file_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            eprintln!(
                "Warning: {} has overly permissive permissions ({:o}). Consider running: chmod 600 {}",
                path.display(),
                mode & 0o777,
                path.display()
            );
        }
    }
}

#[cfg(not(unix))]
fn check_file_permissions(_path: &Path) {}

/// Default library directory (~/.keysigner/lib), or `lib` when there is no
/// home directory.
pub fn default_lib_dir() -> PathBuf {
    config_dir()
        .map(|dir| dir.join("lib"))
        .unwrap_or_else(|_| PathBuf::from("lib"))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve the toolchain by applying priority rules.
///
/// Priority order (highest to lowest):
/// 1. CLI flags (`--lib-dir`, `--secrets-via-env`)
/// 2. Environment variables (`KEYSIGNER_LIB_DIR`, `KEYSIGNER_SECRETS_VIA_ENV`)
/// 3. Config file
/// 4. Defaults (programs looked up on `PATH`, `~/.keysigner/lib`)
pub fn resolve_toolchain(
    lib_dir_flag: Option<&Path>,
    secrets_via_env_flag: bool,
    file_config: Option<CliConfig>,
) -> Result<Toolchain> {
    let mut toolchain = Toolchain {
        lib_dir: default_lib_dir(),
        ..Toolchain::default()
    };
    let mut secrets_via_env = false;

    // Apply config file (lowest priority)
    if let Some(config) = file_config {
        if let Some(keytool) = config.keytool {
            toolchain.keytool = keytool;
        }
        if let Some(openssl) = config.openssl {
            toolchain.openssl = openssl;
        }
        if let Some(apksigner) = config.apksigner {
            toolchain.apksigner = apksigner;
        }
        if let Some(lib_dir) = config.lib_dir {
            toolchain.lib_dir = lib_dir;
        }
        if let Some(provider_class) = config.provider_class {
            toolchain.provider_class = provider_class;
        }
        secrets_via_env = config.secrets_via_env.unwrap_or(false);
    }

    // Apply environment variables (medium priority)
    if let Ok(lib_dir) = std::env::var("KEYSIGNER_LIB_DIR") {
        toolchain.lib_dir = PathBuf::from(lib_dir);
    }
    if let Ok(value) = std::env::var("KEYSIGNER_SECRETS_VIA_ENV") {
        match parse_flag(&value) {
            Some(flag) => secrets_via_env = flag,
            None => bail!(
                "KEYSIGNER_SECRETS_VIA_ENV must be true or false, got '{}'",
                value
            ),
        }
    }

    // Apply CLI flags (highest priority)
    if let Some(lib_dir) = lib_dir_flag {
        toolchain.lib_dir = lib_dir.to_path_buf();
    }
    if secrets_via_env_flag {
        secrets_via_env = true;
    }

    toolchain.secret_passing = if secrets_via_env {
        SecretPassing::Environment
    } else {
        SecretPassing::Inline
    };

    Ok(toolchain)
}
