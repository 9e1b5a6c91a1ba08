//! `keysigner config` commands for managing CLI configuration.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::config::{config_path, default_lib_dir, load_config, resolve_toolchain, CliConfig};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create a new config file with default settings
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration in effect
    Show,

    /// Show config file path
    Path,
}

pub fn handle_config_command(cmd: ConfigCommands, override_path: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => init_config(override_path, force),
        ConfigCommands::Show => show_config(override_path),
        ConfigCommands::Path => show_path(override_path),
    }
}

/// Create a new config file.
fn init_config(override_path: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path(override_path)?;

    if path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            #[cfg(unix)]
            {
                let permissions = fs::Permissions::from_mode(0o700);
                fs::set_permissions(dir, permissions)?;
            }
        }
    }

    let config = CliConfig {
        keytool: Some("keytool".to_string()),
        openssl: Some("openssl".to_string()),
        apksigner: Some("apksigner".to_string()),
        lib_dir: Some(default_lib_dir()),
        provider_class: None,
        secrets_via_env: Some(false),
    };

    write_config(&path, &config)?;

    println!("Created config file at {}", path.display());
    println!();
    println!("Place these files in the library directory:");
    println!("  bcprov-jdk18on-1.78.jar  (BKS keystores)");
    println!("  testkey.x509.pem, testkey.pk8  (signing with the test key)");

    Ok(())
}

/// Display the file contents and the resolved toolchain.
fn show_config(override_path: Option<&Path>) -> Result<()> {
    let path = config_path(override_path)?;
    let file_config = load_config(override_path)?;

    match &file_config {
        Some(_) => println!("Config file: {}", path.display()),
        None => println!("No config file found at {} (using defaults)", path.display()),
    }
    println!();

    let toolchain = resolve_toolchain(None, false, file_config)?;
    println!("keytool:         {}", toolchain.keytool);
    println!("openssl:         {}", toolchain.openssl);
    println!("apksigner:       {}", toolchain.apksigner);
    println!("lib_dir:         {}", toolchain.lib_dir.display());
    println!("provider_class:  {}", toolchain.provider_class);
    println!("secret passing:  {:?}", toolchain.secret_passing);

    Ok(())
}

/// Show the config file path.
fn show_path(override_path: Option<&Path>) -> Result<()> {
    println!("{}", config_path(override_path)?.display());

    if let Ok(env_path) = std::env::var("KEYSIGNER_CONFIG") {
        if override_path.is_none() {
            println!();
            println!("Note: KEYSIGNER_CONFIG is set to: {}", env_path);
        }
    }

    Ok(())
}

/// Write config to file with proper HUML formatting and secure permissions.
fn write_config(path: &Path, config: &CliConfig) -> Result<()> {
    let content = serialize_to_huml(config);

    fs::write(path, &content).with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        let permissions = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, permissions)?;
    }

    Ok(())
}

/// Serialize config to HUML format.
///
/// huml-rs may not support serialization, so we manually generate HUML.
fn serialize_to_huml(config: &CliConfig) -> String {
    let mut output = String::new();

    output.push_str("%HUML v0.2.0\n");

    let strings = [
        ("keytool", config.keytool.clone()),
        ("openssl", config.openssl.clone()),
        ("apksigner", config.apksigner.clone()),
        (
            "lib_dir",
            config
                .lib_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
        ),
        ("provider_class", config.provider_class.clone()),
    ];
    for (key, value) in strings {
        if let Some(value) = value {
            output.push_str(&format!("{}: \"{}\"\n", key, escape(&value)));
        }
    }
    if let Some(flag) = config.secrets_via_env {
        output.push_str(&format!("secrets_via_env: {}\n", flag));
    }

    output
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_serialize_to_huml() {
        let config = CliConfig {
            keytool: Some("/opt/jdk/bin/keytool".to_string()),
            lib_dir: Some(PathBuf::from("/home/dev/.keysigner/lib")),
            secrets_via_env: Some(true),
            ..Default::default()
        };

        let huml = serialize_to_huml(&config);

        assert!(huml.starts_with("%HUML v0.2.0\n"));
        assert!(huml.contains("keytool: \"/opt/jdk/bin/keytool\"\n"));
        assert!(huml.contains("lib_dir: \"/home/dev/.keysigner/lib\"\n"));
        assert!(huml.contains("secrets_via_env: true\n"));
        assert!(!huml.contains("openssl"));
    }

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape(r#"C:\tools\"x""#), r#"C:\\tools\\\"x\""#);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.huml");
        fs::write(&path, "%HUML v0.2.0\n").unwrap();

        let err = init_config(Some(&path), false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "%HUML v0.2.0\n");
    }

    #[test]
    fn test_init_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.huml");

        init_config(Some(&path), false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("apksigner: \"apksigner\""));
        #[cfg(unix)]
        assert_eq!(
            fs::metadata(&path).unwrap().permissions().mode() & 0o777,
            0o600
        );
    }
}
