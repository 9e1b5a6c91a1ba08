use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keysigner_core::executor::ProcessRunner;
use keysigner_core::flows::{Operation, Session};
use keysigner_core::KeysignerError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod terminal;

use commands::{
    config::{handle_config_command, ConfigCommands},
    menu::{print_banner, print_notes, run_menu},
};
use terminal::{goodbye, TermPrompter};

#[derive(Parser)]
#[command(name = "keysigner")]
#[command(version = keysigner_core::VERSION)]
#[command(about = "Generate, migrate and inspect Android keystores and sign APKs", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.keysigner/config.huml
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Directory with the Bouncy Castle jar and the test key pair
    #[arg(long, global = true)]
    lib_dir: Option<PathBuf>,

    /// Pass passwords to the tools through environment variables
    #[arg(long, global = true)]
    secrets_via_env: bool,

    /// Do not print the banner before the menu
    #[arg(long, global = true)]
    no_banner: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new keystore (JKS/BKS/PKCS12)
    Generate,

    /// Migrate a keystore to another type
    Migrate,

    /// Convert PKCS12 to PEM and extract certificate and key
    #[command(name = "p12-to-pem")]
    P12ToPem,

    /// Convert a certificate and PKCS8 key to PKCS12
    #[command(name = "pem-to-p12")]
    PemToP12,

    /// Show keystore information
    Info,

    /// Sign an APK
    Sign,

    /// Show usage notes
    Notes,

    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

impl Commands {
    fn operation(&self) -> Option<Operation> {
        match self {
            Commands::Generate => Some(Operation::Generate),
            Commands::Migrate => Some(Operation::Migrate),
            Commands::P12ToPem => Some(Operation::Pkcs12ToPem),
            Commands::PemToP12 => Some(Operation::PemToPkcs12),
            Commands::Info => Some(Operation::Info),
            Commands::Sign => Some(Operation::Sign),
            Commands::Notes | Commands::Config(_) => None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    // Diagnostics go to stderr and stay quiet unless RUST_LOG asks for more
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Config and notes don't need the toolchain, handle separately
    match cli.command {
        Some(Commands::Config(cmd)) => return handle_config_command(cmd, cli.config_file.as_deref()),
        Some(Commands::Notes) => {
            print_notes();
            return Ok(());
        }
        _ => {}
    }

    let file_config = config::load_config(cli.config_file.as_deref())?;
    let toolchain =
        config::resolve_toolchain(cli.lib_dir.as_deref(), cli.secrets_via_env, file_config)?;
    tracing::debug!("Resolved toolchain: {:?}", toolchain);

    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let mut prompter = TermPrompter::new();
    let runner = ProcessRunner::new();
    let mut session = Session::new(&mut prompter, &runner, &toolchain, cwd);

    let result = match cli.command.as_ref().and_then(Commands::operation) {
        Some(operation) => operation.run(&mut session).await,
        None => {
            if !cli.no_banner {
                print_banner();
            }
            run_menu(&mut session).await
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(KeysignerError::Quit) => {
            goodbye();
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_direct_operation_with_flags() {
        let cli = Cli::try_parse_from([
            "keysigner",
            "p12-to-pem",
            "--lib-dir",
            "/opt/lib",
            "--secrets-via-env",
        ])
        .unwrap();
        assert_eq!(
            cli.command.as_ref().and_then(Commands::operation),
            Some(Operation::Pkcs12ToPem)
        );
        assert_eq!(cli.lib_dir, Some(PathBuf::from("/opt/lib")));
        assert!(cli.secrets_via_env);
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["keysigner", "--no-banner"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.no_banner);
    }

    #[test]
    fn test_config_subcommand_parses() {
        let cli = Cli::try_parse_from(["keysigner", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config(ConfigCommands::Init { force: true }))
        ));
    }
}
