//! APK signing with apksigner.

use std::path::PathBuf;

use super::{run_plan, Plan, Session};
use crate::builders::apksigner;
use crate::error::Result;
use crate::models::{CredentialSource, SignParams, SigningSchemes};
use crate::output_dir::DEFAULT_SIGNED_DIR;
use crate::prompt::{ask_secret, choose_option, confirm, Field, Tone};
use crate::toolchain::Toolchain;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Answers accepted at the credential prompt.
pub const CREDENTIAL_KINDS: [&str; 4] = ["jks", "p12", "pem", "test"];

pub async fn run(session: &mut Session<'_>) -> Result<()> {
    let params = gather(session)?;
    let plan = plan(&params, session.toolchain);
    run_plan(session, plan).await
}

pub fn gather(session: &mut Session<'_>) -> Result<SignParams> {
    let apk_path = PathBuf::from(session.ask(&Field::path("Enter the APK file to sign: "))?);
    let output_dir = session.output_dir(DEFAULT_SIGNED_DIR)?;
    let schemes = gather_schemes(session)?;

    let kind = choose_option(
        session.prompter,
        "Enter keystore type (jks/p12/pem/test): ",
        &CREDENTIAL_KINDS,
    )?;
    session.say(Tone::Heading, "--- Signing APK with Keystore ---");
    let credentials = gather_credentials(session, &kind)?;

    Ok(SignParams {
        apk_path,
        output_dir,
        schemes,
        credentials,
    })
}

fn gather_schemes(session: &mut Session<'_>) -> Result<SigningSchemes> {
    let defaults = SigningSchemes::default();
    let change = confirm(
        session.prompter,
        "(Scheme v1/v2/v3 Enabled!) Press enter to skip or 'y' to change: ",
        false,
    )?;
    if !change {
        return Ok(defaults);
    }

    session.say(
        Tone::Heading,
        "--- Set Signing Schemes (press Enter to use default values) ---",
    );
    let mut enabled = |version: u8, default: bool| {
        confirm(
            session.prompter,
            &format!("Enable V{} signing? (default: {}): ", version, default),
            default,
        )
    };
    Ok(SigningSchemes {
        v1: enabled(1, defaults.v1)?,
        v2: enabled(2, defaults.v2)?,
        v3: enabled(3, defaults.v3)?,
        v4: enabled(4, defaults.v4)?,
    })
}

fn gather_credentials(session: &mut Session<'_>, kind: &str) -> Result<CredentialSource> {
    match kind {
        "jks" | "p12" => {
            let path = PathBuf::from(session.ask(&Field::path(&format!(
                "Enter {} keystore path: ",
                kind.to_uppercase()
            )))?);
            let store_password = ask_secret(
                session.prompter,
                &Field::secret("Enter keystore password: ", MIN_PASSWORD_LENGTH),
            )?;
            let alias = session.ask(&Field::text("Enter alias name: "))?;
            if kind == "p12" {
                return Ok(CredentialSource::Keystore {
                    path,
                    store_password,
                    alias,
                });
            }
            let key_password = ask_secret(
                session.prompter,
                &Field::secret("Enter alias password: ", MIN_PASSWORD_LENGTH),
            )?;
            Ok(CredentialSource::KeystoreWithKeyPassword {
                path,
                store_password,
                alias,
                key_password,
            })
        }
        "pem" => {
            let certificate =
                PathBuf::from(session.ask(&Field::path("Enter x509 certificate path: "))?);
            let key = PathBuf::from(session.ask(&Field::path("Enter private key path: "))?);
            Ok(CredentialSource::CertificateAndKey { certificate, key })
        }
        _ => {
            session.say(
                Tone::Warning,
                "The test key is public. Never ship an APK signed with it.",
            );
            let toolchain = session.toolchain;
            for file in [toolchain.test_certificate(), toolchain.test_private_key()] {
                if !file.exists() {
                    session.say(
                        Tone::Warning,
                        &format!("Test key file not found: {}", file.display()),
                    );
                }
            }
            Ok(CredentialSource::TestKey)
        }
    }
}

pub fn plan(params: &SignParams, toolchain: &Toolchain) -> Plan {
    Plan::new()
        .step(
            "APK signing command",
            "Command execution failed.",
            apksigner::sign_apk(params, toolchain),
        )
        .summary(format!(
            "APK successfully signed at {}",
            params.signed_apk_path().display()
        ))
        .log_to(params.log_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingRunner, ScriptedPrompter};

    fn apk(dir: &std::path::Path) -> PathBuf {
        let apk = dir.join("app-release.apk");
        std::fs::write(&apk, b"PK").unwrap();
        apk
    }

    #[tokio::test]
    async fn test_sign_with_jks_default_schemes() {
        let dir = tempfile::tempdir().unwrap();
        let apk = apk(dir.path());
        let keystore = dir.path().join("upload.jks");
        std::fs::write(&keystore, b"").unwrap();

        let mut prompter = ScriptedPrompter::new([
            apk.to_str().unwrap(),
            "",
            "",
            "JKS",
            keystore.to_str().unwrap(),
            "storepass",
            "upload",
            "keypass",
        ]);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        run(&mut session).await.unwrap();

        let signed = dir.path().join("signed_apks/app-release_signed.apk");
        assert_eq!(
            runner.commands()[0],
            format!(
                "apksigner sign --ks {} --ks-pass pass:storepass --ks-key-alias upload \
                 --key-pass pass:keypass --v1-signing-enabled=true --v2-signing-enabled=true \
                 --v3-signing-enabled=true --v4-signing-enabled=false --out {} {}",
                keystore.display(),
                signed.display(),
                apk.display()
            )
        );
        assert!(dir.path().join("signed_apks/apk_signing_commands.txt").exists());
        assert_eq!(prompter.secret_reads(), 2);
    }

    #[tokio::test]
    async fn test_changed_schemes_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let apk = apk(dir.path());
        let keystore = dir.path().join("upload.p12");
        std::fs::write(&keystore, b"").unwrap();

        let mut prompter = ScriptedPrompter::new([
            apk.to_str().unwrap(),
            "",
            "y",
            "n",
            "",
            "",
            "y",
            "p12",
            keystore.to_str().unwrap(),
            "storepass",
            "upload",
        ]);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        run(&mut session).await.unwrap();

        let command = &runner.commands()[0];
        assert!(command.contains("--v1-signing-enabled=false"));
        assert!(command.contains("--v2-signing-enabled=true"));
        assert!(command.contains("--v4-signing-enabled=true"));
        assert!(!command.contains("--key-pass"));
    }

    #[tokio::test]
    async fn test_test_key_warns_and_uses_bundled_files() {
        let dir = tempfile::tempdir().unwrap();
        let apk = apk(dir.path());

        let mut prompter =
            ScriptedPrompter::new([apk.to_str().unwrap(), "", "", "maybe", "test"]);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain {
            lib_dir: dir.path().join("lib"),
            ..Toolchain::default()
        };
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        run(&mut session).await.unwrap();

        let warnings = prompter.messages(Tone::Warning);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[1].contains("testkey.x509.pem"));
        assert_eq!(prompter.errors().len(), 1);
        assert!(runner.commands()[0].contains("--cert"));
        assert!(runner.commands()[0].contains("testkey.pk8"));
    }

    #[tokio::test]
    async fn test_failed_signing_reports_and_skips_log() {
        let dir = tempfile::tempdir().unwrap();
        let apk = apk(dir.path());
        let cert = dir.path().join("release.x509.pem");
        let key = dir.path().join("release.pk8");
        std::fs::write(&cert, b"").unwrap();
        std::fs::write(&key, b"").unwrap();

        let mut prompter = ScriptedPrompter::new([
            apk.to_str().unwrap(),
            "",
            "",
            "pem",
            cert.to_str().unwrap(),
            key.to_str().unwrap(),
        ]);
        let runner = RecordingRunner::failing("apksigner");
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        assert!(run(&mut session).await.is_err());
        assert!(prompter.errors()[0].starts_with("Command execution failed."));
        assert!(!dir.path().join("signed_apks/apk_signing_commands.txt").exists());
    }
}
