//! apksigner invocations.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use super::{env_vars, path_arg};
use crate::command::ToolCommand;
use crate::models::{CredentialSource, SignParams, SigningSchemes};
use crate::toolchain::Toolchain;

/// Placeholder file names used in recorded signing templates.
pub const TEMPLATE_OUTPUT: &str = "signed.apk";
pub const TEMPLATE_INPUT: &str = "unsigned.apk";

/// Borrowed view of a credential source, with the test key resolved.
enum Credentials<'a> {
    Keystore {
        path: &'a Path,
        store_password: &'a SecretString,
        alias: &'a str,
        key_password: Option<&'a SecretString>,
    },
    CertificateAndKey {
        certificate: PathBuf,
        key: PathBuf,
    },
}

impl<'a> Credentials<'a> {
    fn resolve(source: &'a CredentialSource, toolchain: &Toolchain) -> Self {
        match source {
            CredentialSource::Keystore {
                path,
                store_password,
                alias,
            } => Credentials::Keystore {
                path,
                store_password,
                alias,
                key_password: None,
            },
            CredentialSource::KeystoreWithKeyPassword {
                path,
                store_password,
                alias,
                key_password,
            } => Credentials::Keystore {
                path,
                store_password,
                alias,
                key_password: Some(key_password),
            },
            CredentialSource::CertificateAndKey { certificate, key } => {
                Credentials::CertificateAndKey {
                    certificate: certificate.clone(),
                    key: key.clone(),
                }
            }
            CredentialSource::TestKey => Credentials::CertificateAndKey {
                certificate: toolchain.test_certificate(),
                key: toolchain.test_private_key(),
            },
        }
    }

    fn apply(&self, cmd: ToolCommand, toolchain: &Toolchain) -> ToolCommand {
        let passing = toolchain.secret_passing;
        match self {
            Credentials::Keystore {
                path,
                store_password,
                alias,
                key_password,
            } => {
                let cmd = cmd
                    .arg("--ks")
                    .arg(path_arg(path))
                    .pass_phrase("--ks-pass", env_vars::STORE_PASS, store_password, passing)
                    .arg("--ks-key-alias")
                    .arg(*alias);
                match key_password {
                    Some(key_password) => {
                        cmd.pass_phrase("--key-pass", env_vars::KEY_PASS, key_password, passing)
                    }
                    None => cmd,
                }
            }
            Credentials::CertificateAndKey { certificate, key } => cmd
                .arg("--cert")
                .arg(path_arg(certificate))
                .arg("--key")
                .arg(path_arg(key)),
        }
    }
}

/// `apksigner sign` for the given APK and credentials.
pub fn sign_apk(params: &SignParams, toolchain: &Toolchain) -> ToolCommand {
    let cmd = Credentials::resolve(&params.credentials, toolchain)
        .apply(ToolCommand::new(&toolchain.apksigner).arg("sign"), toolchain);

    scheme_flags(cmd, &params.schemes)
        .arg("--out")
        .arg(path_arg(&params.signed_apk_path()))
        .arg(path_arg(&params.apk_path))
}

fn scheme_flags(cmd: ToolCommand, schemes: &SigningSchemes) -> ToolCommand {
    schemes
        .versions()
        .into_iter()
        .fold(cmd, |cmd, (version, enabled)| {
            cmd.arg(format!("--v{}-signing-enabled={}", version, enabled))
        })
}

/// Ready-to-use signing command for freshly produced credentials.
///
/// Recorded in the transcript next to the command that created the
/// credentials, never executed.
pub fn signing_template(credentials: &CredentialSource, toolchain: &Toolchain) -> ToolCommand {
    let cmd = Credentials::resolve(credentials, toolchain)
        .apply(ToolCommand::new(&toolchain.apksigner).arg("sign"), toolchain);

    SigningSchemes::default()
        .versions()
        .into_iter()
        .fold(cmd, |cmd, (version, enabled)| {
            cmd.arg(format!("--v{}-signing-enabled", version))
                .arg(enabled.to_string())
        })
        .args(["--out", TEMPLATE_OUTPUT, TEMPLATE_INPUT])
}
