//! Splitting a PKCS12 container into certificate and private key files.

use std::path::PathBuf;

use super::{run_plan, Plan, Session};
use crate::builders::{apksigner, openssl};
use crate::error::Result;
use crate::models::{CredentialSource, Pkcs12ToPemParams};
use crate::output_dir::DEFAULT_KEYSTORE_DIR;
use crate::prompt::{ask_secret, Field};
use crate::toolchain::Toolchain;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub async fn run(session: &mut Session<'_>) -> Result<()> {
    let params = gather(session)?;
    let plan = plan(&params, session.toolchain);
    run_plan(session, plan).await
}

pub fn gather(session: &mut Session<'_>) -> Result<Pkcs12ToPemParams> {
    let p12_path = PathBuf::from(session.ask(&Field::path("Enter PKCS12 file path: "))?);
    let password = ask_secret(
        session.prompter,
        &Field::secret("Enter PKCS12 password: ", MIN_PASSWORD_LENGTH),
    )?;
    let output_dir = session.output_dir(DEFAULT_KEYSTORE_DIR)?;

    Ok(Pkcs12ToPemParams {
        p12_path,
        password,
        output_dir,
    })
}

pub fn plan(params: &Pkcs12ToPemParams, toolchain: &Toolchain) -> Plan {
    let certificate = params.certificate_path();
    let private_key = params.private_key_path();

    let credentials = CredentialSource::CertificateAndKey {
        certificate: certificate.clone(),
        key: private_key.clone(),
    };

    Plan::new()
        .step(
            "Openssl command to convert PKCS12 to PEM",
            "PEM conversion failed.",
            openssl::pkcs12_to_pem(params, toolchain),
        )
        .step(
            "Openssl command to extract x509 certificate",
            "x509 certificate extraction failed.",
            openssl::extract_certificate(params, toolchain),
        )
        .step(
            "Openssl command to extract private key",
            "Private key extraction failed.",
            openssl::extract_private_key(params, toolchain),
        )
        .produces(&certificate)
        .produces(&private_key)
        .summary(format!("PEM file generated at: {}", params.pem_path().display()))
        .summary(format!(
            "x509 certificate generated at: {}",
            certificate.display()
        ))
        .summary(format!("Private key generated at: {}", private_key.display()))
        .log_to(params.log_path())
        .followup(
            "APK Signer Command",
            apksigner::signing_template(&credentials, toolchain),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeysignerError;
    use crate::testing::{RecordingRunner, ScriptedPrompter};

    fn prompter_for(p12: &std::path::Path, out: &std::path::Path) -> ScriptedPrompter {
        ScriptedPrompter::new([
            p12.to_str().unwrap(),
            "p12password",
            out.to_str().unwrap(),
        ])
    }

    #[tokio::test]
    async fn test_conversion_runs_three_steps_and_checks_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let p12 = dir.path().join("upload.p12");
        std::fs::write(&p12, b"").unwrap();
        let out = dir.path().join("out");
        // Stand in for the files openssl would write.
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("upload.x509.pem"), b"cert").unwrap();
        std::fs::write(out.join("upload.pk8"), b"key").unwrap();

        let mut prompter = prompter_for(&p12, &out);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        run(&mut session).await.unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 3);
        assert!(commands[0].starts_with("openssl pkcs12 -in"));
        assert!(commands[0].ends_with("-nodes -password pass:p12password"));
        assert!(commands[1].starts_with("openssl x509"));
        assert!(commands[2].starts_with("openssl pkcs8 -topk8"));

        let log = std::fs::read_to_string(out.join("upload_PEM_commands.txt")).unwrap();
        assert!(log.contains("Openssl command to extract private key:\n"));
        assert!(log.contains("--cert"));
        assert!(log.ends_with("--out signed.apk unsigned.apk\n\n"));
    }

    #[tokio::test]
    async fn test_missing_key_is_reported_and_not_logged() {
        let dir = tempfile::tempdir().unwrap();
        let p12 = dir.path().join("upload.p12");
        std::fs::write(&p12, b"").unwrap();
        let out = dir.path().join("out");

        let mut prompter = prompter_for(&p12, &out);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        let err = run(&mut session).await.unwrap_err();

        assert!(matches!(err, KeysignerError::MissingArtifact(_)));
        assert!(!out.join("upload_PEM_commands.txt").exists());
        assert!(prompter.errors()[0].contains("upload.x509.pem"));
    }

    #[tokio::test]
    async fn test_short_password_is_asked_again() {
        let dir = tempfile::tempdir().unwrap();
        let p12 = dir.path().join("upload.p12");
        std::fs::write(&p12, b"").unwrap();

        let mut prompter = ScriptedPrompter::new([p12.to_str().unwrap(), "12345", "123456", ""]);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        let params = gather(&mut session).unwrap();

        assert_eq!(params.output_dir, dir.path().join("keystore"));
        assert_eq!(
            prompter.errors(),
            vec!["Password must be at least 6 characters long."]
        );
    }
}
