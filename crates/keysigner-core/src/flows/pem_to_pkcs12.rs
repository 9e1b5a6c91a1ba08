//! Packing a certificate and PKCS8 private key into a PKCS12 keystore.

use std::path::PathBuf;

use super::{run_plan, Plan, Session};
use crate::builders::{apksigner, openssl};
use crate::command::duplicate_secret;
use crate::error::Result;
use crate::models::{CredentialSource, PemToPkcs12Params};
use crate::output_dir::DEFAULT_KEYSTORE_DIR;
use crate::prompt::{ask_secret, Field};
use crate::toolchain::Toolchain;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub async fn run(session: &mut Session<'_>) -> Result<()> {
    let params = gather(session)?;
    let plan = plan(&params, session.toolchain);
    run_plan(session, plan).await
}

pub fn gather(session: &mut Session<'_>) -> Result<PemToPkcs12Params> {
    let certificate_path = PathBuf::from(
        session.ask(&Field::path("Enter certificate path (x509 PEM format - .x509.pem): "))?,
    );
    let private_key_path =
        PathBuf::from(session.ask(&Field::path("Enter private key path (PKCS8 format - .pk8): "))?);
    let store_name = session.ask(&Field::text("Enter keystore name: "))?;
    let alias = session.ask(&Field::text("Enter alias name: "))?;
    let password = ask_secret(
        session.prompter,
        &Field::secret("Enter keystore password: ", MIN_PASSWORD_LENGTH),
    )?;
    let output_dir = session.output_dir(DEFAULT_KEYSTORE_DIR)?;

    Ok(PemToPkcs12Params {
        certificate_path,
        private_key_path,
        store_name,
        alias,
        password,
        output_dir,
    })
}

pub fn plan(params: &PemToPkcs12Params, toolchain: &Toolchain) -> Plan {
    let keystore = params.keystore_path();
    let credentials = CredentialSource::KeystoreWithKeyPassword {
        path: keystore.clone(),
        store_password: duplicate_secret(&params.password),
        alias: params.alias.clone(),
        key_password: duplicate_secret(&params.password),
    };

    Plan::new()
        .step(
            "OpenSSL command to convert PKCS8 (PK8) Key to PEM",
            "Private key conversion to PEM format failed.",
            openssl::pk8_to_pem(params, toolchain),
        )
        .step(
            "OpenSSL command to convert PEM to PKCS12",
            "PKCS12 conversion failed.",
            openssl::export_pkcs12(params, toolchain),
        )
        .produces(&keystore)
        .summary(format!("PKCS12 keystore generated at: {}", keystore.display()))
        .log_to(params.log_path())
        .followup(
            "APKSigner command to sign APK",
            apksigner::signing_template(&credentials, toolchain),
        )
}
