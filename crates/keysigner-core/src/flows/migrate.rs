//! Conversion of a keystore into another container type.

use std::path::PathBuf;

use secrecy::ExposeSecret;

use super::{run_plan, Plan, Session};
use crate::builders::{apksigner, keytool};
use crate::command::duplicate_secret;
use crate::error::Result;
use crate::keystore::{detect_keystore_type, Detection};
use crate::models::{CredentialSource, KeystoreType, MigrateParams};
use crate::output_dir::DEFAULT_KEYSTORE_DIR;
use crate::prompt::{
    ask_secret, choose_destination_type, choose_keystore_type, choose_keystore_type_or, Field,
    Tone,
};
use crate::toolchain::Toolchain;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub async fn run(session: &mut Session<'_>) -> Result<()> {
    let params = gather(session)?;
    let plan = plan(&params, session.toolchain)?;
    run_plan(session, plan).await
}

pub fn gather(session: &mut Session<'_>) -> Result<MigrateParams> {
    session.say(Tone::Heading, "--- Source Keystore ---");

    let source_path = PathBuf::from(session.ask(&Field::path("Enter source keystore path: "))?);
    let source_type = match detect_keystore_type(&source_path) {
        Detection::Certain(detected) => {
            session.say(Tone::Info, &format!("Detected keystore type: {}", detected));
            detected
        }
        Detection::Likely(guess) => choose_keystore_type_or(
            session.prompter,
            "Enter source keystore type",
            &KeystoreType::ALL,
            guess,
        )?,
        Detection::Unknown => choose_keystore_type(
            session.prompter,
            "Enter source keystore type",
            &KeystoreType::ALL,
        )?,
    };

    let source_password = ask_secret(
        session.prompter,
        &Field::secret("Enter source keystore password: ", MIN_PASSWORD_LENGTH),
    )?;
    let source_alias = session.ask(&Field::text("Enter source alias: "))?;
    let source_key_password = if source_type.has_separate_key_password() {
        Some(ask_secret(
            session.prompter,
            &Field::secret_or(
                "Enter source alias password (default: same as keystore password): ",
                source_password.expose_secret(),
                MIN_PASSWORD_LENGTH,
            ),
        )?)
    } else {
        None
    };

    session.say(Tone::Heading, "--- Destination Keystore ---");
    let dest_type = choose_destination_type(session.prompter, source_type)?;
    let dest_password = ask_secret(
        session.prompter,
        &Field::secret_or(
            "Enter destination keystore password (default: same as source): ",
            source_password.expose_secret(),
            MIN_PASSWORD_LENGTH,
        ),
    )?;

    let dest_alias_prompt = format!("Enter destination alias (default: {}): ", source_alias);
    let dest_alias = match session.ask(&Field::optional(&dest_alias_prompt))? {
        alias if alias.is_empty() => source_alias.clone(),
        alias => alias,
    };

    let dest_key_password = if dest_type.has_separate_key_password() {
        let effective_source_key = source_key_password.as_ref().unwrap_or(&source_password);
        Some(ask_secret(
            session.prompter,
            &Field::secret_or(
                "Enter destination alias password (default: same as source alias password): ",
                effective_source_key.expose_secret(),
                MIN_PASSWORD_LENGTH,
            ),
        )?)
    } else {
        None
    };

    let output_dir = session.output_dir(DEFAULT_KEYSTORE_DIR)?;
    session.say(Tone::Success, "Migration input successfully gathered!");

    Ok(MigrateParams {
        source_path,
        source_type,
        source_password,
        source_alias,
        source_key_password,
        dest_type,
        dest_password,
        dest_alias,
        dest_key_password,
        output_dir,
    })
}

pub fn plan(params: &MigrateParams, toolchain: &Toolchain) -> Result<Plan> {
    let dest_path = params.dest_path();
    let plan = Plan::new()
        .step(
            format!(
                "{} to {} Keystore Migration Command",
                params.source_type, params.dest_type
            ),
            "Keystore migration failed.",
            keytool::import_keystore(params, toolchain)?,
        )
        .summary(format!(
            "{} migrated to {} at: {}",
            params.source_type,
            params.dest_type,
            dest_path.display()
        ))
        .log_to(params.log_path());

    if params.dest_type == KeystoreType::Bks {
        return Ok(plan);
    }
    let credentials = CredentialSource::KeystoreWithKeyPassword {
        path: dest_path,
        store_password: duplicate_secret(&params.dest_password),
        alias: params.dest_alias.clone(),
        key_password: duplicate_secret(params.dest_key_password()),
    };

    Ok(plan.followup(
        "APK Signer Command",
        apksigner::signing_template(&credentials, toolchain),
    ))
}
