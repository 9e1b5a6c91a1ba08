//! New keystore (or new entry) generation.

use secrecy::ExposeSecret;

use super::{run_plan, Plan, Session};
use crate::builders::{apksigner, keytool};
use crate::command::duplicate_secret;
use crate::error::Result;
use crate::models::{
    CredentialSource, DistinguishedName, GenerateParams, KeystoreType, DEFAULT_VALIDITY_DAYS,
};
use crate::output_dir::DEFAULT_KEYSTORE_DIR;
use crate::prompt::{ask_number, ask_secret, choose_keystore_type, Field, Tone};
use crate::toolchain::Toolchain;

/// Minimum keystore and key password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub async fn run(session: &mut Session<'_>) -> Result<()> {
    let params = gather(session)?;
    let plan = plan(&params, session.toolchain);
    run_plan(session, plan).await
}

pub fn gather(session: &mut Session<'_>) -> Result<GenerateParams> {
    session.say(Tone::Heading, "--- Setting Keystore Details ---");

    let store_type =
        choose_keystore_type(session.prompter, "Enter new keystore type", &KeystoreType::ALL)?;
    let store_name = session.ask(&Field::text("Enter keystore name: "))?;
    let store_password = ask_secret(
        session.prompter,
        &Field::secret("Enter keystore password: ", MIN_PASSWORD_LENGTH),
    )?;
    let alias = session.ask(&Field::text("Enter alias name: "))?;

    let key_password = if store_type.has_separate_key_password() {
        Some(ask_secret(
            session.prompter,
            &Field::secret_or(
                "Enter alias password (default: same as keystore password): ",
                store_password.expose_secret(),
                MIN_PASSWORD_LENGTH,
            ),
        )?)
    } else {
        None
    };

    let validity_days = ask_number(
        session.prompter,
        "Enter validity (days, default 36500): ",
        DEFAULT_VALIDITY_DAYS,
    )?;
    let dname = gather_dname(session)?;
    session.say(Tone::Success, "Keystore details successfully set!");

    let output_dir = session.output_dir(DEFAULT_KEYSTORE_DIR)?;

    Ok(GenerateParams {
        store_type,
        store_name,
        store_password,
        alias,
        key_password,
        validity_days,
        dname,
        output_dir,
    })
}

fn gather_dname(session: &mut Session<'_>) -> Result<DistinguishedName> {
    session.say(
        Tone::Heading,
        "--- Generating Distinguished Name (Press enter to skip) ---",
    );
    Ok(DistinguishedName {
        common_name: session.ask(&Field::optional("Enter CN (Common Name): "))?,
        organizational_unit: session.ask(&Field::optional("Enter OU (Organizational Unit): "))?,
        organization: session.ask(&Field::optional("Enter O (Organization): "))?,
        locality: session.ask(&Field::optional("Enter L (Locality): "))?,
        state: session.ask(&Field::optional("Enter ST (State): "))?,
        country: session.ask(&Field::optional("Enter C (Country Code): "))?,
    })
}

pub fn plan(params: &GenerateParams, toolchain: &Toolchain) -> Plan {
    let store_path = params.store_path();
    let plan = Plan::new()
        .step(
            format!("Keystore command to generate new {}", params.store_type),
            "Keystore generation failed.",
            keytool::generate_keypair(params, toolchain),
        )
        .summary(format!(
            "Keystore {} generated at: {}",
            params.store_type,
            store_path.display()
        ))
        .log_to(params.log_path());

    // apksigner cannot read BKS keystores.
    if params.store_type.requires_provider() {
        return plan;
    }

    let credentials = CredentialSource::KeystoreWithKeyPassword {
        path: store_path,
        store_password: duplicate_secret(&params.store_password),
        alias: params.alias.clone(),
        key_password: duplicate_secret(params.key_password()),
    };
    plan.followup(
        "APK Signer Command",
        apksigner::signing_template(&credentials, toolchain),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingRunner, ScriptedPrompter};

    fn answers<'a>(store_type: &'a str, out: &'a str) -> Vec<&'a str> {
        vec![
            store_type,
            "app",
            "longpassword",
            "release",
            // validity
            "",
            // CN, OU, O, L, ST, C
            "",
            "",
            "",
            "",
            "",
            "",
            out,
        ]
    }

    #[tokio::test]
    async fn test_pkcs12_generation_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("keys");
        let mut prompter = ScriptedPrompter::new(answers("PKCS12", out.to_str().unwrap()));
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        run(&mut session).await.unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].contains("-dname CN=Unknown"));
        assert!(commands[0].contains("-storepass longpassword"));
        assert!(commands[0].contains("-keypass longpassword"));
        assert!(commands[0].contains("-validity 36500"));

        let log = std::fs::read_to_string(out.join("app_PKCS12_commands.txt")).unwrap();
        assert!(log.starts_with("Keystore command to generate new PKCS12:\nkeytool -genkeypair"));
        assert!(log.contains("APK Signer Command:\napksigner sign --ks"));
        assert_eq!(prompter.remaining(), 0);
    }

    #[tokio::test]
    async fn test_jks_generation_asks_for_alias_password() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new([
            "jks",
            "app",
            "longpassword",
            "release",
            "aliaspassword",
            "365",
            "Jane Doe",
            "",
            "Acme",
            "",
            "",
            "US",
            "",
        ]);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        run(&mut session).await.unwrap();

        let command = &runner.commands()[0];
        assert!(command.contains("-keypass aliaspassword"));
        assert!(command.contains("-validity 365"));
        assert!(command.contains("-dname \"CN=Jane Doe, O=Acme, C=US\""));
        assert!(dir.path().join("keystore/app_JKS_commands.txt").exists());
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_no_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new(answers("pkcs12", ""));
        let runner = RecordingRunner::failing("keytool");
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        assert!(run(&mut session).await.is_err());
        assert!(!dir.path().join("keystore/app_PKCS12_commands.txt").exists());
    }

    #[test]
    fn test_bks_plan_has_provider_and_no_signing_template() {
        let params = GenerateParams {
            store_type: KeystoreType::Bks,
            store_name: "legacy".to_string(),
            store_password: "longpassword".into(),
            alias: "key0".to_string(),
            key_password: None,
            validity_days: DEFAULT_VALIDITY_DAYS,
            dname: DistinguishedName::default(),
            output_dir: "/out".into(),
        };
        let plan = plan(&params, &Toolchain::default());
        assert_eq!(plan.steps().len(), 1);
        assert!(plan.steps()[0].command.argv().contains(&"-providerclass"));
        assert!(plan.followups().is_empty());
    }
}
