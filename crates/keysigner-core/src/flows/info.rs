//! Listing the entries of a keystore.

use std::path::PathBuf;

use super::{run_plan, Plan, Session};
use crate::builders::keytool;
use crate::error::Result;
use crate::keystore::{detect_keystore_type, Detection};
use crate::models::{InfoParams, KeystoreType};
use crate::prompt::{ask_secret, choose_keystore_type, choose_keystore_type_or, Field};
use crate::toolchain::Toolchain;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub async fn run(session: &mut Session<'_>) -> Result<()> {
    let params = gather(session)?;
    let plan = plan(&params, session.toolchain);
    run_plan(session, plan).await
}

pub fn gather(session: &mut Session<'_>) -> Result<InfoParams> {
    let keystore_path = PathBuf::from(session.ask(&Field::path("Enter keystore path: "))?);
    let store_password = ask_secret(
        session.prompter,
        &Field::secret("Enter keystore password: ", MIN_PASSWORD_LENGTH),
    )?;
    let store_type = match detect_keystore_type(&keystore_path) {
        Detection::Certain(detected) => detected,
        Detection::Likely(guess) => choose_keystore_type_or(
            session.prompter,
            "Please confirm keystore type",
            &KeystoreType::ALL,
            guess,
        )?,
        Detection::Unknown => choose_keystore_type(
            session.prompter,
            "Keystore type not detected. Please enter keystore type",
            &KeystoreType::ALL,
        )?,
    };

    Ok(InfoParams {
        keystore_path,
        store_type,
        store_password,
    })
}

/// keytool prints straight to the terminal; nothing is recorded.
pub fn plan(params: &InfoParams, toolchain: &Toolchain) -> Plan {
    Plan::new().step(
        "KeyTool command to list keystore entries",
        "Failed to show keystore information.",
        keytool::list_keystore(params, toolchain),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingRunner, ScriptedPrompter};

    #[tokio::test]
    async fn test_detected_type_is_listed_without_log() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = dir.path().join("legacy.bks");
        std::fs::write(&keystore, b"").unwrap();

        let mut prompter = ScriptedPrompter::new([keystore.to_str().unwrap(), "storepass"]);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        run(&mut session).await.unwrap();

        let command = &runner.commands()[0];
        assert!(command.starts_with("keytool -list -v -keystore"));
        assert!(command.contains("-storetype BKS"));
        assert!(command.contains("-providerpath lib/bcprov-jdk18on-1.78.jar"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_type_is_asked_after_password() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = dir.path().join("store.dat");
        std::fs::write(&keystore, b"plain text").unwrap();

        let mut prompter =
            ScriptedPrompter::new([keystore.to_str().unwrap(), "storepass", "jks"]);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        let params = gather(&mut session).unwrap();

        assert_eq!(params.store_type, KeystoreType::Jks);
        assert_eq!(
            prompter.prompt_texts()[2],
            "Keystore type not detected. Please enter keystore type (JKS/BKS/PKCS12): "
        );
        assert_eq!(prompter.secret_reads(), 1);
    }

    #[tokio::test]
    async fn test_guessed_type_can_be_corrected() {
        let dir = tempfile::tempdir().unwrap();
        let keystore = dir.path().join("debug.keystore");
        std::fs::write(&keystore, [0x30, 0x82, 0x0A, 0x1B, 0x02, 0x01, 0x03]).unwrap();

        let mut prompter =
            ScriptedPrompter::new([keystore.to_str().unwrap(), "android", "bks"]);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, dir.path());

        run(&mut session).await.unwrap();

        assert_eq!(
            prompter.prompt_texts()[2],
            "Please confirm keystore type (JKS/BKS/PKCS12) [default: PKCS12]: "
        );
        assert!(runner.commands()[0].contains("-storetype BKS"));
    }

    #[tokio::test]
    async fn test_quit_at_path_prompt() {
        let mut prompter = ScriptedPrompter::new(["q"]);
        let runner = RecordingRunner::new();
        let toolchain = Toolchain::default();
        let mut session = Session::new(&mut prompter, &runner, &toolchain, "/");

        assert!(matches!(
            run(&mut session).await,
            Err(crate::error::KeysignerError::Quit)
        ));
        assert!(runner.commands().is_empty());
    }
}
