//! Interactive main menu, banner and usage notes.

use console::style;
use keysigner_core::flows::{Operation, Session};
use keysigner_core::prompt::{is_quit_token, Tone};
use keysigner_core::{KeysignerError, Result};

const LOGO: &str = r"
+---------Welcome to-----------------------------+
|    __                   _                      |
|   / /_____  __  _______(_)___ _____  ___  _____|
|  / //_/ _ \/ / / / ___/ / __ `/ __ \/ _ \/ ___/|
| / ,< /  __/ /_/ (__  ) / /_/ / / / /  __/ /    |
|/_/|_|\___/\__, /____/_/\__, /_/ /_/\___/_/     |
|          /____/       /____/                   |
+------------------------------------------------+";

const NOTES: [&str; 14] = [
    "'.keystore' is just another extension, historically for JKS. Newer JDKs write PKCS12 under the same name, so the type of a '.keystore' file is read from its contents and confirmed with you.",
    "When generating a new keystore prefer PKCS12, and migrate existing JKS keystores to PKCS12. PKCS12 is modern, secure and widely compatible. Migrating from PKCS12 to JKS is not recommended and is only offered for third-party tools that require it.",
    "To add more entries to an existing keystore, keep the keystore name, keystore password and output path the same and change the other details for each new entry.",
    "During migration the keystore password and alias name can be changed. The certificate and key stay unchanged; verify them with the keystore information option.",
    "PKCS12 does not keep separate passwords for the keystore and its aliases, so the alias password is always the keystore password.",
    "keytool reads the first entry of the source keystore and expects the alias password to match the keystore password unless told otherwise.",
    "PKCS12 to PEM conversion extracts the '.x509.pem' and '.pk8' files from the first entry only. Handle further entries one by one.",
    "After creating a keystore, also extract its '.x509.pem' and '.pk8' files so signing does not need passwords and alias names.",
    "apksigner cannot sign with a BKS keystore directly. Migrate it to JKS or PKCS12 first.",
    "Changing an APK after signing invalidates the signature. Run zipalign before signing, not after.",
    "Back up every generated keystore and its details. Losing them can be costly.",
    "Never store keystores or passwords on untrusted sources or servers.",
    "To add keystore verification to your project, check out SigTool. It prints the SHA-1, SHA-224, SHA-256, SHA-384, SHA-512, MD5 and CRC32 digests of your keystore, its Java-style hashCode and their base64 forms, and the smali byte array of the signature. SigTool is here:\nhttps://github.com/muhammadrizwan87/sigtool",
    "Every operation that produces files writes the commands it ran to a '<name>_<TYPE>_commands.txt' transcript next to them. Transcripts contain passwords unless secrets are passed via environment.",
];

const AUTHOR: &str = "MuhammadRizwan";
const REPOSITORY: &str = "https://github.com/muhammadrizwan87/keysigner";

const DOCS: [(&str, &str); 2] = [
    (
        "Keytool",
        "https://docs.oracle.com/en/java/javase/21/docs/specs/man/keytool.html",
    ),
    ("Apksigner", "https://developer.android.com/tools/apksigner"),
];

/// A menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Operation),
    Notes,
    Quit,
}

/// Maps `1`..`7`, `q` and `x` to a selection.
pub fn parse_choice(input: &str) -> Option<MenuChoice> {
    let input = input.trim();
    if is_quit_token(input) {
        return Some(MenuChoice::Quit);
    }
    match input.parse::<usize>().ok()? {
        n @ 1..=6 => Some(MenuChoice::Run(Operation::ALL[n - 1])),
        7 => Some(MenuChoice::Notes),
        _ => None,
    }
}

pub fn print_banner() {
    println!("{}", style(LOGO).magenta().bold());
    println!(
        "{}",
        style("To generate and manage keystore using keytool.\nAnd sign APK with custom keystore using apksigner.")
            .cyan()
    );
    println!();
    for (label, value) in banner_details() {
        println!("{} {}", style(format!("{}:", label)).blue(), style(value).green());
    }
}

fn banner_details() -> [(&'static str, &'static str); 3] {
    [
        ("Version", keysigner_core::VERSION),
        ("Author", AUTHOR),
        ("Repository", REPOSITORY),
    ]
}

pub fn print_notes() {
    for (i, note) in NOTES.iter().enumerate() {
        println!("{}", style(format!("{}. {}", i + 1, note)).cyan());
        println!();
    }
    println!("{}", style(format!("{}. Documentation:", NOTES.len() + 1)).cyan());
    for (name, url) in DOCS {
        println!("{}", style(format!("{}:", name)).cyan());
        println!("{}", url);
    }
}

fn print_menu() {
    println!();
    println!("{}", style("Select an option:").magenta().bold());
    for (i, operation) in Operation::ALL.iter().enumerate() {
        println!("{}", style(format!("{}. {}", i + 1, operation.title())).yellow());
    }
    println!(
        "{}",
        style(format!("{}. Show Notes", Operation::ALL.len() + 1)).yellow()
    );
    println!("{}", style("q. Quit").blue());
}

/// Runs operations until the user quits.
///
/// Tool failures end only the current operation. Any other error ends the
/// menu.
pub async fn run_menu(session: &mut Session<'_>) -> Result<()> {
    loop {
        print_menu();
        let answer = session
            .prompter
            .read_line("\nEnter choice (1-7 or q to quit): ")?
            .ok_or(KeysignerError::Quit)?;

        match parse_choice(&answer) {
            Some(MenuChoice::Run(operation)) => match operation.run(session).await {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    tracing::info!("{} did not complete: {}", operation.title(), e);
                }
                Err(e) => return Err(e),
            },
            Some(MenuChoice::Notes) => {
                session.say(Tone::Info, "Showing Notes...");
                print_notes();
            }
            Some(MenuChoice::Quit) => return Err(KeysignerError::Quit),
            None => session.say(Tone::Error, "Invalid choice. Please select a valid option."),
        }
    }
}
