//! Operation flows.
//!
//! Every operation follows the same shape: gather parameters, build a
//! [`Plan`], then [`run_plan`]. The flows only differ in what they ask and
//! which builders they call.

pub mod generate;
pub mod info;
pub mod migrate;
pub mod pem_to_pkcs12;
pub mod pkcs12_to_pem;
pub mod sign;

use std::path::PathBuf;

use crate::audit::AuditLog;
use crate::command::ToolCommand;
use crate::error::{KeysignerError, Result};
use crate::executor::ToolRunner;
use crate::output_dir::resolve_output_dir;
use crate::prompt::{ask, Field, Prompter, Tone};
use crate::toolchain::Toolchain;

/// What a flow needs from the outside world.
pub struct Session<'a> {
    pub prompter: &'a mut dyn Prompter,
    pub runner: &'a dyn ToolRunner,
    pub toolchain: &'a Toolchain,
    /// Base for relative paths and default output directories.
    pub cwd: PathBuf,
}

impl<'a> Session<'a> {
    pub fn new(
        prompter: &'a mut dyn Prompter,
        runner: &'a dyn ToolRunner,
        toolchain: &'a Toolchain,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prompter,
            runner,
            toolchain,
            cwd: cwd.into(),
        }
    }

    pub fn say(&mut self, tone: Tone, message: &str) {
        self.prompter.say(tone, message);
    }

    pub fn ask(&mut self, field: &Field<'_>) -> Result<String> {
        ask(self.prompter, field)
    }

    /// Asks for the output directory and makes sure it exists.
    pub fn output_dir(&mut self, default_name: &str) -> Result<PathBuf> {
        let prompt = format!(
            "Enter output path (default: {}): ",
            self.cwd.join(default_name).display()
        );
        let answer = self.ask(&Field::optional(&prompt))?;
        resolve_output_dir(&self.cwd, &answer, default_name)
    }
}

/// One tool invocation within a plan.
#[derive(Debug)]
pub struct Step {
    pub description: String,
    pub command: ToolCommand,
    /// Shown when the tool fails.
    pub failure: &'static str,
}

/// Steps to run, artifacts to check and what to record afterwards.
#[derive(Debug, Default)]
pub struct Plan {
    steps: Vec<Step>,
    expected: Vec<PathBuf>,
    summary: Vec<String>,
    log: Option<AuditLog>,
    followups: Vec<(String, ToolCommand)>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(
        mut self,
        description: impl Into<String>,
        failure: &'static str,
        command: ToolCommand,
    ) -> Self {
        self.steps.push(Step {
            description: description.into(),
            command,
            failure,
        });
        self
    }

    /// A file that must exist once every step succeeded.
    pub fn produces(mut self, path: impl Into<PathBuf>) -> Self {
        self.expected.push(path.into());
        self
    }

    /// A line reported after success.
    pub fn summary(mut self, line: impl Into<String>) -> Self {
        self.summary.push(line.into());
        self
    }

    /// Transcript the steps are appended to after success.
    pub fn log_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.log = Some(AuditLog::new(path));
        self
    }

    /// A command recorded in the transcript but never run.
    pub fn followup(mut self, description: impl Into<String>, command: ToolCommand) -> Self {
        self.followups.push((description.into(), command));
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn followups(&self) -> &[(String, ToolCommand)] {
        &self.followups
    }
}

/// Runs every step in order.
///
/// The first failing step aborts the plan and nothing is written to the
/// transcript. Artifacts of earlier steps are left on disk.
pub async fn run_plan(session: &mut Session<'_>, plan: Plan) -> Result<()> {
    for step in &plan.steps {
        session.say(Tone::Heading, &format!("--- {} ---", step.description));
        tracing::info!("Executing '{}'", step.description);

        if let Err(err) = session.runner.run(&step.command).await {
            session.say(Tone::Error, &format!("{} ({})", step.failure, err));
            return Err(err);
        }
    }

    for path in &plan.expected {
        if !path.exists() {
            session.say(
                Tone::Error,
                &format!("Error: {} is missing after conversion.", path.display()),
            );
            return Err(KeysignerError::MissingArtifact(path.clone()));
        }
    }

    for line in &plan.summary {
        session.say(Tone::Success, line);
    }

    if let Some(log) = &plan.log {
        for step in &plan.steps {
            log.record(&step.description, &step.command)?;
        }
        for (description, command) in &plan.followups {
            log.record(description, command)?;
        }
        session.say(
            Tone::Success,
            &format!("Commands exported to {}", log.path().display()),
        );
    }

    Ok(())
}

/// The operations offered by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Migrate,
    Pkcs12ToPem,
    PemToPkcs12,
    Info,
    Sign,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Generate,
        Operation::Migrate,
        Operation::Pkcs12ToPem,
        Operation::PemToPkcs12,
        Operation::Info,
        Operation::Sign,
    ];

    /// Menu label.
    pub fn title(&self) -> &'static str {
        match self {
            Operation::Generate => "Generate new keystore (JKS/BKS/PKCS12)",
            Operation::Migrate => "Migrate keystores to each other (JKS/BKS/PKCS12)",
            Operation::Pkcs12ToPem => "Convert PKCS12 to PEM and extract certificate and key",
            Operation::PemToPkcs12 => "Convert PEM to PKCS12",
            Operation::Info => "Show keystore information",
            Operation::Sign => "Sign APK",
        }
    }

    /// Shown when the operation starts.
    pub fn announcement(&self) -> &'static str {
        match self {
            Operation::Generate => "Generating new keystore (JKS/BKS/PKCS12)...",
            Operation::Migrate => "Migrating keystores (JKS/BKS/PKCS12)...",
            Operation::Pkcs12ToPem => {
                "Converting PKCS12 to PEM and extracting x509 and private key..."
            }
            Operation::PemToPkcs12 => "Converting PEM to PKCS12...",
            Operation::Info => "Showing keystore information...",
            Operation::Sign => "Signing APK...",
        }
    }

    pub async fn run(self, session: &mut Session<'_>) -> Result<()> {
        session.say(Tone::Info, self.announcement());
        match self {
            Operation::Generate => generate::run(session).await,
            Operation::Migrate => migrate::run(session).await,
            Operation::Pkcs12ToPem => pkcs12_to_pem::run(session).await,
            Operation::PemToPkcs12 => pem_to_pkcs12::run(session).await,
            Operation::Info => info::run(session).await,
            Operation::Sign => sign::run(session).await,
        }
    }
}
