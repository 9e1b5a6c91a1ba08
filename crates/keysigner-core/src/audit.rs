//! Append-only command transcripts.
//!
//! Every successful invocation is written as a description line, the
//! shell-quoted command line and a blank line, so the file can be replayed
//! by hand. Entries for the same keystore accumulate in one file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::command::ToolCommand;
use crate::error::Result;

/// Formats one transcript entry.
pub fn format_entry(description: &str, command: &ToolCommand) -> String {
    format!("{}:\n{}\n\n", description, command.command_line())
}

/// A transcript file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry, creating the file if needed.
    pub fn record(&self, description: &str, command: &ToolCommand) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format_entry(description, command).as_bytes())?;

        tracing::debug!("Recorded '{}' in {}", description, self.path.display());
        Ok(())
    }
}
