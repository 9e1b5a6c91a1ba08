//! Test doubles for driving flows without a terminal or external tools.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::command::ToolCommand;
use crate::error::{KeysignerError, Result};
use crate::executor::ToolRunner;
use crate::prompt::{Prompter, Tone};

/// Answers prompts from a fixed script and records what was shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    secret_reads: usize,
    messages: Vec<(Tone, String)>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn prompts_seen(&self) -> usize {
        self.prompts.len()
    }

    pub fn prompt_texts(&self) -> &[String] {
        &self.prompts
    }

    pub fn secret_reads(&self) -> usize {
        self.secret_reads
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn messages(&self, tone: Tone) -> Vec<String> {
        self.messages
            .iter()
            .filter(|(t, _)| *t == tone)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Tone::Error)
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.secret_reads += 1;
        self.read_line(prompt)
    }

    fn say(&mut self, tone: Tone, message: &str) {
        self.messages.push((tone, message.to_string()));
    }
}

/// Records every command and fails the ones whose program is listed.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<String>>,
    failing_programs: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invocation of `program` exits with status 1.
    pub fn failing(program: &str) -> Self {
        Self {
            failing_programs: vec![program.to_string()],
            ..Default::default()
        }
    }

    /// Command lines in the order they were run.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for RecordingRunner {
    async fn run(&self, command: &ToolCommand) -> Result<()> {
        self.commands.lock().unwrap().push(command.command_line());
        if self
            .failing_programs
            .iter()
            .any(|p| p == command.program())
        {
            return Err(KeysignerError::ToolFailed {
                program: command.program().to_string(),
                code: Some(1),
            });
        }
        Ok(())
    }
}
