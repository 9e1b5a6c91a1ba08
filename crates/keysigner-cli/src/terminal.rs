//! Console-backed [`Prompter`].

use std::io::{self, BufRead, IsTerminal};

use console::{style, Term};
use keysigner_core::prompt::{Prompter, Tone};

/// Reads answers from the terminal, or line by line from piped stdin.
pub struct TermPrompter {
    term: Term,
    interactive: bool,
}

impl TermPrompter {
    pub fn new() -> Self {
        let term = Term::stdout();
        let interactive = term.is_term() && io::stdin().is_terminal();
        Self { term, interactive }
    }

    fn show_prompt(&self, prompt: &str) -> io::Result<()> {
        self.term
            .write_str(&style(prompt).cyan().bold().to_string())?;
        self.term.flush()
    }

    fn read_piped(&self, prompt: &str) -> io::Result<Option<String>> {
        self.show_prompt(prompt)?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        // Echo a newline so later output does not run into the prompt.
        self.term.write_line("")?;
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn read_interactive(&self, prompt: &str, secure: bool) -> io::Result<Option<String>> {
        self.show_prompt(prompt)?;
        let line = if secure {
            self.term.read_secure_line()
        } else {
            self.term.read_line()
        };
        match line {
            Ok(line) => Ok(Some(line)),
            // Ctrl-C / Ctrl-D end the session like the quit token.
            Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for TermPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TermPrompter {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if self.interactive {
            self.read_interactive(prompt, false)
        } else {
            self.read_piped(prompt)
        }
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if self.interactive {
            self.read_interactive(prompt, true)
        } else {
            self.read_piped(prompt)
        }
    }

    fn say(&mut self, tone: Tone, message: &str) {
        let styled = match tone {
            Tone::Heading => style(format!("\n{}", message)).blue(),
            Tone::Info => style(message.to_string()).blue(),
            Tone::Success => style(message.to_string()).green().bold(),
            Tone::Warning => style(message.to_string()).yellow(),
            Tone::Error => style(message.to_string()).red(),
        };
        println!("{}", styled);
    }
}

/// Printed when the user leaves with the quit token or closes stdin.
pub fn goodbye() {
    println!("\n{}", style("Exiting keySigner. Goodbye!").blue());
}
