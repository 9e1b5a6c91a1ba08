//! Interactive input collection and validation.
//!
//! Terminal access goes through [`Prompter`] so flows can be driven by a
//! real console or by a script in tests. Validation failures are never
//! surfaced as errors: the user is told what was wrong and asked again,
//! with no retry limit. The only way out is valid input, the quit token or
//! the end of input.

use std::io;
use std::path::Path;

use secrecy::SecretString;

use crate::error::{KeysignerError, Result};
use crate::models::{type_list, KeystoreType};

/// Visual weight of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Info,
    Success,
    Warning,
    Error,
}

/// Line-oriented access to the user.
pub trait Prompter {
    /// Reads one line of echoed input. `Ok(None)` at end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Reads one line without echoing it. `Ok(None)` at end of input.
    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Shows a message.
    fn say(&mut self, tone: Tone, message: &str);
}

/// `q` or `x`, in any case, ends the program from any prompt.
///
/// The input is compared as given; echoed answers are trimmed before they
/// get here, passwords are not.
pub fn is_quit_token(input: &str) -> bool {
    matches!(input, "q" | "Q" | "x" | "X")
}

/// Rules for one prompted value.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    prompt: &'a str,
    required: bool,
    secret: bool,
    path: bool,
    fallback: Option<&'a str>,
    min_length: usize,
}

impl<'a> Field<'a> {
    /// Required, echoed text.
    pub fn text(prompt: &'a str) -> Self {
        Self {
            prompt,
            required: true,
            secret: false,
            path: false,
            fallback: None,
            min_length: 0,
        }
    }

    /// Echoed text that may be left empty.
    pub fn optional(prompt: &'a str) -> Self {
        Self {
            required: false,
            ..Self::text(prompt)
        }
    }

    /// Hidden input of at least `min_length` characters.
    pub fn secret(prompt: &'a str, min_length: usize) -> Self {
        Self {
            secret: true,
            min_length,
            ..Self::text(prompt)
        }
    }

    /// Hidden input where an empty answer means `fallback`.
    pub fn secret_or(prompt: &'a str, fallback: &'a str, min_length: usize) -> Self {
        Self {
            fallback: Some(fallback),
            ..Self::secret(prompt, min_length)
        }
    }

    /// Existing, readable path; answered in absolute form.
    pub fn path(prompt: &'a str) -> Self {
        Self {
            path: true,
            ..Self::text(prompt)
        }
    }
}

fn too_short(min_length: usize) -> String {
    format!("Password must be at least {} characters long.", min_length)
}

/// Prompts until `field`'s rules are satisfied.
pub fn ask(prompter: &mut dyn Prompter, field: &Field<'_>) -> Result<String> {
    loop {
        if let Some(fallback) = field.fallback {
            let input = prompter
                .read_secret(field.prompt)?
                .ok_or(KeysignerError::Quit)?;
            let value = if input.is_empty() {
                fallback.to_string()
            } else {
                input
            };
            if value.chars().count() < field.min_length {
                prompter.say(Tone::Error, &too_short(field.min_length));
                continue;
            }
            return Ok(value);
        }

        let input = if field.secret {
            prompter.read_secret(field.prompt)?
        } else {
            prompter
                .read_line(field.prompt)?
                .map(|line| line.trim().to_string())
        };
        let input = input.ok_or(KeysignerError::Quit)?;

        if is_quit_token(&input) {
            return Err(KeysignerError::Quit);
        }

        if field.required && input.is_empty() {
            prompter.say(Tone::Error, "This field is required. Please enter a value.");
            continue;
        }

        if field.secret && input.chars().count() < field.min_length {
            prompter.say(Tone::Error, &too_short(field.min_length));
            continue;
        }

        if field.path && !input.is_empty() {
            let absolute = std::path::absolute(&input)?;
            if let Err(message) = check_readable(&absolute) {
                prompter.say(Tone::Error, message);
                continue;
            }
            return Ok(absolute.to_string_lossy().into_owned());
        }

        return Ok(input);
    }
}

fn check_readable(path: &Path) -> std::result::Result<(), &'static str> {
    if !path.exists() {
        return Err("Invalid path. Please enter a valid path.");
    }
    let readable = if path.is_dir() {
        std::fs::read_dir(path).is_ok()
    } else {
        std::fs::File::open(path).is_ok()
    };
    if !readable {
        return Err("Path is not accessible. Please check permissions.");
    }
    Ok(())
}

/// [`ask`] for a password, kept out of plain `String`s afterwards.
pub fn ask_secret(prompter: &mut dyn Prompter, field: &Field<'_>) -> Result<SecretString> {
    ask(prompter, field).map(SecretString::from)
}

/// Prompts for one of `allowed`, listing them after `label`.
pub fn choose_keystore_type(
    prompter: &mut dyn Prompter,
    label: &str,
    allowed: &[KeystoreType],
) -> Result<KeystoreType> {
    let prompt = format!("{} ({}): ", label, type_list(allowed));
    pick_keystore_type(prompter, &Field::text(&prompt), allowed, None)
}

/// [`choose_keystore_type`] where an empty answer takes `default`.
pub fn choose_keystore_type_or(
    prompter: &mut dyn Prompter,
    label: &str,
    allowed: &[KeystoreType],
    default: KeystoreType,
) -> Result<KeystoreType> {
    let prompt = format!("{} ({}) [default: {}]: ", label, type_list(allowed), default);
    pick_keystore_type(prompter, &Field::optional(&prompt), allowed, Some(default))
}

fn pick_keystore_type(
    prompter: &mut dyn Prompter,
    field: &Field<'_>,
    allowed: &[KeystoreType],
    default: Option<KeystoreType>,
) -> Result<KeystoreType> {
    loop {
        let answer = ask(prompter, field)?;
        if answer.is_empty() {
            if let Some(default) = default {
                return Ok(default);
            }
        }
        match answer.parse::<KeystoreType>() {
            Ok(store_type) if allowed.contains(&store_type) => return Ok(store_type),
            _ => prompter.say(Tone::Error, "Invalid keystore type. Please try again."),
        }
    }
}

/// Prompts for a migration target; the source type is never offered.
pub fn choose_destination_type(
    prompter: &mut dyn Prompter,
    source: KeystoreType,
) -> Result<KeystoreType> {
    choose_keystore_type(
        prompter,
        "Enter destination keystore type",
        &source.others(),
    )
}

/// Prompts for one of `options` (case-insensitive); answers in lowercase.
pub fn choose_option(
    prompter: &mut dyn Prompter,
    prompt: &str,
    options: &[&str],
) -> Result<String> {
    loop {
        let answer = ask(prompter, &Field::text(prompt))?.to_lowercase();
        if options.contains(&answer.as_str()) {
            return Ok(answer);
        }
        prompter.say(
            Tone::Error,
            &format!(
                "Invalid choice '{}'. Please enter one of the following: {}.",
                answer,
                options.join(", ")
            ),
        );
    }
}

/// Yes/no question; an empty answer takes `default`.
pub fn confirm(prompter: &mut dyn Prompter, prompt: &str, default: bool) -> Result<bool> {
    loop {
        let answer = ask(prompter, &Field::optional(prompt))?.to_lowercase();
        match answer.as_str() {
            "" => return Ok(default),
            "y" | "yes" | "true" | "1" => return Ok(true),
            "n" | "no" | "false" | "0" => return Ok(false),
            _ => prompter.say(Tone::Error, "Please answer y or n."),
        }
    }
}

/// Positive whole number; an empty answer takes `default`.
pub fn ask_number(prompter: &mut dyn Prompter, prompt: &str, default: u32) -> Result<u32> {
    loop {
        let answer = ask(prompter, &Field::optional(prompt))?;
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<u32>() {
            Ok(value) if value > 0 => return Ok(value),
            _ => prompter.say(Tone::Error, "Please enter a positive whole number."),
        }
    }
}
