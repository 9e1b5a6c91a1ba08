//! Argument lists for external tool invocations.
//!
//! A [`ToolCommand`] is built once by a builder and then consumed by both the
//! runner (which passes it to the OS verbatim) and the audit log (which
//! renders it as a shell-quoted line).

use std::borrow::Cow;

use secrecy::{ExposeSecret, SecretString};

/// How passwords reach the external tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecretPassing {
    /// On the command line. Visible in process listings, but the transcript
    /// can be replayed as is.
    #[default]
    Inline,
    /// Through environment variables set on the child process only.
    Environment,
}

#[derive(Debug)]
enum Arg {
    Plain(String),
    Secret(SecretString),
}

impl Arg {
    fn expose(&self) -> &str {
        match self {
            Arg::Plain(value) => value,
            Arg::Secret(value) => value.expose_secret(),
        }
    }
}

/// One invocation of an external program.
#[derive(Debug)]
pub struct ToolCommand {
    program: String,
    args: Vec<Arg>,
    env: Vec<(String, SecretString)>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Plain(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args
            .extend(args.into_iter().map(|a| Arg::Plain(a.into())));
        self
    }

    fn secret_arg(mut self, value: String) -> Self {
        self.args.push(Arg::Secret(SecretString::from(value)));
        self
    }

    fn env_secret(mut self, var: &str, secret: &SecretString) -> Self {
        self.env.push((var.to_string(), duplicate_secret(secret)));
        self
    }

    /// keytool style: `-storepass VALUE` or `-storepass:env VAR`.
    pub fn keytool_password(
        self,
        flag: &str,
        var: &str,
        secret: &SecretString,
        passing: SecretPassing,
    ) -> Self {
        match passing {
            SecretPassing::Inline => self
                .arg(flag)
                .secret_arg(secret.expose_secret().to_owned()),
            SecretPassing::Environment => self
                .arg(format!("{}:env", flag))
                .arg(var)
                .env_secret(var, secret),
        }
    }

    /// openssl/apksigner style: `FLAG pass:VALUE` or `FLAG env:VAR`.
    pub fn pass_phrase(
        self,
        flag: &str,
        var: &str,
        secret: &SecretString,
        passing: SecretPassing,
    ) -> Self {
        match passing {
            SecretPassing::Inline => self
                .arg(flag)
                .secret_arg(format!("pass:{}", secret.expose_secret())),
            SecretPassing::Environment => self
                .arg(flag)
                .arg(format!("env:{}", var))
                .env_secret(var, secret),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments as handed to the OS, secrets included.
    pub fn argv(&self) -> Vec<&str> {
        self.args.iter().map(Arg::expose).collect()
    }

    /// Environment variables to set on the child process.
    pub fn envs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.env
            .iter()
            .map(|(key, value)| (key.as_str(), value.expose_secret()))
    }

    /// Shell-quoted command line, secrets included. This is what the
    /// transcript stores.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(Arg::expose))
            .map(quote_arg)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Command line with secrets masked, for diagnostics.
    pub fn redacted(&self) -> String {
        std::iter::once(quote_arg(&self.program))
            .chain(self.args.iter().map(|arg| match arg {
                Arg::Plain(value) => quote_arg(value),
                Arg::Secret(_) => Cow::Borrowed("[REDACTED]"),
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Copies a secret into a new zeroize-on-drop allocation.
pub fn duplicate_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_owned())
}

/// Wraps an argument in double quotes when it contains a space.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
    if arg.contains(' ') {
        Cow::Owned(format!("\"{}\"", arg))
    } else {
        Cow::Borrowed(arg)
    }
}
