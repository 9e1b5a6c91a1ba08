//! Per-operation session parameters.
//!
//! Each value is gathered once by its flow, never mutated afterwards and
//! dropped when the flow ends. Derived artifact paths live here so the
//! command builders stay free of naming rules.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use super::signing::{CredentialSource, DistinguishedName, KeystoreType, SigningSchemes};

/// Default certificate validity in days (about 100 years).
pub const DEFAULT_VALIDITY_DAYS: u32 = 36500;

/// Name of the transcript file for a keystore identity.
pub fn log_file_name(name: &str, kind: &str) -> String {
    format!("{}_{}_commands.txt", name, kind)
}

/// File stem of a path, or an empty string.
pub(crate) fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parameters for creating a new keystore with one key pair.
#[derive(Debug)]
pub struct GenerateParams {
    pub store_type: KeystoreType,
    pub store_name: String,
    pub store_password: SecretString,
    pub alias: String,
    /// Ignored for PKCS12; `None` means "same as the store password".
    pub key_password: Option<SecretString>,
    pub validity_days: u32,
    pub dname: DistinguishedName,
    pub output_dir: PathBuf,
}

impl GenerateParams {
    pub fn key_password(&self) -> &SecretString {
        match (&self.key_password, self.store_type.has_separate_key_password()) {
            (Some(key_password), true) => key_password,
            _ => &self.store_password,
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            self.store_name,
            self.store_type.file_extension()
        ))
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir
            .join(log_file_name(&self.store_name, self.store_type.as_str()))
    }
}

/// Parameters for converting a keystore to another container type.
#[derive(Debug)]
pub struct MigrateParams {
    pub source_path: PathBuf,
    pub source_type: KeystoreType,
    pub source_password: SecretString,
    pub source_alias: String,
    /// `None` means "same as the source store password".
    pub source_key_password: Option<SecretString>,
    pub dest_type: KeystoreType,
    pub dest_password: SecretString,
    pub dest_alias: String,
    /// `None` means "same as the destination store password".
    pub dest_key_password: Option<SecretString>,
    pub output_dir: PathBuf,
}

impl MigrateParams {
    pub fn source_key_password(&self) -> &SecretString {
        match (&self.source_key_password, self.source_type.has_separate_key_password()) {
            (Some(key_password), true) => key_password,
            _ => &self.source_password,
        }
    }

    pub fn dest_key_password(&self) -> &SecretString {
        match (&self.dest_key_password, self.dest_type.has_separate_key_password()) {
            (Some(key_password), true) => key_password,
            _ => &self.dest_password,
        }
    }

    /// The destination keystore keeps the source file's stem.
    pub fn dest_name(&self) -> String {
        stem(&self.source_path)
    }

    pub fn dest_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            self.dest_name(),
            self.dest_type.file_extension()
        ))
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir
            .join(log_file_name(&self.dest_name(), self.dest_type.as_str()))
    }
}

/// Parameters for splitting a PKCS12 container into PEM artifacts.
#[derive(Debug)]
pub struct Pkcs12ToPemParams {
    pub p12_path: PathBuf,
    pub password: SecretString,
    pub output_dir: PathBuf,
}

impl Pkcs12ToPemParams {
    fn artifact(&self, suffix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", stem(&self.p12_path), suffix))
    }

    /// Everything from the container, unencrypted.
    pub fn pem_path(&self) -> PathBuf {
        self.artifact(".pem")
    }

    pub fn certificate_path(&self) -> PathBuf {
        self.artifact(".x509.pem")
    }

    pub fn private_key_path(&self) -> PathBuf {
        self.artifact(".pk8")
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir
            .join(log_file_name(&stem(&self.p12_path), "PEM"))
    }
}

/// Parameters for packing a certificate and PKCS8 key into PKCS12.
#[derive(Debug)]
pub struct PemToPkcs12Params {
    pub certificate_path: PathBuf,
    /// PKCS8 private key in DER form (`.pk8`).
    pub private_key_path: PathBuf,
    pub store_name: String,
    pub alias: String,
    pub password: SecretString,
    pub output_dir: PathBuf,
}

impl PemToPkcs12Params {
    /// Intermediate PEM re-encoding of the private key.
    pub fn pem_key_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_key.pem", stem(&self.private_key_path)))
    }

    pub fn keystore_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            self.store_name,
            KeystoreType::Pkcs12.file_extension()
        ))
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir
            .join(log_file_name(&self.store_name, KeystoreType::Pkcs12.as_str()))
    }
}

/// Parameters for printing a keystore's entries.
#[derive(Debug)]
pub struct InfoParams {
    pub keystore_path: PathBuf,
    pub store_type: KeystoreType,
    pub store_password: SecretString,
}

/// Parameters for signing one APK.
#[derive(Debug)]
pub struct SignParams {
    pub apk_path: PathBuf,
    pub output_dir: PathBuf,
    pub schemes: SigningSchemes,
    pub credentials: CredentialSource,
}

impl SignParams {
    pub fn signed_apk_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_signed.apk", stem(&self.apk_path)))
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join("apk_signing_commands.txt")
    }
}
