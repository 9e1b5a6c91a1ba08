//! Keystore type detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::models::KeystoreType;

/// Outcome of [`detect_keystore_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// The extension names the type, or the file carries the JKS magic.
    Certain(KeystoreType),
    /// The first bytes fit this type but also fit other files.
    Likely(KeystoreType),
    Unknown,
}

/// Guesses a keystore's type from its extension, then from its first bytes.
///
/// Only `.jks`, `.bks`, `.p12` and `.pfx` are trusted by name. `.keystore`
/// is written as JKS or PKCS12 depending on the JDK, so it goes through the
/// content check like any other file.
pub fn detect_keystore_type(path: &Path) -> Detection {
    if let Some(store_type) = type_from_extension(path) {
        return Detection::Certain(store_type);
    }

    let mut header = [0u8; 4];
    match File::open(path).and_then(|mut file| file.read(&mut header)) {
        Ok(read) => type_from_magic(&header[..read]),
        Err(_) => Detection::Unknown,
    }
}

fn type_from_extension(path: &Path) -> Option<KeystoreType> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "jks" => Some(KeystoreType::Jks),
        "bks" => Some(KeystoreType::Bks),
        "p12" | "pfx" => Some(KeystoreType::Pkcs12),
        _ => None,
    }
}

/// Detects the keystore type from its magic bytes.
fn type_from_magic(data: &[u8]) -> Detection {
    match data {
        // JKS files start with 0xFEEDFEED
        [0xFE, 0xED, 0xFE, 0xED, ..] => Detection::Certain(KeystoreType::Jks),
        // BKS files start with a big-endian format version (1 or 2)
        [0x00, 0x00, 0x00, 0x01 | 0x02, ..] => Detection::Likely(KeystoreType::Bks),
        // Any DER SEQUENCE with a long-form length, certificates and pk8 keys included
        [0x30, 0x80..=0x84, ..] => Detection::Likely(KeystoreType::Pkcs12),
        _ => Detection::Unknown,
    }
}
