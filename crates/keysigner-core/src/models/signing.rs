//! Keystore and APK signing models.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::KeysignerError;

// ============================================================================
// Keystore Type
// ============================================================================

/// Android keystore container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeystoreType {
    /// Java-native keystore.
    Jks,
    /// Bouncy Castle keystore, needs the provider jar on every keytool call.
    Bks,
    /// PKCS #12 container.
    Pkcs12,
}

impl KeystoreType {
    pub const ALL: [KeystoreType; 3] = [KeystoreType::Jks, KeystoreType::Bks, KeystoreType::Pkcs12];

    /// Name as understood by keytool's `-storetype`.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "JKS",
            KeystoreType::Bks => "BKS",
            KeystoreType::Pkcs12 => "PKCS12",
        }
    }

    /// File extension used for keystores of this type.
    pub fn file_extension(&self) -> &'static str {
        match self {
            KeystoreType::Jks => "jks",
            KeystoreType::Bks => "bks",
            KeystoreType::Pkcs12 => "p12",
        }
    }

    /// BKS is not built into the JDK and needs `-providerclass`/`-providerpath`.
    pub fn requires_provider(&self) -> bool {
        matches!(self, KeystoreType::Bks)
    }

    /// PKCS12 keystores have a single password for the store and its keys.
    pub fn has_separate_key_password(&self) -> bool {
        !matches!(self, KeystoreType::Pkcs12)
    }

    /// Every type except `self`, in canonical order.
    pub fn others(&self) -> Vec<KeystoreType> {
        KeystoreType::ALL
            .into_iter()
            .filter(|t| t != self)
            .collect()
    }
}

impl std::str::FromStr for KeystoreType {
    type Err = KeysignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "JKS" => Ok(KeystoreType::Jks),
            "BKS" => Ok(KeystoreType::Bks),
            "PKCS12" => Ok(KeystoreType::Pkcs12),
            _ => Err(KeysignerError::UnknownKeystoreType(s.trim().to_string())),
        }
    }
}

impl std::fmt::Display for KeystoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Joins keystore type names for a prompt, e.g. `JKS/BKS/PKCS12`.
pub fn type_list(types: &[KeystoreType]) -> String {
    types
        .iter()
        .map(KeystoreType::as_str)
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// Distinguished Name
// ============================================================================

/// Certificate subject components. Empty strings are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
    pub organizational_unit: String,
    pub organization: String,
    pub locality: String,
    pub state: String,
    pub country: String,
}

impl DistinguishedName {
    /// Placeholder used by keytool when nothing else was provided.
    pub const UNKNOWN: &'static str = "CN=Unknown";

    /// Renders the `-dname` value in CN, OU, O, L, ST, C order.
    pub fn to_dname(&self) -> String {
        let parts: Vec<String> = [
            ("CN", &self.common_name),
            ("OU", &self.organizational_unit),
            ("O", &self.organization),
            ("L", &self.locality),
            ("ST", &self.state),
            ("C", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();

        if parts.is_empty() {
            Self::UNKNOWN.to_string()
        } else {
            parts.join(", ")
        }
    }
}

// ============================================================================
// APK Signing
// ============================================================================

/// APK signature scheme versions to enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningSchemes {
    pub v1: bool,
    pub v2: bool,
    pub v3: bool,
    pub v4: bool,
}

impl Default for SigningSchemes {
    fn default() -> Self {
        Self {
            v1: true,
            v2: true,
            v3: true,
            v4: false,
        }
    }
}

impl SigningSchemes {
    /// `(version, enabled)` pairs in version order.
    pub fn versions(&self) -> [(u8, bool); 4] {
        [(1, self.v1), (2, self.v2), (3, self.v3), (4, self.v4)]
    }
}

/// Where apksigner gets the signing key from.
#[derive(Debug)]
pub enum CredentialSource {
    /// Keystore whose key shares the store password (PKCS12).
    Keystore {
        path: PathBuf,
        store_password: SecretString,
        alias: String,
    },
    /// Keystore with a distinct per-key password (JKS).
    KeystoreWithKeyPassword {
        path: PathBuf,
        store_password: SecretString,
        alias: String,
        key_password: SecretString,
    },
    /// Detached x509 certificate and PKCS8 (DER) private key.
    CertificateAndKey { certificate: PathBuf, key: PathBuf },
    /// The bundled AOSP test key. Never for production builds.
    TestKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystore_type_from_str() {
        assert_eq!("jks".parse::<KeystoreType>().unwrap(), KeystoreType::Jks);
        assert_eq!(" Bks ".parse::<KeystoreType>().unwrap(), KeystoreType::Bks);
        assert_eq!("PKCS12".parse::<KeystoreType>().unwrap(), KeystoreType::Pkcs12);
        assert!(matches!(
            "p12".parse::<KeystoreType>(),
            Err(KeysignerError::UnknownKeystoreType(name)) if name == "p12"
        ));
    }

    #[test]
    fn test_others_excludes_self() {
        for source in KeystoreType::ALL {
            let others = source.others();
            assert_eq!(others.len(), 2);
            assert!(!others.contains(&source));
        }
        assert_eq!(type_list(&KeystoreType::Jks.others()), "BKS/PKCS12");
    }

    #[test]
    fn test_dname_all_empty_is_unknown() {
        assert_eq!(DistinguishedName::default().to_dname(), "CN=Unknown");
    }

    #[test]
    fn test_dname_fixed_order() {
        let dn = DistinguishedName {
            common_name: "Jane Doe".to_string(),
            organizational_unit: "Mobile".to_string(),
            organization: "Acme".to_string(),
            locality: "Lahore".to_string(),
            state: "Punjab".to_string(),
            country: "PK".to_string(),
        };
        assert_eq!(
            dn.to_dname(),
            "CN=Jane Doe, OU=Mobile, O=Acme, L=Lahore, ST=Punjab, C=PK"
        );
    }

    #[test]
    fn test_dname_skips_empty_components() {
        let dn = DistinguishedName {
            organization: "Acme".to_string(),
            country: "US".to_string(),
            ..Default::default()
        };
        assert_eq!(dn.to_dname(), "O=Acme, C=US");

        let dn = DistinguishedName {
            state: "Ontario".to_string(),
            ..Default::default()
        };
        assert_eq!(dn.to_dname(), "ST=Ontario");
    }

    #[test]
    fn test_default_signing_schemes() {
        let schemes = SigningSchemes::default();
        assert_eq!(
            schemes.versions(),
            [(1, true), (2, true), (3, true), (4, false)]
        );
    }
}
