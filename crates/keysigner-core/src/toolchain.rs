//! Locations of the external tools and bundled support files.

use std::path::PathBuf;

use crate::command::SecretPassing;

/// Bouncy Castle provider registered for BKS keystores.
pub const BOUNCY_CASTLE_PROVIDER: &str = "org.bouncycastle.jce.provider.BouncyCastleProvider";

/// Provider jar expected in the library directory.
pub const BOUNCY_CASTLE_JAR: &str = "bcprov-jdk18on-1.78.jar";

/// AOSP test certificate expected in the library directory.
pub const TEST_CERTIFICATE: &str = "testkey.x509.pem";

/// AOSP test private key (PKCS8, DER) expected in the library directory.
pub const TEST_PRIVATE_KEY: &str = "testkey.pk8";

/// Everything the command builders need to know about the host.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub keytool: String,
    pub openssl: String,
    pub apksigner: String,
    /// Directory holding the provider jar and the test key pair.
    pub lib_dir: PathBuf,
    pub provider_class: String,
    pub secret_passing: SecretPassing,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            keytool: "keytool".to_string(),
            openssl: "openssl".to_string(),
            apksigner: "apksigner".to_string(),
            lib_dir: PathBuf::from("lib"),
            provider_class: BOUNCY_CASTLE_PROVIDER.to_string(),
            secret_passing: SecretPassing::Inline,
        }
    }
}

impl Toolchain {
    pub fn provider_path(&self) -> PathBuf {
        self.lib_dir.join(BOUNCY_CASTLE_JAR)
    }

    pub fn test_certificate(&self) -> PathBuf {
        self.lib_dir.join(TEST_CERTIFICATE)
    }

    pub fn test_private_key(&self) -> PathBuf {
        self.lib_dir.join(TEST_PRIVATE_KEY)
    }
}
