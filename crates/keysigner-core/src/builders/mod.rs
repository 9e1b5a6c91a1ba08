//! Command builders.
//!
//! Each builder is a pure function of session parameters and the
//! [`Toolchain`](crate::toolchain::Toolchain). Builders never spawn
//! processes and do no I/O beyond joining paths.

pub mod apksigner;
pub mod keytool;
pub mod openssl;

/// Environment variable names used when secrets are passed by environment.
pub mod env_vars {
    pub const STORE_PASS: &str = "KEYSIGNER_STOREPASS";
    pub const KEY_PASS: &str = "KEYSIGNER_KEYPASS";
    pub const SRC_STORE_PASS: &str = "KEYSIGNER_SRCSTOREPASS";
    pub const SRC_KEY_PASS: &str = "KEYSIGNER_SRCKEYPASS";
    pub const DEST_STORE_PASS: &str = "KEYSIGNER_DESTSTOREPASS";
    pub const DEST_KEY_PASS: &str = "KEYSIGNER_DESTKEYPASS";
}

use std::path::Path;

/// Paths are handed to the tools as UTF-8 text.
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
