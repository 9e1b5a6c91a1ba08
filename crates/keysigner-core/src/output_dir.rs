//! Output directory resolution.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{KeysignerError, Result};

/// Default directory for keystores and converted key material.
pub const DEFAULT_KEYSTORE_DIR: &str = "keystore";

/// Default directory for signed APKs.
pub const DEFAULT_SIGNED_DIR: &str = "signed_apks";

/// Resolves where a flow writes its artifacts.
///
/// An empty `user_path` means `<base>/<default_name>`. Otherwise the path is
/// taken as absolute or relative to `base`. The directory is created
/// (recursively) if missing and returned in absolute form; an existing
/// absolute path comes back unchanged.
pub fn resolve_output_dir(base: &Path, user_path: &str, default_name: &str) -> Result<PathBuf> {
    let user_path = user_path.trim();
    let target = if user_path.is_empty() {
        base.join(default_name)
    } else {
        let path = Path::new(user_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    };

    if target.is_dir() {
        return Ok(target);
    }

    std::fs::create_dir_all(&target).map_err(|source| directory_error(&target, source))?;
    tracing::debug!("Created output directory {}", target.display());

    Ok(target)
}

fn directory_error(path: &Path, source: io::Error) -> KeysignerError {
    let path = path.to_path_buf();
    match source.kind() {
        io::ErrorKind::NotFound => {
            tracing::error!("Directory or file not found: {}: {}", path.display(), source);
            KeysignerError::DirectoryNotFound { path, source }
        }
        io::ErrorKind::PermissionDenied => {
            tracing::error!("Permission denied creating {}: {}", path.display(), source);
            KeysignerError::PermissionDenied { path, source }
        }
        _ => {
            tracing::error!("Could not create or access {}: {}", path.display(), source);
            KeysignerError::DirectoryAccess { path, source }
        }
    }
}
