//! keytool invocations: key pair generation, migration and listing.

use super::{env_vars, path_arg};
use crate::command::ToolCommand;
use crate::error::{KeysignerError, Result};
use crate::models::{GenerateParams, InfoParams, MigrateParams};
use crate::toolchain::Toolchain;

/// Key algorithm and size for every generated key pair.
pub const KEY_ALGORITHM: &str = "RSA";
pub const KEY_SIZE: &str = "2048";

fn with_provider(cmd: ToolCommand, toolchain: &Toolchain) -> ToolCommand {
    cmd.arg("-providerclass")
        .arg(&toolchain.provider_class)
        .arg("-providerpath")
        .arg(path_arg(&toolchain.provider_path()))
}

/// `keytool -genkeypair` for a fresh keystore (or a new entry in an
/// existing one with the same name and password).
pub fn generate_keypair(params: &GenerateParams, toolchain: &Toolchain) -> ToolCommand {
    let passing = toolchain.secret_passing;

    let cmd = ToolCommand::new(&toolchain.keytool)
        .args([
            "-genkeypair",
            "-keyalg",
            KEY_ALGORITHM,
            "-keysize",
            KEY_SIZE,
            "-storetype",
            params.store_type.as_str(),
            "-keystore",
        ])
        .arg(path_arg(&params.store_path()))
        .keytool_password(
            "-storepass",
            env_vars::STORE_PASS,
            &params.store_password,
            passing,
        )
        .arg("-validity")
        .arg(params.validity_days.to_string())
        .arg("-dname")
        .arg(params.dname.to_dname())
        .arg("-alias")
        .arg(&params.alias)
        .keytool_password("-keypass", env_vars::KEY_PASS, params.key_password(), passing);

    if params.store_type.requires_provider() {
        with_provider(cmd, toolchain)
    } else {
        cmd
    }
}

/// `keytool -importkeystore` between two different container types.
pub fn import_keystore(params: &MigrateParams, toolchain: &Toolchain) -> Result<ToolCommand> {
    if params.source_type == params.dest_type {
        return Err(KeysignerError::SameKeystoreType(params.source_type));
    }

    let passing = toolchain.secret_passing;

    let cmd = ToolCommand::new(&toolchain.keytool)
        .args(["-importkeystore", "-srckeystore"])
        .arg(path_arg(&params.source_path))
        .arg("-srcstoretype")
        .arg(params.source_type.as_str())
        .keytool_password(
            "-srcstorepass",
            env_vars::SRC_STORE_PASS,
            &params.source_password,
            passing,
        )
        .arg("-srcalias")
        .arg(&params.source_alias)
        .keytool_password(
            "-srckeypass",
            env_vars::SRC_KEY_PASS,
            params.source_key_password(),
            passing,
        )
        .arg("-destkeystore")
        .arg(path_arg(&params.dest_path()))
        .arg("-deststoretype")
        .arg(params.dest_type.as_str())
        .keytool_password(
            "-deststorepass",
            env_vars::DEST_STORE_PASS,
            &params.dest_password,
            passing,
        )
        .arg("-destalias")
        .arg(&params.dest_alias)
        .keytool_password(
            "-destkeypass",
            env_vars::DEST_KEY_PASS,
            params.dest_key_password(),
            passing,
        );

    if params.source_type.requires_provider() || params.dest_type.requires_provider() {
        Ok(with_provider(cmd, toolchain))
    } else {
        Ok(cmd)
    }
}

/// `keytool -list -v` over every entry of a keystore.
pub fn list_keystore(params: &InfoParams, toolchain: &Toolchain) -> ToolCommand {
    let cmd = ToolCommand::new(&toolchain.keytool)
        .args(["-list", "-v", "-keystore"])
        .arg(path_arg(&params.keystore_path))
        .arg("-storetype")
        .arg(params.store_type.as_str())
        .keytool_password(
            "-storepass",
            env_vars::STORE_PASS,
            &params.store_password,
            toolchain.secret_passing,
        );

    if params.store_type.requires_provider() {
        with_provider(cmd, toolchain)
    } else {
        cmd
    }
}
