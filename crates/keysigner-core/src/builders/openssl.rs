//! openssl invocations for PKCS12 and PEM conversions.

use super::{env_vars, path_arg};
use crate::command::ToolCommand;
use crate::models::{PemToPkcs12Params, Pkcs12ToPemParams};
use crate::toolchain::Toolchain;

/// Re-encodes a DER PKCS8 key (`.pk8`) as PEM, unencrypted.
pub fn pk8_to_pem(params: &PemToPkcs12Params, toolchain: &Toolchain) -> ToolCommand {
    ToolCommand::new(&toolchain.openssl)
        .args([
            "pkcs8", "-inform", "DER", "-outform", "PEM", "-nocrypt", "-in",
        ])
        .arg(path_arg(&params.private_key_path))
        .arg("-out")
        .arg(path_arg(&params.pem_key_path()))
}

/// Packs the certificate and the PEM key into a password-protected PKCS12
/// container under `alias`.
pub fn export_pkcs12(params: &PemToPkcs12Params, toolchain: &Toolchain) -> ToolCommand {
    ToolCommand::new(&toolchain.openssl)
        .args(["pkcs12", "-export", "-in"])
        .arg(path_arg(&params.certificate_path))
        .arg("-inkey")
        .arg(path_arg(&params.pem_key_path()))
        .arg("-name")
        .arg(&params.alias)
        .arg("-out")
        .arg(path_arg(&params.keystore_path()))
        .pass_phrase(
            "-password",
            env_vars::STORE_PASS,
            &params.password,
            toolchain.secret_passing,
        )
}

/// Dumps every entry of the container to one unencrypted PEM file.
pub fn pkcs12_to_pem(params: &Pkcs12ToPemParams, toolchain: &Toolchain) -> ToolCommand {
    ToolCommand::new(&toolchain.openssl)
        .args(["pkcs12", "-in"])
        .arg(path_arg(&params.p12_path))
        .arg("-out")
        .arg(path_arg(&params.pem_path()))
        .arg("-nodes")
        .pass_phrase(
            "-password",
            env_vars::STORE_PASS,
            &params.password,
            toolchain.secret_passing,
        )
}

/// Extracts the first certificate of the combined PEM.
pub fn extract_certificate(params: &Pkcs12ToPemParams, toolchain: &Toolchain) -> ToolCommand {
    ToolCommand::new(&toolchain.openssl)
        .args(["x509", "-in"])
        .arg(path_arg(&params.pem_path()))
        .arg("-out")
        .arg(path_arg(&params.certificate_path()))
        .args(["-outform", "PEM"])
}

/// Extracts the first private key of the combined PEM as DER PKCS8.
pub fn extract_private_key(params: &Pkcs12ToPemParams, toolchain: &Toolchain) -> ToolCommand {
    ToolCommand::new(&toolchain.openssl)
        .args([
            "pkcs8", "-topk8", "-inform", "PEM", "-outform", "DER", "-in",
        ])
        .arg(path_arg(&params.pem_path()))
        .arg("-out")
        .arg(path_arg(&params.private_key_path()))
        .arg("-nocrypt")
}
