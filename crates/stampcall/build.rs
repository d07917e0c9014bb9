use std::{env, path::PathBuf};

/// Directory that contains the native library. Relative paths are taken from the workspace root.
const NATIVE_DIR_VAR: &str = "STAMPCALL_NATIVE_DIR";
/// Name of the native library, without platform prefix or extension.
const NATIVE_LIB_VAR: &str = "STAMPCALL_NATIVE_LIB";

const DEFAULT_NATIVE_DIR: &str = "native";
const DEFAULT_NATIVE_LIB: &str = "foo";

fn main() {
    println!("cargo:rerun-if-env-changed={NATIVE_DIR_VAR}");
    println!("cargo:rerun-if-env-changed={NATIVE_LIB_VAR}");

    let manifest_dir =
        PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is not set"));
    let workspace_dir = manifest_dir.join("..").join("..");

    let native_dir = env::var_os(NATIVE_DIR_VAR)
        .map_or_else(|| PathBuf::from(DEFAULT_NATIVE_DIR), PathBuf::from);
    let native_dir = if native_dir.is_relative() {
        workspace_dir.join(native_dir)
    } else {
        native_dir
    };
    let native_lib = env::var(NATIVE_LIB_VAR).unwrap_or_else(|_| DEFAULT_NATIVE_LIB.to_owned());

    println!("cargo:rustc-env={NATIVE_DIR_VAR}={}", native_dir.display());
    println!("cargo:rustc-env={NATIVE_LIB_VAR}={native_lib}");

    if env::var_os("CARGO_FEATURE_STATIC_LINK").is_some() {
        println!("cargo:rustc-link-search=native={}", native_dir.display());
        println!("cargo:rustc-link-lib={native_lib}");
    }
}
