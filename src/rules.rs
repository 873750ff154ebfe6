//! Install predicates and path transforms.
//!
//! These gate which template entries materialize for a given
//! configuration. File predicates match on the substituted entry name,
//! directory predicates suffix-match on the logical source path, so a
//! whole subtree can be pruned before any of it is visited.

use std::path::{Path, PathBuf};

use crate::config::{lookup, truthy, Context};
use crate::error::Result;

fn flag(context: &Context, key: &str) -> Result<bool> {
    Ok(truthy(lookup(context, key)?))
}

/// Decides whether a file entry should be installed. Names not listed
/// here default to install.
pub fn should_install_file(name: &str, context: &Context) -> Result<bool> {
    match name {
        "project-is-top-level.cmake" => Ok(!flag(context, "cmake_321")?),
        "vcpkg.json" => flag(context, "vcpkg"),
        "conanfile.py" => flag(context, "conan"),
        "install-config.cmake" => Ok(!flag(context, "exe")?),
        "windows-set-path.cmake" => Ok(!flag(context, "pm")?),
        "header_impl.c" => Ok(flag(context, "c_header")? && flag(context, "pm")?),
        "env.ps1" | "env.bat" => Ok(flag(context, "lib")? && !flag(context, "pm")?),
        _ => Ok(true),
    }
}

/// Decides whether a directory entry should be installed, given its
/// logical source path (trailing '/').
pub fn should_install_dir(at: &str, context: &Context) -> Result<bool> {
    if at.ends_with("/example/") {
        if flag(context, "c")? {
            return if at.contains("/c/") {
                flag(context, "c_examples")
            } else {
                Ok(false)
            };
        }
        return flag(context, "cpp_examples");
    }
    if at.ends_with("/scripts/") {
        return flag(context, "conan");
    }
    Ok(true)
}

/// Adjusts a destination path whose role changes with the configuration:
/// a C test file becomes a C++ one when the package manager brings in
/// C++-only test tooling.
pub fn transform_path(path: &Path, context: &Context) -> Result<PathBuf> {
    if flag(context, "c")? && flag(context, "pm")? {
        if let Some(text) = path.to_str() {
            if text.ends_with("_test.c") {
                return Ok(PathBuf::from(format!("{}pp", text)));
            }
        }
    }
    Ok(path.to_path_buf())
}
