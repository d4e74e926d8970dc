//! Lookup of external executables on `PATH`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Finds `program` in the directories of the `PATH` environment variable.
///
/// Returns `None` if `PATH` is unset or no directory contains the program.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let search_paths = std::env::var_os("PATH")?;
    find_in_search_paths(&search_paths, program)
}

/// Finds `program` in an explicit `PATH`-style list of directories.
pub fn find_in_search_paths(search_paths: &OsStr, program: &str) -> Option<PathBuf> {
    std::env::split_paths(search_paths).find_map(|dir| {
        candidates(&dir, program)
            .into_iter()
            .find(|path| is_executable(path))
    })
}

#[cfg(windows)]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    // npm installs global tools as `.cmd` shims on Windows.
    ["", ".exe", ".cmd"]
        .iter()
        .map(|ext| dir.join(format!("{program}{ext}")))
        .collect()
}

#[cfg(not(windows))]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
