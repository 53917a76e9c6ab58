use std::path::{Path, PathBuf};

/// Directories searched, in order, for a bare command name.
pub const SEARCH_DIRS: &[&str] = &["/usr/local/bin", "/usr/bin", "/bin"];

/// Check if a path points to an executable regular file.
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let Ok(meta) = path.metadata() else {
        return false;
    };
    meta.is_file() && meta.permissions().mode() & 0o111 != 0
}

/// Resolve the program for a command word.
///
/// A word containing `/` names the program directly; anything else is looked
/// up in [`SEARCH_DIRS`]. Returns `None` when no executable file is found.
pub fn resolve_command(name: &str) -> Option<PathBuf> {
    if name.contains('/') {
        let path = PathBuf::from(name);
        return is_executable(&path).then_some(path);
    }
    find_in_dirs(SEARCH_DIRS.iter().copied(), name)
}

/// Search the `PATH` environment variable for an executable.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var("PATH").ok()?;
    find_in_dirs(path_var.split(':'), name)
}

/// First directory in `dirs` holding an executable named `name`.
pub fn find_in_dirs<'a>(dirs: impl IntoIterator<Item = &'a str>, name: &str) -> Option<PathBuf> {
    dirs.into_iter()
        .filter(|dir| !dir.is_empty())
        .map(|dir| Path::new(dir).join(name))
        .find(|candidate| is_executable(candidate))
}
