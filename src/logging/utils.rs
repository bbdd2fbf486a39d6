//! Log file location and timestamps.
use std::fs;
use std::path::PathBuf;

/// Directory holding the log files: `$XDG_CACHE_HOME/weecfg`, falling back
/// to `~/.cache/weecfg`, then `./.cache/weecfg`.
///
/// `var` looks up an environment variable; empty values count as unset.
pub(super) fn log_dir(var: impl Fn(&str) -> Option<String>) -> PathBuf {
    let var = |name: &str| var(name).filter(|v| !v.is_empty());
    var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            var("HOME")
                .or_else(|| var("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".cache"))
        })
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("weecfg")
}

/// Log file for `command` under the process environment's [`log_dir`],
/// creating the directory. `None` if it cannot be created.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = log_dir(|name| std::env::var(name).ok());
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current local time in `format`.
pub(super) fn local_now(format: &str) -> String {
    chrono::Local::now().format(format).to_string()
}
