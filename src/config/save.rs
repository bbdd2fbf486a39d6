//! Write a configuration file, optionally keeping a timestamped backup of
//! the file it replaces.
use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigObj;
use crate::error::ConfigError;

/// Save `config` to `path`.
///
/// When `make_backup` is set and `path` already exists, the old file is
/// first copied to `<path>.<YYYYmmddHHMMSS>`. The new content is written to
/// a temporary sibling and renamed over `path`, so an interrupted save
/// leaves either the old file or the new one in place.
///
/// Returns the backup path, if one was made.
///
/// # Errors
///
/// Returns [`ConfigError::Syntax`] without touching the disk if the
/// rendered text would not parse back to `config`, and [`ConfigError::Io`]
/// naming the file that could not be copied, written, or renamed.
pub fn save(
    config: &ConfigObj,
    path: &Path,
    make_backup: bool,
) -> Result<Option<PathBuf>, ConfigError> {
    let content = config.render();
    let unreadable = |message: String| ConfigError::Syntax {
        path: path.to_path_buf(),
        message: format!("refusing to write text that does not read back: {message}"),
    };
    match ConfigObj::parse(&content) {
        Ok(reparsed) if reparsed == *config => {}
        Ok(_) => return Err(unreadable("a value would change on reload".to_string())),
        Err(err) => return Err(unreadable(err.to_string())),
    }

    let backup = if make_backup && path.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();
        let backup = backup_path(path, &stamp);
        fs::copy(path, &backup).map_err(|source| ConfigError::Io {
            path: backup.clone(),
            source,
        })?;
        Some(backup)
    } else {
        None
    };

    write_atomic(path, &content)?;
    Ok(backup)
}

/// Choose `<path>.<stamp>`, adding `-1`, `-2`, ... if that name is taken.
fn backup_path(path: &Path, stamp: &str) -> PathBuf {
    let base = path.as_os_str().to_string_lossy();
    let first = PathBuf::from(format!("{base}.{stamp}"));
    if !first.exists() {
        return first;
    }
    (1..=u32::MAX)
        .map(|n| PathBuf::from(format!("{base}.{stamp}-{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn write_atomic(path: &Path, content: &str) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file_name = path
        .file_name()
        .map_or_else(|| "weewx.conf".into(), |n| n.to_string_lossy());
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    fs::write(&tmp, content).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(|source| {
        fs::remove_file(&tmp).ok();
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
