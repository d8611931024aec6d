// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "WEAKLINK_DATA_DIR";

/// Return the application data directory, creating it if needed.
///
/// On desktop this uses a conventional location. On mobile the host app
/// passes its files directory through `WEAKLINK_DATA_DIR`.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = resolve(
        std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    );
    ensure(&dir)?;
    Ok(dir)
}

fn ensure(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Pick the directory from an explicit override, XDG data home or `$HOME`.
fn resolve(explicit: Option<PathBuf>, xdg: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    let base = xdg
        .or_else(|| home.map(|h| h.join(".local").join("share")))
        // Last resort
        .unwrap_or_else(std::env::temp_dir);
    base.join("weaklink")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let dir = resolve(
            Some(PathBuf::from("/data/user/0/com.weaklink/files")),
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
        );
        assert_eq!(dir, PathBuf::from("/data/user/0/com.weaklink/files"));
    }

    #[test]
    fn xdg_then_home() {
        assert_eq!(
            resolve(None, Some(PathBuf::from("/xdg")), Some(PathBuf::from("/home/u"))),
            PathBuf::from("/xdg/weaklink")
        );
        assert_eq!(
            resolve(None, None, Some(PathBuf::from("/home/u"))),
            PathBuf::from("/home/u/.local/share/weaklink")
        );
    }

    #[test]
    fn ensure_creates_nested_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("a").join("weaklink");
        ensure(&dir).expect("create");
        assert!(dir.is_dir());
    }
}
