// SwiftDoc Path Conversion Utilities
//
// Source files are reported relative to the directory a build was started
// from, always with `/` separators so serialized output is identical across
// platforms.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::warn;

/// Convert `file` to a path relative to `base_directory`, using `/` separators
///
/// Both paths are canonicalized when possible so that symlinked temp
/// directories (`/var` → `/private/var` on macOS) still compare equal.
///
/// # Examples
/// ```text
/// to_relative_unix_style("/work/App/Sources/Model.swift", "/work/App")
/// // => "Sources/Model.swift"
/// ```
///
/// Fails when `file` does not live under `base_directory`.
pub fn to_relative_unix_style(file: &Path, base_directory: &Path) -> Result<String> {
    let (file, base) = match (file.canonicalize(), base_directory.canonicalize()) {
        (Ok(file), Ok(base)) => (file, base),
        _ => (file.to_path_buf(), base_directory.to_path_buf()),
    };

    let file = strip_unc_prefix(&file);
    let base = strip_unc_prefix(&base);

    let relative = file.strip_prefix(&base).with_context(|| {
        format!(
            "File path '{}' is not within base directory '{}'",
            file.display(),
            base.display()
        )
    })?;

    let path_str = relative.to_str().context("Path contains invalid UTF-8")?;

    Ok(to_unix_separators(path_str))
}

/// Path recorded for a source file
///
/// Relative to `base_directory` when possible; otherwise the file's own path
/// is kept (with a warning) so the symbol index still points somewhere real.
pub fn display_path(file: &Path, base_directory: &Path) -> String {
    match to_relative_unix_style(file, base_directory) {
        Ok(relative) => relative,
        Err(e) => {
            warn!("⚠️  Keeping full path for {}: {}", file.display(), e);
            to_unix_separators(&file.to_string_lossy())
        }
    }
}

fn to_unix_separators(path: &str) -> String {
    if MAIN_SEPARATOR == '\\' {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

// Canonicalized Windows paths carry a \\?\ prefix that plain paths don't
#[cfg(windows)]
fn strip_unc_prefix(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    match path_str.strip_prefix(r"\\?\") {
        Some(stripped) => PathBuf::from(stripped),
        None => path.to_path_buf(),
    }
}

#[cfg(not(windows))]
fn strip_unc_prefix(path: &Path) -> PathBuf {
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_nested_source_is_relative() {
        let base = PathBuf::from("/work/App");
        let file = PathBuf::from("/work/App/Sources/Model/User.swift");

        let result = to_relative_unix_style(&file, &base).unwrap();

        assert_eq!(result, "Sources/Model/User.swift");
        assert!(!result.contains('\\'), "Should have no backslashes");
    }

    #[test]
    fn test_root_level_file() {
        let base = PathBuf::from("/work/App");
        let file = PathBuf::from("/work/App/Package.swift");

        assert_eq!(to_relative_unix_style(&file, &base).unwrap(), "Package.swift");
    }

    #[test]
    fn test_unicode_and_spaces() {
        let base = PathBuf::from("/work/my projects/アプリ");
        let file = PathBuf::from("/work/my projects/アプリ/Sources/日本語.swift");

        assert_eq!(
            to_relative_unix_style(&file, &base).unwrap(),
            "Sources/日本語.swift"
        );
    }

    #[test]
    fn test_file_outside_base_rejected() {
        let base = PathBuf::from("/work/App");
        let file = PathBuf::from("/elsewhere/Other.swift");

        let result = to_relative_unix_style(&file, &base);

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not within base directory"));
    }

    #[test]
    fn test_display_path_falls_back_to_full_path() {
        let base = PathBuf::from("/work/App");
        let file = PathBuf::from("/elsewhere/Other.swift");

        assert_eq!(display_path(&file, &base), "/elsewhere/Other.swift");
    }

    #[test]
    fn test_existing_paths_are_canonicalized() {
        let temp_dir = TempDir::new().unwrap();
        let sources = temp_dir.path().join("Sources");
        std::fs::create_dir_all(&sources).unwrap();
        let file = sources.join("main.swift");
        std::fs::write(&file, "").unwrap();

        // A `..` detour resolves to the same place once canonicalized
        let detour = temp_dir.path().join("Sources/../Sources/main.swift");

        assert_eq!(
            to_relative_unix_style(&detour, temp_dir.path()).unwrap(),
            "Sources/main.swift"
        );
    }
}
