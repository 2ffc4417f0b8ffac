//! Ignore patterns for module discovery
//!
//! Patterns come from `ModuleConfig::exclude` and from an optional
//! `.swiftdocignore` file at the root of each searched directory. Both use
//! the same three forms, matched against `/`-separated paths.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the per-directory ignore file
pub const IGNORE_FILE_NAME: &str = ".swiftdocignore";

/// Load ignore patterns from `.swiftdocignore` in `directory`
///
/// Empty lines and `#` comments are skipped. A missing file yields no
/// patterns.
///
/// ```text
/// # .swiftdocignore
/// Generated/
/// *.generated.swift
/// Mock
/// ```
pub fn load_ignore_file(directory: &Path) -> Result<Vec<String>> {
    let ignore_file = directory.join(IGNORE_FILE_NAME);

    if !ignore_file.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&ignore_file)
        .with_context(|| format!("Failed to read {}", ignore_file.display()))?;

    let patterns: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if !patterns.is_empty() {
        debug!(
            "📋 Loaded {} ignore patterns from {}",
            patterns.len(),
            ignore_file.display()
        );
    }

    Ok(patterns)
}

/// Check if a path matches any ignore pattern
///
/// - `name/` matches a whole path component named `name` (and everything below it)
/// - `*.ext` matches a path suffix
/// - anything else matches as a substring
///
/// Directory patterns respect component boundaries: `Generated/` matches
/// `Sources/Generated/Model.swift` but not `Sources/NotGenerated/Model.swift`.
pub fn is_ignored_by_pattern(path: &Path, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy().replace('\\', "/");

    patterns.iter().any(|pattern| {
        if let Some(dir_name) = pattern.strip_suffix('/') {
            path_str
                .split('/')
                .any(|component| !dir_name.is_empty() && component == dir_name)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            path_str.ends_with(suffix)
        } else {
            path_str.contains(pattern.as_str())
        }
    })
}

/// Whether any component of `relative` starts with a dot
///
/// Only the part of the path below the search root is inspected, so a
/// project that itself lives in a dot-directory is still indexed.
pub fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .map(|name| name.starts_with('.') && name != "." && name != "..")
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_missing_ignore_file() {
        let temp_dir = TempDir::new().unwrap();
        let patterns = load_ignore_file(temp_dir.path()).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_load_ignore_file_with_patterns() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(IGNORE_FILE_NAME),
            "# generated code\nGenerated/\n*.generated.swift\n\n  Mock  \n",
        )
        .unwrap();

        let patterns = load_ignore_file(temp_dir.path()).unwrap();
        assert_eq!(patterns, vec!["Generated/", "*.generated.swift", "Mock"]);
    }

    #[test]
    fn test_directory_pattern_respects_components() {
        let patterns = vec!["Generated/".to_string()];

        assert!(is_ignored_by_pattern(
            &PathBuf::from("Sources/Generated/Model.swift"),
            &patterns
        ));
        assert!(is_ignored_by_pattern(&PathBuf::from("Generated"), &patterns));
        assert!(
            !is_ignored_by_pattern(&PathBuf::from("Sources/NotGenerated/Model.swift"), &patterns),
            "Should NOT match a directory that merely ends with the name"
        );
        assert!(
            !is_ignored_by_pattern(&PathBuf::from("Sources/Generated-old/Model.swift"), &patterns),
            "Should NOT match a directory that merely starts with the name"
        );
    }

    #[test]
    fn test_wildcard_suffix_pattern() {
        let patterns = vec!["*.generated.swift".to_string()];
        assert!(is_ignored_by_pattern(
            &PathBuf::from("Sources/API.generated.swift"),
            &patterns
        ));
        assert!(!is_ignored_by_pattern(&PathBuf::from("Sources/API.swift"), &patterns));
    }

    #[test]
    fn test_substring_pattern() {
        let patterns = vec!["Mock".to_string()];
        assert!(is_ignored_by_pattern(
            &PathBuf::from("Tests/MockNetwork.swift"),
            &patterns
        ));
        assert!(!is_ignored_by_pattern(&PathBuf::from("Sources/Network.swift"), &patterns));
    }

    #[test]
    fn test_hidden_components() {
        assert!(is_hidden(Path::new(".build/checkouts/Dep/Sources/A.swift")));
        assert!(is_hidden(Path::new("Sources/.hidden.swift")));
        assert!(!is_hidden(Path::new("Sources/App/main.swift")));
        assert!(!is_hidden(Path::new("../Sources/main.swift")));
    }
}
