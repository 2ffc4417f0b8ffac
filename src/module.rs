// Module Aggregator
//
// Discovers the Swift files under a set of paths and builds a `SourceFile`
// for each of them in parallel. A file that fails to parse is logged and left
// out; the rest of the module is still built.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ModuleConfig;
use crate::documentation::MarkupParser;
use crate::language::is_swift_file;
use crate::source_file::SourceFile;
use crate::symbol::Symbol;
use crate::utils::ignore::{is_hidden, is_ignored_by_pattern, load_ignore_file};

/// The indexed source files of one Swift module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    name: String,
    source_files: Vec<SourceFile>,
}

/// A discovered file and the directory its path is reported against
#[derive(Debug, Clone)]
struct Candidate {
    file: PathBuf,
    base_directory: PathBuf,
}

impl Module {
    /// Build a module from files and directories
    ///
    /// Directories are searched recursively for `.swift` files; explicit file
    /// paths are taken as given. Source files are ordered by their recorded
    /// path.
    pub fn build(name: &str, paths: &[PathBuf], config: &ModuleConfig) -> Result<Self> {
        let candidates = discover(paths, config)?;
        debug!("🔍 Module {}: {} Swift files discovered", name, candidates.len());

        let mut source_files: Vec<SourceFile> = candidates
            .par_iter()
            .filter_map(|candidate| {
                match SourceFile::build_with(
                    &candidate.file,
                    &candidate.base_directory,
                    &config.parser,
                    &MarkupParser,
                ) {
                    Ok(source_file) => Some(source_file),
                    Err(e) => {
                        warn!("⚠️  Skipping {}: {}", candidate.file.display(), e);
                        None
                    }
                }
            })
            .collect();

        source_files.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(Self {
            name: name.to_string(),
            source_files,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_files(&self) -> &[SourceFile] {
        &self.source_files
    }

    /// All documented symbols, file by file in document order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.source_files
            .iter()
            .flat_map(|source_file| source_file.symbols().iter())
    }

    /// Distinct imported module paths, sorted
    pub fn imports(&self) -> Vec<&str> {
        self.source_files
            .iter()
            .flat_map(|source_file| source_file.imports().iter())
            .map(|import| import.path.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn discover(paths: &[PathBuf], config: &ModuleConfig) -> Result<Vec<Candidate>> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for path in paths {
        let found = if path.is_dir() {
            discover_directory(path, config)?
        } else if path.is_file() {
            let base_directory = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            vec![Candidate {
                file: path.clone(),
                base_directory,
            }]
        } else {
            return Err(anyhow!("Path does not exist: {}", path.display()));
        };

        for candidate in found {
            if seen.insert(candidate.file.clone()) {
                candidates.push(candidate);
            }
        }
    }

    Ok(candidates)
}

fn discover_directory(directory: &Path, config: &ModuleConfig) -> Result<Vec<Candidate>> {
    let mut patterns = config.exclude.clone();
    patterns.extend(load_ignore_file(directory)?);

    let pattern = format!(
        "{}/**/*.swift",
        glob::Pattern::escape(&directory.to_string_lossy())
    );
    let entries = glob::glob(&pattern)
        .with_context(|| format!("Invalid search pattern for {}", directory.display()))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let file = entry.with_context(|| format!("Failed to search {}", directory.display()))?;
        if !file.is_file() || !is_swift_file(&file) {
            continue;
        }

        let relative = file.strip_prefix(directory).unwrap_or(&file);
        if !config.include_hidden && is_hidden(relative) {
            continue;
        }
        if is_ignored_by_pattern(relative, &patterns) {
            debug!("Ignoring {}", file.display());
            continue;
        }

        candidates.push(Candidate {
            file,
            base_directory: directory.to_path_buf(),
        });
    }

    Ok(candidates)
}
