//! Test and source discovery.
//!
//! Tests follow a file-system protocol: a bench named `<name>-test.v`
//! paired with `<name>-assertion.txt` in the same directory. `<name>` is
//! non-empty and hyphen-free, and the suffix must be the exact remainder of
//! the filename. Anything else is silently ignored.
//!
//! Enumeration order is whatever the OS yields; discovery does not sort,
//! so test order is stable within a run but not across platforms.

use crate::assertion::parse_assertions;
use crate::error::{JudgeError, Result};
use crate::result::{SourceSet, Test};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extract the test name from a file name, if it qualifies.
fn test_name_from_file(file_name: &str) -> Option<&str> {
    let name = file_name.strip_suffix("-test.v")?;
    if name.is_empty() || name.contains('-') {
        return None;
    }
    Some(name)
}

/// Scan the test directory and build the test set (names + assertions).
///
/// Duplicate names keep the first occurrence. A qualifying bench without a
/// companion assertion file is fatal, as is a malformed assertion line.
pub fn discover_tests(test_dir: &Path) -> Result<Vec<Test>> {
    let entries =
        std::fs::read_dir(test_dir).map_err(|e| JudgeError::OpeningTestsDirectory {
            path: test_dir.display().to_string(),
            reason: e.to_string(),
        })?;

    let mut tests: Vec<Test> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for entry in entries {
        let entry = entry.map_err(|e| JudgeError::OpeningTestsDirectory {
            path: test_dir.display().to_string(),
            reason: e.to_string(),
        })?;
        // Follows symlinks; a link to a regular file counts. Entries whose
        // target cannot be examined (dangling links) are skipped like any
        // other non-file.
        match std::fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => {}
            _ => continue,
        }

        let file_name = entry.file_name();
        // Non-UTF-8 names cannot match the <name>-test.v pattern.
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let Some(name) = test_name_from_file(file_name) else {
            continue;
        };
        if !seen.insert(name.to_string()) {
            continue;
        }

        let assertion_path = test_dir.join(format!("{name}-assertion.txt"));
        let assertion_results = parse_assertions(&assertion_path)?;
        debug!(test = %name, assertions = assertion_results.len(), "discovered test");
        tests.push(Test::new(name.to_string(), assertion_results));
    }

    Ok(tests)
}

/// Collect candidate source files, deduplicated by file name (first wins).
pub fn collect_sources(sources: &SourceSet) -> Result<Vec<PathBuf>> {
    match sources {
        SourceSet::Files(paths) => collect_explicit(paths),
        SourceSet::Directory(dir) => scan_directory(dir),
    }
}

fn collect_explicit(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut collected = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for path in paths {
        let metadata = std::fs::metadata(path).map_err(|e| JudgeError::OpeningSourceFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if !metadata.is_file() {
            return Err(JudgeError::OpeningSourceFile {
                path: path.display().to_string(),
                reason: "not a regular file".to_string(),
            });
        }
        if seen.insert(dedup_key(path)) {
            collected.push(path.clone());
        }
    }

    Ok(collected)
}

fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| JudgeError::OpeningSrcsDirectory {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut collected = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for entry in entries {
        let entry = entry.map_err(|e| JudgeError::OpeningSrcsDirectory {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => {}
            _ => continue,
        }
        if seen.insert(dedup_key(&path)) {
            collected.push(path);
        }
    }

    Ok(collected)
}

/// Sources are deduplicated by their resolved file name.
fn dedup_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
