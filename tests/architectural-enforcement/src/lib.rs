//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code outside frame limiting
//! - No blocking I/O on the async paths
//! - The core crate stays free of UI dependencies
//!
//! The helpers here walk the workspace sources; the checks live in `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, resolved from this package's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// Every `.rs` file under `dir` (relative to the workspace root) with its contents
#[must_use]
pub fn rust_sources(dir: &str) -> Vec<(PathBuf, String)> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|e| {
            let content = fs::read_to_string(e.path()).ok()?;
            Some((e.into_path(), content))
        })
        .collect()
}

/// The part of a line before any `//` comment
#[must_use]
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Index of the `#[cfg(test)]` line, if the file has a test module
#[must_use]
pub fn test_module_start(lines: &[&str]) -> Option<usize> {
    lines.iter().position(|l| l.trim() == "#[cfg(test)]")
}

/// Is `idx` inside the trailing test module?
#[must_use]
pub fn is_test_code(lines: &[&str], idx: usize) -> bool {
    test_module_start(lines).is_some_and(|start| idx > start)
}

/// Is `idx` inside an `async fn`? Scans back to the nearest fn signature.
#[must_use]
pub fn is_in_async_function(lines: &[&str], idx: usize) -> bool {
    for i in (0..=idx).rev() {
        let line = lines[i].trim_start();
        let line = line.strip_prefix("pub ").unwrap_or(line);
        if line.starts_with("async fn ") {
            return true;
        }
        if line.starts_with("fn ") {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_part_strips_comments() {
        assert_eq!(code_part("let x = 1; // sleep(1)"), "let x = 1; ");
        assert_eq!(code_part("/// docs"), "");
    }

    #[test]
    fn test_test_code_detection() {
        let lines = vec!["fn a() {}", "#[cfg(test)]", "mod tests {", "    fn b() {}", "}"];
        assert!(!is_test_code(&lines, 0));
        assert!(is_test_code(&lines, 3));
    }

    #[test]
    fn test_async_function_detection() {
        let lines = vec![
            "pub async fn run() {",
            "    read();",
            "}",
            "fn load() {",
            "    read();",
            "}",
        ];
        assert!(is_in_async_function(&lines, 1));
        assert!(!is_in_async_function(&lines, 4));
    }

    #[test]
    fn test_workspace_root_holds_members() {
        assert!(workspace_root().join("dex").join("core").exists());
    }
}
