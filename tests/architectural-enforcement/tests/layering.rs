//! Integration Test: Layering
//!
//! **Policy**: `dex-core` is headless. It must not depend on ratatui or
//! crossterm, and its async paths must not block the runtime.

use std::fs;

use architectural_enforcement::{code_part, is_in_async_function, is_test_code, rust_sources, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("dex/core/Cargo.toml"))
        .expect("dex/core/Cargo.toml should be readable");

    for krate in UI_CRATES {
        assert!(
            !manifest.lines().any(|l| l.trim_start().starts_with(krate)),
            "dex-core must not depend on {krate}"
        );
    }
}

#[test]
fn test_core_sources_do_not_use_ui_crates() {
    let mut violations = Vec::new();

    for (path, content) in rust_sources("dex/core/src") {
        for (idx, line) in content.lines().enumerate() {
            let code = code_part(line);
            if UI_CRATES.iter().any(|k| code.contains(&format!("{k}::"))) {
                violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
            }
        }
    }

    assert!(violations.is_empty(), "UI crates used in dex-core:\n{}", violations.join("\n"));
}

#[test]
fn test_no_blocking_io_in_async_code() {
    const FORBIDDEN: &[&str] = &[
        "reqwest::blocking",
        "std::process::Command",
        "std::fs::",
        "std::thread::sleep",
    ];

    let mut violations = Vec::new();

    for dir in ["dex/core/src", "tui/src"] {
        for (path, content) in rust_sources(dir) {
            let lines: Vec<&str> = content.lines().collect();
            for (idx, line) in lines.iter().enumerate() {
                let code = code_part(line);
                if !FORBIDDEN.iter().any(|f| code.contains(f)) {
                    continue;
                }
                // reqwest::blocking is never acceptable; the rest only on async paths
                let always = code.contains("reqwest::blocking");
                if is_test_code(&lines, idx) {
                    continue;
                }
                if always || is_in_async_function(&lines, idx) {
                    violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Blocking I/O found on async paths:\n{}",
        violations.join("\n")
    );
}
