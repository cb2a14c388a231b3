//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. The animation is
//! driven by elapsed time passed to the controller, never by sleeping.
//! **Exceptions**: Frame rate limiting in `tui/src/app.rs`, test code

use std::path::Path;

use architectural_enforcement::{code_part, is_test_code, rust_sources};

struct SleepPolicy {
    allow_frame_limiting: bool,
}

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();

    check_directory(
        "dex/core/src",
        &mut violations,
        &SleepPolicy {
            allow_frame_limiting: false,
        },
    );
    check_directory(
        "tui/src",
        &mut violations,
        &SleepPolicy {
            allow_frame_limiting: true,
        },
    );

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nAcceptable: frame rate limiting in the TUI loop, test code.");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

fn check_directory(dir: &str, violations: &mut Vec<String>, policy: &SleepPolicy) {
    for (path, content) in rust_sources(dir) {
        check_file(&path, &content, violations, policy);
    }
}

fn check_file(path: &Path, content: &str, violations: &mut Vec<String>, policy: &SleepPolicy) {
    let lines: Vec<&str> = content.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        let code = code_part(line);
        if !(code.contains("::sleep(") || code.contains(".sleep(")) {
            continue;
        }

        if is_test_code(&lines, idx) {
            continue;
        }

        if policy.allow_frame_limiting
            && path.ends_with("tui/src/app.rs")
            && is_frame_limiting_context(&lines, idx)
        {
            continue;
        }

        violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
    }
}

/// Check if sleep is used for frame rate limiting
fn is_frame_limiting_context(lines: &[&str], current_idx: usize) -> bool {
    let context_range = current_idx.saturating_sub(10)..std::cmp::min(current_idx + 5, lines.len());

    lines[context_range].iter().any(|line| {
        let line = line.to_lowercase();
        line.contains("frame") || line.contains("fps")
    })
}

#[test]
fn test_frame_limiting_detection() {
    let code = vec![
        "fn render_loop() {",
        "    let frame_duration = Duration::from_millis(100); // 10 FPS",
        "    loop {",
        "        render();",
        "        tokio::time::sleep(frame_duration).await;",
        "    }",
        "}",
    ];
    assert!(is_frame_limiting_context(&code, 4));

    let code = vec!["fn poll() {", "    std::thread::sleep(wait);", "}"];
    assert!(!is_frame_limiting_context(&code, 1));
}

#[test]
fn test_select_poll_arm_counts_as_frame_limiting() {
    let code = vec![
        "        tokio::select! {",
        "            biased;",
        "",
        "            maybe_event = event_stream.next() => {",
        "                handle(maybe_event);",
        "            }",
        "",
        "            _ = tokio::time::sleep(FRAME_POLL) => {}",
        "        }",
    ];
    assert!(is_frame_limiting_context(&code, 7));
}
