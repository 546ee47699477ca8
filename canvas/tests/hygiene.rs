//! Hygiene: enforces coding standards at test time
//!
//! These tests scan the canvas crate source tree for antipatterns that violate
//! project standards. Each has a budget (ideally zero). If you must add one,
//! you have to fix an existing one first. The budget never grows.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

// Panics crash the surface.
const MAX_UNWRAP: usize = 0;
const MAX_EXPECT: usize = 0;
const MAX_PANIC: usize = 0;
const MAX_UNREACHABLE: usize = 0;
const MAX_TODO: usize = 0;
const MAX_UNIMPLEMENTED: usize = 0;

// Silent loss: errors discarded without inspection.
const MAX_SILENT_DISCARD: usize = 0;
const MAX_DOT_OK: usize = 0;

// Style / structure.
const MAX_ALLOW_DEAD_CODE: usize = 0;

struct SourceFile {
    path: String,
    content: String,
}

/// Collect production `.rs` files from `canvas/src/`, excluding test files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            if name == "target" || name == "tests" {
                continue;
            }
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            // Skip test files
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

fn count_in_source(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| line.contains(pattern))
                .count();
            if count > 0 {
                Some((file.path.clone(), count))
            } else {
                None
            }
        })
        .collect()
}

fn total(hits: &[(String, usize)]) -> usize {
    hits.iter().map(|(_, c)| c).sum()
}

fn format_hits(hits: &[(String, usize)]) -> String {
    hits.iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn unwrap_budget() {
    let files = source_files();
    let hits = count_in_source(&files, ".unwrap()");
    let count = total(&hits);
    assert!(
        count <= MAX_UNWRAP,
        ".unwrap() budget exceeded: found {count}, max {MAX_UNWRAP}.\n{}",
        format_hits(&hits)
    );
}

#[test]
fn expect_budget() {
    let files = source_files();
    let hits = count_in_source(&files, ".expect(");
    let count = total(&hits);
    assert!(
        count <= MAX_EXPECT,
        ".expect() budget exceeded: found {count}, max {MAX_EXPECT}.\n{}",
        format_hits(&hits)
    );
}

#[test]
fn panic_budget() {
    let files = source_files();
    let hits = count_in_source(&files, "panic!(");
    let count = total(&hits);
    assert!(
        count <= MAX_PANIC,
        "panic!() budget exceeded: found {count}, max {MAX_PANIC}.\n{}",
        format_hits(&hits)
    );
}

#[test]
fn unreachable_budget() {
    let files = source_files();
    let hits = count_in_source(&files, "unreachable!(");
    let count = total(&hits);
    assert!(
        count <= MAX_UNREACHABLE,
        "unreachable!() budget exceeded: found {count}, max {MAX_UNREACHABLE}.\n{}",
        format_hits(&hits)
    );
}

#[test]
fn todo_budget() {
    let files = source_files();
    let hits = count_in_source(&files, "todo!(");
    let count = total(&hits);
    assert!(
        count <= MAX_TODO,
        "todo!() budget exceeded: found {count}, max {MAX_TODO}. Ratchet down as stubs are implemented.\n{}",
        format_hits(&hits)
    );
}

#[test]
fn unimplemented_budget() {
    let files = source_files();
    let hits = count_in_source(&files, "unimplemented!(");
    let count = total(&hits);
    assert!(
        count <= MAX_UNIMPLEMENTED,
        "unimplemented!() budget exceeded: found {count}, max {MAX_UNIMPLEMENTED}.\n{}",
        format_hits(&hits)
    );
}

#[test]
fn silent_discard_budget() {
    let files = source_files();
    let hits = count_in_source(&files, "let _ =");
    let count = total(&hits);
    assert!(
        count <= MAX_SILENT_DISCARD,
        "let _ = budget exceeded: found {count}, max {MAX_SILENT_DISCARD}.\n{}",
        format_hits(&hits)
    );
}

#[test]
fn dot_ok_budget() {
    let files = source_files();
    let hits = count_in_source(&files, ".ok()");
    let count = total(&hits);
    assert!(
        count <= MAX_DOT_OK,
        ".ok() budget exceeded: found {count}, max {MAX_DOT_OK}.\n{}",
        format_hits(&hits)
    );
}

#[test]
fn allow_dead_code_budget() {
    let files = source_files();
    let hits = count_in_source(&files, "#[allow(dead_code)]");
    let count = total(&hits);
    assert!(
        count <= MAX_ALLOW_DEAD_CODE,
        "#[allow(dead_code)] budget exceeded: found {count}, max {MAX_ALLOW_DEAD_CODE}.\n{}",
        format_hits(&hits)
    );
}

// =============================================================
// Module boundaries
// =============================================================

// Browser bindings stay behind the rendering and host boundary so the model
// modules remain testable natively.
const BROWSER_MODULES: &[&str] = &["engine.rs", "render.rs", "host.rs"];

// Shared mutable state belongs to the host; the engine is plain `&mut self`.
const INTERIOR_MUTABILITY_MODULES: &[&str] = &["host.rs"];

// Wire event names are spelled once, as constants in the relay module.
const WIRE_EVENT_MODULES: &[&str] = &["relay.rs"];
const WIRE_EVENT_LITERALS: &[&str] = &["\"save shape data\"", "\"get shape data\"", "\"session:connected\""];

// Geometry works in `f64` end to end; a cast there means a lossy conversion.
const MAX_GEOMETRY_CASTS: usize = 0;
const GEOMETRY_MODULES: &[&str] = &["geom.rs", "hit.rs"];

fn is_in(path: &str, modules: &[&str]) -> bool {
    modules.iter().any(|m| Path::new(path).file_name().is_some_and(|f| f == *m))
}

/// Occurrences of `pattern` outside `allowed`, ignoring comment lines.
fn hits_outside(files: &[SourceFile], pattern: &str, allowed: &[&str]) -> Vec<(String, usize)> {
    files
        .iter()
        .filter(|file| !is_in(&file.path, allowed))
        .filter_map(|file| {
            let count = code_lines(&file.content).filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn code_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().filter(|line| !line.trim_start().starts_with("//"))
}

#[test]
fn web_sys_confined_to_browser_modules() {
    let files = source_files();
    let hits = hits_outside(&files, "web_sys", BROWSER_MODULES);
    assert!(
        hits.is_empty(),
        "web_sys referenced outside {BROWSER_MODULES:?}:\n{}",
        format_hits(&hits)
    );
}

#[test]
fn wasm_bindgen_confined_to_browser_modules() {
    let files = source_files();
    let hits = hits_outside(&files, "wasm_bindgen", BROWSER_MODULES);
    assert!(
        hits.is_empty(),
        "wasm_bindgen referenced outside {BROWSER_MODULES:?}:\n{}",
        format_hits(&hits)
    );
}

#[test]
fn refcell_confined_to_host() {
    let files = source_files();
    let hits = hits_outside(&files, "RefCell", INTERIOR_MUTABILITY_MODULES);
    assert!(
        hits.is_empty(),
        "RefCell used outside {INTERIOR_MUTABILITY_MODULES:?}:\n{}",
        format_hits(&hits)
    );
}

#[test]
fn wire_event_names_spelled_once() {
    let files = source_files();
    for literal in WIRE_EVENT_LITERALS {
        let hits = hits_outside(&files, literal, WIRE_EVENT_MODULES);
        assert!(
            hits.is_empty(),
            "{literal} spelled outside {WIRE_EVENT_MODULES:?}; use the relay constant:\n{}",
            format_hits(&hits)
        );
        let defined: usize = files
            .iter()
            .filter(|file| is_in(&file.path, WIRE_EVENT_MODULES))
            .map(|file| code_lines(&file.content).filter(|line| line.contains(literal)).count())
            .sum();
        assert_eq!(defined, 1, "{literal} should be defined exactly once in the relay module");
    }
}

#[test]
fn geometry_cast_budget() {
    let files: Vec<SourceFile> = source_files()
        .into_iter()
        .filter(|file| is_in(&file.path, GEOMETRY_MODULES))
        .collect();
    assert_eq!(files.len(), GEOMETRY_MODULES.len(), "geometry modules not found");
    let hits = count_in_code(&files, " as ");
    let count = total(&hits);
    assert!(
        count <= MAX_GEOMETRY_CASTS,
        "`as` cast budget in {GEOMETRY_MODULES:?} exceeded: found {count}, max {MAX_GEOMETRY_CASTS}.\n{}",
        format_hits(&hits)
    );
}

fn count_in_code(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    hits_outside(files, pattern, &[])
}
