//! Test harness for the skeleton generator against fixture files.
//!
//! Every .feature file in test/feature/ is generated and compared against
//! test/h/<name>.h. A missing .h file means the document must produce no
//! output at all. Generated skeletons are also read back and must yield the
//! tree they were rendered from, and fed back through the keyword pipeline
//! they must yield the same shape. Files in test/bad/ are malformed skeletons
//! that must fail with the message in the matching .error file.

use std::fs;
use std::path::{Path, PathBuf};

use libbddgen::{
    generate, parse, read_skeleton, read_skeleton_with_filename, render, Document, Level, StepNode,
};

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// Get all files with a given extension from a subdirectory of test/.
fn get_files_in_subdir(subdir: &str, ext: &str) -> Vec<PathBuf> {
    let pattern = test_root().join(subdir).join(format!("*.{}", ext));
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .flatten()
        .collect();
    files.sort();
    files
}

fn get_feature_files() -> Vec<PathBuf> {
    get_files_in_subdir("feature", "feature")
}

fn get_bad_files() -> Vec<PathBuf> {
    get_files_in_subdir("bad", "h")
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().to_string()
}

/// Read the expected skeleton for a .feature file, if there is one.
fn read_expected_skeleton(feature_path: &Path) -> Option<String> {
    let basename = feature_path.file_stem().unwrap().to_string_lossy();
    let h_path = test_root().join("h").join(format!("{}.h", basename));
    fs::read_to_string(h_path).ok()
}

/// Read the expected error message for a malformed skeleton.
fn read_expected_error(bad_path: &Path) -> Option<String> {
    fs::read_to_string(bad_path.with_extension("error")).ok()
}

/// Run a single .feature fixture.
fn run_feature_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    let actual = generate(&content);
    let expected = read_expected_skeleton(path);

    match (actual, expected) {
        (None, None) => {
            println!("  {} => no output (as expected)", filename);
            Ok(())
        }
        (Some(actual), None) => Err(format!(
            "{}: Expected no output, but got:\n{}",
            filename, actual
        )),
        (None, Some(_)) => Err(format!("{}: Expected output, but got none", filename)),
        (Some(actual), Some(expected)) => {
            if actual != expected {
                return Err(format!(
                    "{}: Output mismatch\n--- expected ---\n{}--- actual ---\n{}",
                    filename, expected, actual
                ));
            }
            println!("  {} => {} lines", filename, actual.lines().count());
            Ok(())
        }
    }
}

/// Read a fixture's generated skeleton back and compare trees.
fn run_round_trip_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    let doc = parse(&content);
    let Some(skeleton) = generate(&content) else {
        return Ok(());
    };

    match read_skeleton(&skeleton) {
        Ok(read_back) if read_back == doc => Ok(()),
        Ok(read_back) => Err(format!(
            "{}: Round trip mismatch\n    parsed:    {:?}\n    read back: {:?}",
            filename, doc, read_back
        )),
        Err(e) => Err(format!("{}: Generated skeleton rejected: {}", filename, e)),
    }
}

/// Levels and depths of every node in document order.
fn shape(doc: &Document) -> Vec<(usize, Level)> {
    fn walk(steps: &[StepNode], depth: usize, out: &mut Vec<(usize, Level)>) {
        for step in steps {
            out.push((depth, step.level));
            walk(&step.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    for scenario in &doc.scenarios {
        out.push((0, Level::Scenario));
        walk(&scenario.children, 1, &mut out);
    }
    out
}

/// Parse a fixture's generated skeleton as if it were a document. The call
/// names match the English keyword forms, so the shape must survive; titles
/// do not, because a call line has no colon before its title.
fn run_reparse_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    let doc = parse(&content);
    let Some(skeleton) = render(&doc) else {
        return Ok(());
    };

    let reparsed = parse(&skeleton);
    if shape(&reparsed) == shape(&doc) {
        Ok(())
    } else {
        Err(format!(
            "{}: Reparse changed the shape\n    parsed:   {:?}\n    reparsed: {:?}",
            filename,
            shape(&doc),
            shape(&reparsed)
        ))
    }
}

/// Run a single malformed skeleton (expected to fail with specific error).
fn run_bad_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    match read_skeleton_with_filename(&content, Some(&filename)) {
        Ok(doc) => Err(format!(
            "{}: Expected read error, but got success: {:?}",
            filename, doc
        )),
        Err(e) => {
            let actual_error = e.to_string();
            match read_expected_error(path) {
                Some(expected) if expected.trim() == actual_error => {
                    println!("  {} => error (as expected)", filename);
                    Ok(())
                }
                Some(expected) => Err(format!(
                    "{}: Error mismatch\n    expected: {}\n    actual:   {}",
                    filename,
                    expected.trim(),
                    actual_error
                )),
                None => Err(format!("{}: Missing .error file", filename)),
            }
        }
    }
}

fn run_all(files: &[PathBuf], label: &str, run: fn(&Path) -> Result<(), String>) {
    assert!(!files.is_empty(), "No {} fixtures found!", label);

    println!("\nRunning {} {} fixtures:", files.len(), label);

    let mut passed = 0;
    let mut failed = 0;
    let mut errors: Vec<String> = Vec::new();

    for file in files {
        match run(file) {
            Ok(()) => passed += 1,
            Err(e) => {
                failed += 1;
                errors.push(e);
            }
        }
    }

    println!("\nResults: {} passed, {} failed", passed, failed);

    if !errors.is_empty() {
        println!("\nErrors:");
        for error in &errors {
            println!("  - {}", error);
        }
        panic!("{} {} fixtures failed", failed, label);
    }
}

#[test]
fn test_all_feature_fixtures() {
    run_all(&get_feature_files(), ".feature", run_feature_test);
}

#[test]
fn test_all_round_trips() {
    run_all(&get_feature_files(), "round trip", run_round_trip_test);
}

#[test]
fn test_all_reparsed_skeletons() {
    run_all(&get_feature_files(), "reparse", run_reparse_test);
}

#[test]
fn test_all_bad_skeletons() {
    run_all(&get_bad_files(), "malformed skeleton", run_bad_test);
}

#[test]
fn test_every_expected_skeleton_has_a_document() {
    for h in get_files_in_subdir("h", "h") {
        let stem = h.file_stem().unwrap().to_string_lossy().to_string();
        let feature = test_root().join("feature").join(format!("{}.feature", stem));
        assert!(feature.is_file(), "{} has no matching .feature", file_name(&h));
    }
}
