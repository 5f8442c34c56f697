// src/core/test_targets.rs

use crate::constants::{DIFF_FILENAME, GOLDEN_FILENAME, TEST_SUBDIR, WORKING_DIR};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The directory whose subdirectories are the discoverable test targets:
/// `<root>/working/test`.
pub fn test_dir(root: &Path) -> PathBuf {
    root.join(WORKING_DIR).join(TEST_SUBDIR)
}

/// Lists the test targets under `<root>/working/test`, one per subdirectory.
/// Sorted so that "all" iterations are deterministic.
pub fn discover(root: &Path) -> io::Result<Vec<String>> {
    let mut targets = Vec::new();
    for entry in fs::read_dir(test_dir(root))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            targets.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    targets.sort();
    Ok(targets)
}

/// Everything needed to act on one test target: where it runs, what binary
/// it is, and which files its output is compared through.
#[derive(Debug, Clone)]
pub struct TestInfo {
    pub name: String,
    /// The directory the test binary is run from.
    pub working_dir: PathBuf,
    /// The built test executable inside the build directory.
    pub command: PathBuf,
    /// The golden output file (`out.txt`).
    pub golden_file: PathBuf,
    /// The freshly captured output file (`out_diff.txt`).
    pub diff_file: PathBuf,
}

impl TestInfo {
    pub fn new(name: &str, root: &Path, build_dir: &Path) -> Self {
        let working_dir = test_dir(root).join(name);
        Self {
            name: name.to_string(),
            command: build_dir.join("src").join("test").join(name),
            golden_file: working_dir.join(GOLDEN_FILENAME),
            diff_file: working_dir.join(DIFF_FILENAME),
            working_dir,
        }
    }
}
