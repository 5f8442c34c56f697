// src/constants.rs

/// The name of the file holding options remembered between invocations.
/// It lives in the directory the tool is invoked from.
pub const OPTIONS_FILENAME: &str = "options.json";

/// The directory containing per-configuration build trees.
pub const BUILD_DIR: &str = "build";

/// The ninja manifest expected inside the selected build subdirectory.
pub const NINJA_MANIFEST: &str = "build.ninja";

/// The working directory a built target is run from.
pub const WORKING_DIR: &str = "working";

/// The subdirectory of `working/` whose children are the test targets.
pub const TEST_SUBDIR: &str = "test";

/// The ninja target that builds every test target at once.
pub const ALL_TESTS_NINJA_TARGET: &str = "tests";

/// The magic test-target name meaning "every discovered test".
pub const ALL_TESTS_TARGET: &str = "all";

/// The golden output file inside a test's working directory.
pub const GOLDEN_FILENAME: &str = "out.txt";

/// The freshly captured output file a golden file is diffed against.
pub const DIFF_FILENAME: &str = "out_diff.txt";

/// The directory a coverage report is exported to, inside a test's working directory.
pub const COVERAGE_DIR: &str = "coverage";
