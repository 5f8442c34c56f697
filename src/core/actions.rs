// src/core/actions.rs

use crate::constants::COVERAGE_DIR;
use crate::core::test_targets::TestInfo;
use crate::system::executor::{self, ExecutionError};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("'{0}' is not a valid action.")]
    UnknownAction(String),
    #[error("'{0}' is not a valid action for 'all'.")]
    NotValidForAll(String),
    #[error("Coverage reports are only available on Windows under msvc.")]
    CoverageUnsupported,
    #[error("Could not write '{path}': {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command could not be quoted: {0}")]
    Quote(#[from] shlex::QuoteError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// What to do with a test target after building it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestAction {
    /// Run the test binary in its working directory.
    Run,
    /// Capture output and show a verbose, colored diff against the golden file.
    Diff,
    /// Capture output into the golden file, replacing it.
    Overwrite,
    /// Capture output, diff quietly, and report Passed/Failed.
    Test,
    /// Produce an HTML coverage report through OpenCppCoverage.
    Coverage,
}

impl TestAction {
    pub fn letter(self) -> &'static str {
        match self {
            Self::Run => "r",
            Self::Diff => "d",
            Self::Overwrite => "o",
            Self::Test => "t",
            Self::Coverage => "c",
        }
    }

    /// Only actions that make sense across every test at once.
    pub fn valid_for_all(self) -> bool {
        matches!(self, Self::Test | Self::Coverage)
    }

    /// Coverage wraps the target with a Windows/msvc-only tool.
    pub fn supported_on_this_platform(self) -> bool {
        self != Self::Coverage || cfg!(target_os = "windows")
    }
}

impl FromStr for TestAction {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(Self::Run),
            "d" => Ok(Self::Diff),
            "o" => Ok(Self::Overwrite),
            "t" => Ok(Self::Test),
            "c" => Ok(Self::Coverage),
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }
}

/// Dispatches one action against one test target.
pub fn perform(action: TestAction, info: &TestInfo, root: &Path) -> Result<(), ActionError> {
    match action {
        TestAction::Run => run(info),
        TestAction::Diff => diff(info),
        TestAction::Overwrite => overwrite(info),
        TestAction::Test => test(info),
        TestAction::Coverage => coverage(info, root),
    }
}

/// Runs the test binary in its working directory with inherited stdio.
pub fn run(info: &TestInfo) -> Result<(), ActionError> {
    let command = quote_path(&info.command)?;
    executor::execute_command(&command, &info.working_dir)?;
    Ok(())
}

/// Captures the test's output into `out_diff.txt` and shows a verbose diff
/// against the golden file. A non-zero diff status is the difference report
/// itself, not a failure.
pub fn diff(info: &TestInfo) -> Result<(), ActionError> {
    capture_output_to(info, &info.diff_file)?;
    let diff_command = diff_command(info, &["--unified=10", "--color=always"])?;
    executor::execute_for_status(&diff_command, &info.working_dir, false)?;
    Ok(())
}

/// Captures the test's output into the golden file, overwriting it.
pub fn overwrite(info: &TestInfo) -> Result<(), ActionError> {
    capture_output_to(info, &info.golden_file)
}

/// Captures the test's output, diffs it quietly against the golden file, and
/// prints a one-line verdict.
pub fn test(info: &TestInfo) -> Result<(), ActionError> {
    capture_output_to(info, &info.diff_file)?;
    let diff_command = diff_command(info, &[])?;
    let status = executor::execute_for_status(&diff_command, &info.working_dir, true)?;
    let verdict = if status.success() {
        "Passed".bright_green().bold()
    } else {
        "Failed".bright_red().bold()
    };
    println!("{}: {}", info.name, verdict);
    Ok(())
}

/// Produces an HTML coverage report for the test under its working directory.
/// OpenCppCoverage must be on the path; only available on Windows under msvc.
pub fn coverage(info: &TestInfo, root: &Path) -> Result<(), ActionError> {
    if !TestAction::Coverage.supported_on_this_platform() {
        return Err(ActionError::CoverageUnsupported);
    }
    let sources = root.join("src").join("*");
    let coverage_dir = info.working_dir.join(COVERAGE_DIR);
    let binary_dir = info.command.parent().unwrap_or(Path::new("."));
    let sources = sources.to_string_lossy();
    let working_dir = info.working_dir.to_string_lossy();
    let export = format!("html:{}", coverage_dir.display());
    let wrapped = format!("{}.exe", info.command.display());
    let command = shlex::try_join([
        "OpenCppCoverage",
        "-q",
        "--sources",
        sources.as_ref(),
        "--working_dir",
        working_dir.as_ref(),
        "--export_type",
        export.as_str(),
        "--",
        wrapped.as_str(),
    ])?;
    executor::execute_command(&command, binary_dir)?;
    Ok(())
}

/// Runs the test binary in its working directory and writes the captured
/// stdout to the given file.
fn capture_output_to(info: &TestInfo, destination: &Path) -> Result<(), ActionError> {
    let command = quote_path(&info.command)?;
    let output = executor::execute_and_capture_output(&command, &info.working_dir)?;
    fs::write(destination, output).map_err(|source| ActionError::WriteOutput {
        path: destination.display().to_string(),
        source,
    })
}

/// The diff invocation against the golden file. Paths are quoted so the
/// executor's token split keeps them whole.
fn diff_command(info: &TestInfo, extra_flags: &[&str]) -> Result<String, ActionError> {
    let golden = info.golden_file.to_string_lossy();
    let fresh = info.diff_file.to_string_lossy();
    let mut parts = vec!["diff", "--strip-trailing-cr"];
    parts.extend_from_slice(extra_flags);
    parts.push(golden.as_ref());
    parts.push(fresh.as_ref());
    Ok(shlex::try_join(parts)?)
}

/// A path as a single token the executor's `shlex::split` round-trips.
fn quote_path(path: &Path) -> Result<String, ActionError> {
    Ok(shlex::try_quote(&path.to_string_lossy())?.into_owned())
}
