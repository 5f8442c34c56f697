// src/cli/dispatcher.rs

use crate::cli::{parser, switches};
use crate::constants::{ALL_TESTS_NINJA_TARGET, ALL_TESTS_TARGET, OPTIONS_FILENAME, WORKING_DIR};
use crate::core::actions::{self, ActionError, TestAction};
use crate::core::{options_store, resolver, test_targets};
use crate::models::SavedOptions;
use crate::system::executor;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

const HELP_TEXT: &str = "\
nbx [options] [-- targetArgs]
[] - optional
<> - required
[-h |--help] - Show help text
[-s |--showSavedOptions] - Show the current option values
[-b |--subBuildDirectory] <directory> - Directory in build/ containing 'build.ninja'
[-t |--target] <target> - The target to build
[-r |--run] <yes|no> - Decide whether to run the target
[-tm|--testMode] <yes|no> - Enable or disable test mode
[-st|--showTests] - Show the possible test targets
[-tt|--testTarget] <target|all> - Test target to build
[-ta|--testAction] <r|d|o|t|c> - The test action to perform
[targetArgs] - The command line arguments passed to the built target

Details
A <yes|no> option can be toggled by using the option without an argument.

--subBuildDirectory: It is expected that there is a directory called build/ in
  the root of the repository. 'subBuildDirectory' is the subdirectory within
  build/ that contains a 'build.ninja' file that's used for building with
  ninja.

--testTarget: A single test target can be specified but 'all' can also be used
  for building all tests.

--testAction: The possible actions are specified below. If the test target is
  'all', only the 't' and 'c' options are usable.
  r(un): Runs the target executable if successfully built.
  d(iff): Creates a file containing the output of the target executable named
    {target}/out_diff.txt and diffs it against {target}/out.txt.
  o(verwrite): Creates a file containing the output of the target executable
    named {target}/out.txt. The file will be overwritten if it already exists.
  t(est): Does the same as the d option, but only prints out \"{target}: Passed\"
    or \"{target}: Failed\" depending on the result of the diff. When this
    option is used with the all argument, every existing test will be executed
    and displayed with \"{target}: Passed\" or \"{target}: Failed\".
  c(overage): Creates a directory named {target}/coverage that contains a code
    coverage report. This makes finding the code that a unit test did and did
    not run easy. A build of OpenCppCoverage needs to be in your path. It can
    be found here (https://github.com/OpenCppCoverage/OpenCppCoverage). Only
    works on Windows with msvc debug builds.";

/// Reports a non-fatal problem and lets the invocation continue or stop
/// cleanly, depending on the caller.
fn report(message: &str) {
    eprintln!("{}: {}", "Error".red().bold(), message);
}

/// The whole invocation: parse → merge → persist → early-outs → build →
/// optional action. Returns `Err` only for fatal problems (malformed argv,
/// unusable configuration, a broken option store); build and action failures
/// are reported and stop remaining steps without an error exit.
pub fn run(root: &Path, args: &[String]) -> Result<()> {
    let switches = switches::registry();
    let parsed = parser::parse(&switches, args)?;
    log::debug!("Parsed options: {:?}", parsed);

    // Merge into the persisted store and write it back unconditionally, so
    // the last attempted invocation's options are what is remembered even
    // when a later step stops the run.
    let store_path = root.join(OPTIONS_FILENAME);
    let mut saved = options_store::load(&store_path)
        .with_context(|| format!("Could not read '{}'", store_path.display()))?;
    let issues = options_store::merge(&mut saved, &parsed);
    options_store::save(&store_path, &saved)
        .with_context(|| format!("Could not write '{}'", store_path.display()))?;
    for issue in &issues {
        report(&issue.to_string());
    }

    // Early-out queries. The merge above has already been persisted.
    if parsed.flag(switches::HELP) {
        println!("{HELP_TEXT}");
        return Ok(());
    }
    if parsed.flag(switches::SHOW_SAVED_OPTIONS) {
        println!("{}", serde_json::to_string_pretty(&saved)?);
        return Ok(());
    }
    if parsed.flag(switches::SHOW_TESTS) {
        for target in test_targets::discover(root).context("Could not list test targets")? {
            println!("{target}");
        }
        return Ok(());
    }

    let build_dir = resolver::ensure_build_dir(root, &saved)?;
    if saved.test_mode.is_yes() {
        run_test_mode(root, &build_dir, &saved, &parsed)
    } else {
        run_normal_mode(root, &build_dir, &saved)
    }
}

/// Builds the selected target and, when enabled, runs it from `working/`.
fn run_normal_mode(root: &Path, build_dir: &Path, saved: &SavedOptions) -> Result<()> {
    if saved.target.is_empty() {
        return Err(resolver::ConfigError::NoTarget.into());
    }
    if !invoke_build(build_dir, &saved.target)? {
        return Ok(());
    }
    if !saved.run.is_yes() {
        return Ok(());
    }

    let command = resolver::run_command(saved, build_dir)?;
    let working_dir = root.join(WORKING_DIR);
    log::debug!("Running '{}' in '{}'.", command, working_dir.display());
    if let Err(e) = executor::execute_command(&command, &working_dir) {
        report(&e.to_string());
    }
    Ok(())
}

/// Builds the test target (or every test) and performs the requested action.
fn run_test_mode(
    root: &Path,
    build_dir: &Path,
    saved: &SavedOptions,
    parsed: &parser::ParsedOptions,
) -> Result<()> {
    if saved.test_target.is_empty() {
        return Err(resolver::ConfigError::NoTestTarget.into());
    }
    let all = saved.test_target == ALL_TESTS_TARGET;

    // The action is transient: it is read from this invocation's parse, never
    // from the store. It is validated up front so an unusable action stops
    // the run before any subprocess is invoked.
    let action = match parsed.required_value(switches::TEST_ACTION) {
        None => None,
        Some(raw_action) => match validate_action(raw_action, all) {
            Ok(action) => Some(action),
            Err(e) => {
                report(&e.to_string());
                return Ok(());
            }
        },
    };

    let ninja_target = if all {
        ALL_TESTS_NINJA_TARGET
    } else {
        saved.test_target.as_str()
    };
    if !invoke_build(build_dir, ninja_target)? {
        return Ok(());
    }

    // A build without an action is a valid invocation.
    let Some(action) = action else {
        return Ok(());
    };

    if all {
        // Strictly in sequence; a failing target stops the remaining ones.
        for name in test_targets::discover(root).context("Could not list test targets")? {
            let info = test_targets::TestInfo::new(&name, root, build_dir);
            if let Err(e) = actions::perform(action, &info, root) {
                report(&e.to_string());
                return Ok(());
            }
        }
        return Ok(());
    }

    let info = test_targets::TestInfo::new(&saved.test_target, root, build_dir);
    if let Err(e) = actions::perform(action, &info, root) {
        report(&e.to_string());
    }
    Ok(())
}

/// Checks a parsed action letter against the selected test target before
/// anything runs: the letter must be known, coverage must be available on
/// this platform, and only the batch-safe actions apply to "all".
fn validate_action(raw: &str, all: bool) -> Result<TestAction, ActionError> {
    let action = raw.parse::<TestAction>()?;
    if !action.supported_on_this_platform() {
        return Err(ActionError::CoverageUnsupported);
    }
    if all && !action.valid_for_all() {
        return Err(ActionError::NotValidForAll(action.letter().to_string()));
    }
    Ok(action)
}

/// Invokes the build tool for one target. A non-zero exit is terminal for
/// the invocation but not for the process: it is reported and the caller
/// stops, with the option store already written.
fn invoke_build(build_dir: &Path, target: &str) -> Result<bool> {
    let command = resolver::build_command(target)?;
    log::debug!("Building with '{}' in '{}'.", command, build_dir.display());
    match executor::execute_command(&command, build_dir) {
        Ok(()) => Ok(true),
        Err(e) => {
            report(&e.to_string());
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Toggle;

    fn to_args(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn load_store(root: &Path) -> SavedOptions {
        options_store::load(&root.join(OPTIONS_FILENAME)).unwrap()
    }

    #[test]
    fn test_help_early_out_still_persists_merged_options() {
        let root = tempfile::tempdir().unwrap();
        run(root.path(), &to_args(&["-t", "app", "-h"])).unwrap();
        assert_eq!(load_store(root.path()).target, "app");
    }

    #[test]
    fn test_usage_error_is_fatal_and_precedes_persistence() {
        let root = tempfile::tempdir().unwrap();
        assert!(run(root.path(), &to_args(&["--bogus"])).is_err());
        assert!(!root.path().join(OPTIONS_FILENAME).exists());
    }

    #[test]
    fn test_missing_manifest_is_fatal_but_options_are_kept() {
        let root = tempfile::tempdir().unwrap();
        assert!(run(root.path(), &to_args(&["-t", "app"])).is_err());
        // The store was written before the configuration check failed.
        assert_eq!(load_store(root.path()).target, "app");
    }

    #[test]
    fn test_invalid_toggle_value_is_reported_without_aborting() {
        let root = tempfile::tempdir().unwrap();
        run(root.path(), &to_args(&["-r", "maybe", "-h"])).unwrap();
        assert_eq!(load_store(root.path()).run, Toggle::No);
    }

    #[test]
    fn test_show_tests_early_out_lists_without_a_build_dir() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(test_targets::test_dir(root.path()).join("alpha")).unwrap();
        run(root.path(), &to_args(&["-st"])).unwrap();
    }

    #[test]
    fn test_first_run_without_a_store_writes_one() {
        let root = tempfile::tempdir().unwrap();
        run(root.path(), &to_args(&["-s"])).unwrap();
        assert_eq!(load_store(root.path()), SavedOptions::default());
    }

    #[test]
    fn test_action_invalid_for_all_stops_before_any_build() {
        let root = tempfile::tempdir().unwrap();
        let build_dir = root.path().join("build").join("dbg");
        std::fs::create_dir_all(&build_dir).unwrap();
        std::fs::write(build_dir.join(crate::constants::NINJA_MANIFEST), "").unwrap();

        run(
            root.path(),
            &to_args(&["-b", "dbg", "-tm", "yes", "-tt", "all", "-ta", "r"]),
        )
        .unwrap();

        // The invocation ended at action validation: the build tool never ran,
        // so the build directory still holds only the manifest.
        let entries = std::fs::read_dir(&build_dir).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_validate_action_rejects_per_target_actions_for_all() {
        assert!(matches!(
            validate_action("r", true),
            Err(ActionError::NotValidForAll(_))
        ));
        assert!(matches!(validate_action("t", true), Ok(TestAction::Test)));
        assert!(matches!(
            validate_action("x", false),
            Err(ActionError::UnknownAction(_))
        ));
    }
}
