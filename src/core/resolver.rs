// src/core/resolver.rs

use crate::constants::{BUILD_DIR, NINJA_MANIFEST};
use crate::models::SavedOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The merged options do not describe a runnable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No target set. Set one with '-t'.")]
    NoTarget,
    #[error("No test target set. Set one with '-tt'.")]
    NoTestTarget,
    #[error("{NINJA_MANIFEST} was not found in '{0}'.")]
    MissingNinjaManifest(String),
    #[error("Command could not be quoted: {0}")]
    Quote(#[from] shlex::QuoteError),
}

/// The build subdirectory selected by the merged options:
/// `<root>/build/<subBuildDirectory>`.
pub fn build_dir(root: &Path, options: &SavedOptions) -> PathBuf {
    root.join(BUILD_DIR).join(&options.sub_build_directory)
}

/// Resolves the build directory and verifies it holds a ninja manifest.
pub fn ensure_build_dir(root: &Path, options: &SavedOptions) -> Result<PathBuf, ConfigError> {
    let dir = build_dir(root, options);
    if !dir.join(NINJA_MANIFEST).exists() {
        return Err(ConfigError::MissingNinjaManifest(
            dir.display().to_string(),
        ));
    }
    Ok(dir)
}

/// The build-tool invocation for a target. Run from the build directory.
pub fn build_command(target: &str) -> Result<String, ConfigError> {
    Ok(shlex::try_join(["ninja", target])?)
}

/// The invocation of the built target: the executable inside the build
/// directory followed by the target's remembered trailing arguments, in
/// order. Run from the `working/` directory.
pub fn run_command(options: &SavedOptions, build_dir: &Path) -> Result<String, ConfigError> {
    if options.target.is_empty() {
        return Err(ConfigError::NoTarget);
    }
    let executable = build_dir.join(&options.target);
    let executable = executable.to_string_lossy();

    let mut parts = vec![executable.as_ref()];
    if let Some(args) = options.args_for(&options.target) {
        parts.extend(args.iter().map(String::as_str));
    }
    Ok(shlex::try_join(parts)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(target: &str) -> SavedOptions {
        SavedOptions {
            sub_build_directory: "clang/debug".to_string(),
            target: target.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_dir_nests_under_build() {
        let dir = build_dir(Path::new("/repo"), &options("app"));
        assert_eq!(dir, PathBuf::from("/repo/build/clang/debug"));
    }

    #[test]
    fn test_ensure_build_dir_requires_manifest() {
        let root = tempfile::tempdir().unwrap();
        let err = ensure_build_dir(root.path(), &options("app")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingNinjaManifest(_)));

        let dir = root.path().join("build/clang/debug");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(NINJA_MANIFEST), "").unwrap();
        assert_eq!(ensure_build_dir(root.path(), &options("app")).unwrap(), dir);
    }

    #[test]
    fn test_build_command_names_the_target() {
        assert_eq!(build_command("app").unwrap(), "ninja app");
    }

    #[test]
    fn test_run_command_joins_saved_args_in_order() {
        let mut opts = options("app");
        opts.target_args.insert(
            "app".to_string(),
            vec!["--flag".to_string(), "value".to_string()],
        );
        let command = run_command(&opts, Path::new("/repo/build/clang/debug")).unwrap();
        assert_eq!(command, "/repo/build/clang/debug/app --flag value");
    }

    #[test]
    fn test_run_command_ignores_other_targets_args() {
        let mut opts = options("app");
        opts.target_args
            .insert("other".to_string(), vec!["--loud".to_string()]);
        let command = run_command(&opts, Path::new("/b")).unwrap();
        assert_eq!(command, "/b/app");
    }

    #[test]
    fn test_run_command_without_target_is_a_config_error() {
        let err = run_command(&options(""), Path::new("/b")).unwrap_err();
        assert!(matches!(err, ConfigError::NoTarget));
    }
}
