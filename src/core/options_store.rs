// src/core/options_store.rs

use crate::cli::parser::ParsedOptions;
use crate::cli::switches;
use crate::models::{SavedOptions, Toggle};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failure to read or write the persisted option store itself.
/// A *missing* store is not an error; defaults apply.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Filesystem error on option store: {0}")]
    Io(#[from] std::io::Error),
    #[error("Option store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A parsed value that violates a domain constraint. Non-fatal for the merge:
/// the offending field is left unchanged and every other field still merges.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid argument '{value}' used for the '{option}' option. Expects 'yes' or 'no'.")]
    NotYesNo { option: String, value: String },
}

/// Loads the persisted options, falling back to defaults when the store file
/// does not exist yet.
pub fn load(path: &Path) -> Result<SavedOptions, StoreError> {
    if !path.exists() {
        log::debug!("No option store at '{}', using defaults.", path.display());
        return Ok(SavedOptions::default());
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Writes the merged options back to the store.
pub fn save(path: &Path, options: &SavedOptions) -> Result<(), StoreError> {
    let contents = serde_json::to_string_pretty(options)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Merges one parse pass into the persisted state, field by field.
///
/// A field not mentioned on the command line keeps its persisted value; this
/// stickiness is the whole point of the store. Binary fields toggle when
/// their switch is given bare and otherwise demand a literal `yes` or `no`.
/// When the merged target is set and trailing extras were captured, the
/// extras are remembered under that target's name only.
///
/// Returns the constraint violations encountered; the caller reports them and
/// still persists the store.
pub fn merge(saved: &mut SavedOptions, parsed: &ParsedOptions) -> Vec<ValidationError> {
    let mut issues = Vec::new();

    if let Some(value) = parsed.required_value(switches::SUB_BUILD_DIRECTORY) {
        saved.sub_build_directory = value.to_string();
    }
    if let Some(value) = parsed.required_value(switches::TARGET) {
        saved.target = value.to_string();
    }
    if let Some(value) = parsed.required_value(switches::TEST_TARGET) {
        saved.test_target = value.to_string();
    }

    merge_toggle(&mut saved.run, parsed, switches::RUN, &mut issues);
    merge_toggle(&mut saved.test_mode, parsed, switches::TEST_MODE, &mut issues);

    if !saved.target.is_empty()
        && let Some(extras) = parsed.extras()
    {
        saved
            .target_args
            .insert(saved.target.clone(), extras.to_vec());
    }

    issues
}

/// Applies one binary field's merge rule: absent keeps, bare flips, an
/// explicit value must be `yes` or `no`.
fn merge_toggle(
    field: &mut Toggle,
    parsed: &ParsedOptions,
    option: &str,
    issues: &mut Vec<ValidationError>,
) {
    match parsed.optional_value(option) {
        None => {}
        Some(None) => *field = field.flipped(),
        Some(Some(raw)) => match raw.parse::<Toggle>() {
            Ok(value) => *field = value,
            Err(()) => issues.push(ValidationError::NotYesNo {
                option: option.to_string(),
                value: raw.to_string(),
            }),
        },
    }
}
