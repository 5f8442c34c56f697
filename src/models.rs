// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// A binary sticky option. The textual `"yes"`/`"no"` form only exists at the
/// serialization boundary and on the command line.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Yes,
    #[default]
    No,
}

impl Toggle {
    /// Flips the value. Applied when a binary switch is given with no argument.
    pub fn flipped(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

impl FromStr for Toggle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(()),
        }
    }
}

/// The option state that survives between invocations.
///
/// This is the full on-disk layout of `options.json`. Every field has a
/// default so a missing or partial file deserializes permissively.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedOptions {
    /// Subdirectory of `build/` containing the `build.ninja` manifest.
    pub sub_build_directory: String,
    /// The target to build (and run, when `run` is enabled).
    pub target: String,
    /// The last-used trailing arguments, remembered per target name so that
    /// switching targets does not clobber another target's saved arguments.
    pub target_args: HashMap<String, Vec<String>>,
    /// Whether to run the target after a successful build.
    pub run: Toggle,
    /// Whether the tool operates on test targets instead of the main target.
    pub test_mode: Toggle,
    /// The test target to build, or `"all"` for every discovered test.
    pub test_target: String,
}

impl SavedOptions {
    /// The saved trailing arguments for a target, if any were recorded.
    pub fn args_for(&self, target: &str) -> Option<&[String]> {
        self.target_args.get(target).map(Vec::as_slice)
    }
}
