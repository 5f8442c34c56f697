// src/cli/switches.rs

/// Canonical switch names. These double as the keys of `ParsedOptions` and,
/// for the saveable ones, match the field names of the persisted store.
pub const HELP: &str = "help";
pub const SHOW_SAVED_OPTIONS: &str = "showSavedOptions";
pub const SUB_BUILD_DIRECTORY: &str = "subBuildDirectory";
pub const TARGET: &str = "target";
pub const RUN: &str = "run";
pub const TEST_MODE: &str = "testMode";
pub const SHOW_TESTS: &str = "showTests";
pub const TEST_TARGET: &str = "testTarget";
pub const TEST_ACTION: &str = "testAction";

/// How many value tokens a switch consumes from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Presence alone is the value (e.g. `--help`).
    NoArgument,
    /// Consumes the following token iff it is not switch-like. A binary
    /// option given bare this way toggles its persisted value.
    OptionalArgument,
    /// The following token must exist and must not be switch-like.
    RequiredArgument,
}

/// A registered command-line option: a canonical name, the two textual forms
/// that identify it, and its arity.
#[derive(Debug, Clone)]
pub struct Switch {
    pub name: &'static str,
    pub long: String,
    pub short: String,
    pub arity: Arity,
}

impl Switch {
    pub fn new(name: &'static str, abbreviation: &str, arity: Arity) -> Self {
        Self {
            name,
            long: format!("--{name}"),
            short: format!("-{abbreviation}"),
            arity,
        }
    }

    /// Whether a command-line token is exactly this switch's long or short form.
    pub fn matches(&self, token: &str) -> bool {
        self.long == token || self.short == token
    }

    /// Whether a token looks like a switch (and therefore cannot be consumed
    /// as the value of a preceding option).
    pub fn is_switch_like(token: &str) -> bool {
        token.starts_with('-')
    }
}

/// The fixed set of recognized switches.
///
/// No two entries may share a long or short form; this is a programmer
/// invariant of this table, not checked at runtime.
pub fn registry() -> Vec<Switch> {
    vec![
        Switch::new(HELP, "h", Arity::NoArgument),
        Switch::new(SHOW_SAVED_OPTIONS, "s", Arity::NoArgument),
        Switch::new(SUB_BUILD_DIRECTORY, "b", Arity::RequiredArgument),
        Switch::new(TARGET, "t", Arity::RequiredArgument),
        Switch::new(RUN, "r", Arity::OptionalArgument),
        Switch::new(TEST_MODE, "tm", Arity::OptionalArgument),
        Switch::new(SHOW_TESTS, "st", Arity::NoArgument),
        Switch::new(TEST_TARGET, "tt", Arity::RequiredArgument),
        Switch::new(TEST_ACTION, "ta", Arity::RequiredArgument),
    ]
}
