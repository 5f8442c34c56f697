// src/core/mod.rs

pub mod actions;
pub mod options_store;
pub mod resolver;
pub mod test_targets;
