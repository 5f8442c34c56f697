// src/cli/mod.rs

pub mod dispatcher;
pub mod parser;
pub mod switches;
