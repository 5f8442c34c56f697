//! # System Interaction Layer
//!
//! The boundary between the orchestration logic and process management.
//!
//! - **`executor`**: blocking subprocess execution with an explicit working
//!   directory per call, platform fallbacks for Windows built-ins, and
//!   output capturing for the golden-file actions.

pub mod executor;
