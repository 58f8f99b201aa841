//! # PrintPlan Core
//!
//! Configuration and error types shared by the split engine and the CLI.

pub mod config;
pub mod error;

pub use config::PrintPlanConfig;
pub use error::{PrintPlanError, Result};
