pub mod ancestor;
pub mod build;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod input;
pub mod merge;
pub mod steps;
pub mod tracker;
pub mod ui;

pub use error::{ReleaseError, Result};
