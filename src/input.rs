//! Answers the workflow needs from a human.
//!
//! Prompts are behind the [InputReader] trait so that full pipelines can run with
//! scripted answers; the console implementation lives in [crate::ui].

use crate::domain::SemanticVersion;
use crate::error::{ReleaseError, Result};
use std::cell::RefCell;
use std::collections::VecDeque;

pub trait InputReader {
    /// Ask for a version that could not be derived from tags
    fn read_semantic_version(&self, prompt: &str) -> Result<SemanticVersion>;

    /// Let the user pick exactly one of `candidates`
    fn read_version_choice(
        &self,
        prompt: &str,
        candidates: &[SemanticVersion],
    ) -> Result<SemanticVersion>;

    /// Yes/no question, defaulting to no
    fn read_confirmation(&self, prompt: &str) -> Result<bool>;
}

/// One queued answer of a [ScriptedInputReader]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Version(SemanticVersion),
    Choice(SemanticVersion),
    Confirm(bool),
}

/// Replays queued answers in order and fails on any unexpected prompt
#[derive(Debug, Default)]
pub struct ScriptedInputReader {
    answers: RefCell<VecDeque<Answer>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedInputReader {
    pub fn new(answers: Vec<Answer>) -> Self {
        ScriptedInputReader {
            answers: RefCell::new(answers.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// Every prompt shown so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, prompt: &str) -> Result<Answer> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ReleaseError::input(format!("No scripted answer for '{}'", prompt)))
    }
}

impl InputReader for ScriptedInputReader {
    fn read_semantic_version(&self, prompt: &str) -> Result<SemanticVersion> {
        match self.next(prompt)? {
            Answer::Version(version) => Ok(version),
            other => Err(ReleaseError::input(format!(
                "Expected a version for '{}', scripted {:?}",
                prompt, other
            ))),
        }
    }

    fn read_version_choice(
        &self,
        prompt: &str,
        candidates: &[SemanticVersion],
    ) -> Result<SemanticVersion> {
        match self.next(prompt)? {
            Answer::Choice(version) if candidates.contains(&version) => Ok(version),
            Answer::Choice(version) => Err(ReleaseError::input(format!(
                "{} is not one of {}",
                version,
                join_versions(candidates)
            ))),
            other => Err(ReleaseError::input(format!(
                "Expected a choice for '{}', scripted {:?}",
                prompt, other
            ))),
        }
    }

    fn read_confirmation(&self, prompt: &str) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Confirm(answer) => Ok(answer),
            other => Err(ReleaseError::input(format!(
                "Expected a confirmation for '{}', scripted {:?}",
                prompt, other
            ))),
        }
    }
}

pub fn join_versions(versions: &[SemanticVersion]) -> String {
    versions
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
