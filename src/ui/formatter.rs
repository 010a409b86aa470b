//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here are pure (no I/O side effects beyond printing) and testable.

use crate::domain::SemanticVersion;
use crate::steps::Outcome;
use console::style;

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Numbered candidate list shown by the version choice prompt
pub fn format_candidates(candidates: &[SemanticVersion]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, version)| format!("  {}. {}", i + 1, version))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary of a finished command
pub fn describe_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Paused { branch, version } => format!(
            "Paused on '{}' before releasing {}; commit your changes and run close-version",
            branch, version
        ),
        Outcome::Released { version, pushed } => {
            if *pushed {
                format!("Released {} and pushed to remotes", version)
            } else {
                format!(
                    "Released {} locally; run push-remote-repos {} to publish",
                    version, version
                )
            }
        }
        Outcome::ReleaseBranchCreated { branch, pushed } => {
            if *pushed {
                format!("Created and pushed '{}'", branch)
            } else {
                format!("Created '{}' locally", branch)
            }
        }
        Outcome::Pushed { version } => format!("Pushed release {}", version),
    }
}

/// Display manual push instruction after a `--no-push` run.
pub fn display_manual_push_instruction(version: &SemanticVersion) {
    println!(
        "\n{} To publish this release later, run:\n  {}",
        style("→").yellow(),
        style(format!("release-flow push-remote-repos {}", version)).cyan()
    );
}
