//! Pre-release stages of a semantic version
//!
//! Only three stages exist and they are ordered: alpha < beta < rc.
//! A version without a stage is a final release and sorts above all of them.

use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Pre-release stage identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreReleaseStage {
    Alpha,
    Beta,
    Rc,
}

impl PreReleaseStage {
    /// Parse a stage from its lowercase identifier
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// The stage that follows this one, if any
    pub fn next(self) -> Option<Self> {
        match self {
            PreReleaseStage::Alpha => Some(PreReleaseStage::Beta),
            PreReleaseStage::Beta => Some(PreReleaseStage::Rc),
            PreReleaseStage::Rc => None,
        }
    }

    /// Alpha and beta releases are cut from development branches, rc only from release branches
    pub fn is_alpha_or_beta(self) -> bool {
        matches!(self, PreReleaseStage::Alpha | PreReleaseStage::Beta)
    }
}

impl FromStr for PreReleaseStage {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alpha" => Ok(PreReleaseStage::Alpha),
            "beta" => Ok(PreReleaseStage::Beta),
            "rc" => Ok(PreReleaseStage::Rc),
            other => Err(ReleaseError::version(format!(
                "Invalid pre-release stage '{}', expected alpha, beta or rc",
                other
            ))),
        }
    }
}

impl fmt::Display for PreReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseStage::Alpha => write!(f, "alpha"),
            PreReleaseStage::Beta => write!(f, "beta"),
            PreReleaseStage::Rc => write!(f, "rc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_parse() {
        assert_eq!(PreReleaseStage::parse("alpha").unwrap(), PreReleaseStage::Alpha);
        assert_eq!(PreReleaseStage::parse("beta").unwrap(), PreReleaseStage::Beta);
        assert_eq!(PreReleaseStage::parse("rc").unwrap(), PreReleaseStage::Rc);
    }

    #[test]
    fn test_stage_parse_rejects_unknown_and_aliases() {
        assert!(PreReleaseStage::parse("a").is_err());
        assert!(PreReleaseStage::parse("RC").is_err());
        assert!(PreReleaseStage::parse("dev").is_err());
        assert!(PreReleaseStage::parse("").is_err());
    }

    #[test]
    fn test_stage_order() {
        assert!(PreReleaseStage::Alpha < PreReleaseStage::Beta);
        assert!(PreReleaseStage::Beta < PreReleaseStage::Rc);
    }

    #[test]
    fn test_stage_next() {
        assert_eq!(PreReleaseStage::Alpha.next(), Some(PreReleaseStage::Beta));
        assert_eq!(PreReleaseStage::Beta.next(), Some(PreReleaseStage::Rc));
        assert_eq!(PreReleaseStage::Rc.next(), None);
    }

    #[test]
    fn test_stage_display_round_trips() {
        for stage in [PreReleaseStage::Alpha, PreReleaseStage::Beta, PreReleaseStage::Rc] {
            assert_eq!(PreReleaseStage::parse(&stage.to_string()).unwrap(), stage);
        }
    }
}
