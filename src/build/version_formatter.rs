//! Machine-readable version strings handed to build tooling.
//!
//! Local builds get a timestamp suffix so that packages built from different
//! working trees never collide in a package cache; CI builds are reproducible and
//! carry the build number instead.

use crate::domain::{PreReleaseStage, SemanticVersion};
use crate::error::{ReleaseError, Result};
use chrono::NaiveDateTime;

/// Counters at or above this value would overflow into the next stage's range
const STAGE_RANGE: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildKind {
    Ci { build_number: String },
    Local { timestamp: NaiveDateTime },
}

impl BuildKind {
    /// CI when `BUILD_NUMBER` is set and non-empty, local otherwise
    pub fn detect() -> Self {
        match std::env::var("BUILD_NUMBER") {
            Ok(build_number) if !build_number.trim().is_empty() => BuildKind::Ci {
                build_number: build_number.trim().to_string(),
            },
            _ => BuildKind::Local {
                timestamp: chrono::Local::now().naive_local(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildVersions {
    pub version: String,
    pub assembly_version: String,
    pub assembly_file_version: String,
    pub informational_version: String,
    pub nuget_version: String,
}

pub struct BuildVersionFormatter {
    kind: BuildKind,
}

impl BuildVersionFormatter {
    pub fn new(kind: BuildKind) -> Self {
        BuildVersionFormatter { kind }
    }

    pub fn format(&self, version: &SemanticVersion) -> Result<BuildVersions> {
        Ok(BuildVersions {
            version: version.to_string(),
            assembly_version: format!("{}.{}.0.0", version.major, version.minor),
            assembly_file_version: assembly_file_version(version)?,
            informational_version: self.informational_version(version),
            nuget_version: self.nuget_version(version),
        })
    }

    fn informational_version(&self, version: &SemanticVersion) -> String {
        match &self.kind {
            BuildKind::Ci { build_number } => format!("{}+ci.{}", version, build_number),
            BuildKind::Local { timestamp } => {
                format!("{}+local.{}", version, timestamp.format("%Y%m%d%H%M%S"))
            }
        }
    }

    fn nuget_version(&self, version: &SemanticVersion) -> String {
        match &self.kind {
            BuildKind::Ci { .. } => version.to_string(),
            BuildKind::Local { timestamp } => {
                let separator = if version.is_pre_release() { '.' } else { '-' };
                format!(
                    "{}{}local.{}",
                    version,
                    separator,
                    timestamp.format("%Y%m%d%H%M%S")
                )
            }
        }
    }
}

/// `major.minor.patch.revision` where the revision orders alpha < beta < rc < final
fn assembly_file_version(version: &SemanticVersion) -> Result<String> {
    let revision = match version.pre {
        None => 3 * STAGE_RANGE,
        Some(pre) => {
            if pre.counter >= STAGE_RANGE {
                return Err(ReleaseError::version(format!(
                    "Pre-release counter of {} must be below {}",
                    version, STAGE_RANGE
                )));
            }
            let base = match pre.stage {
                PreReleaseStage::Alpha => 0,
                PreReleaseStage::Beta => STAGE_RANGE,
                PreReleaseStage::Rc => 2 * STAGE_RANGE,
            };
            base + pre.counter
        }
    };
    Ok(format!(
        "{}.{}.{}.{}",
        version.major, version.minor, version.patch, revision
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn v(text: &str) -> SemanticVersion {
        SemanticVersion::parse(text).unwrap()
    }

    fn local() -> BuildVersionFormatter {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        BuildVersionFormatter::new(BuildKind::Local { timestamp })
    }

    fn ci() -> BuildVersionFormatter {
        BuildVersionFormatter::new(BuildKind::Ci {
            build_number: "421".to_string(),
        })
    }

    #[test]
    fn test_assembly_versions() {
        let versions = ci().format(&v("2.3.4")).unwrap();
        assert_eq!(versions.assembly_version, "2.3.0.0");
        assert_eq!(versions.assembly_file_version, "2.3.4.30000");
    }

    #[test]
    fn test_file_version_revision_by_stage() {
        let formatter = ci();
        let revision = |text: &str| formatter.format(&v(text)).unwrap().assembly_file_version;
        assert_eq!(revision("1.2.0-alpha.3"), "1.2.0.3");
        assert_eq!(revision("1.2.0-beta.2"), "1.2.0.10002");
        assert_eq!(revision("1.2.0-rc.1"), "1.2.0.20001");
    }

    #[test]
    fn test_counter_out_of_range() {
        let err = ci().format(&v("1.2.0-beta.10000")).unwrap_err();
        assert!(matches!(err, ReleaseError::Version(_)));
    }

    #[test]
    fn test_ci_strings() {
        let versions = ci().format(&v("1.2.0-rc.1")).unwrap();
        assert_eq!(versions.informational_version, "1.2.0-rc.1+ci.421");
        assert_eq!(versions.nuget_version, "1.2.0-rc.1");
    }

    #[test]
    fn test_local_strings() {
        let formatter = local();
        let release = formatter.format(&v("1.2.0")).unwrap();
        assert_eq!(release.informational_version, "1.2.0+local.20240305140709");
        assert_eq!(release.nuget_version, "1.2.0-local.20240305140709");

        let alpha = formatter.format(&v("1.2.0-alpha.1")).unwrap();
        assert_eq!(alpha.nuget_version, "1.2.0-alpha.1.local.20240305140709");
    }
}
