use crate::config::Config;
use std::fmt;

/// Named set of files a merge must not carry over to its target branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Scratch files of a pre-release that stay out of develop, hotfix and release branches
    PreReleaseMergeIgnoreList,
    /// Version stamps that would make a stable branch carry a stale version
    TagStableMergeIgnoreList,
}

impl MergePolicy {
    pub fn paths(self, config: &Config) -> &[String] {
        match self {
            MergePolicy::PreReleaseMergeIgnoreList => &config.merge_ignore_lists.pre_release,
            MergePolicy::TagStableMergeIgnoreList => &config.merge_ignore_lists.tag_stable,
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePolicy::PreReleaseMergeIgnoreList => write!(f, "pre-release"),
            MergePolicy::TagStableMergeIgnoreList => write!(f, "tag-stable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_config() {
        let mut config = Config::default();
        config.merge_ignore_lists.tag_stable = vec!["VERSION".to_string()];

        assert_eq!(
            MergePolicy::TagStableMergeIgnoreList.paths(&config),
            ["VERSION".to_string()]
        );
        assert_eq!(
            MergePolicy::PreReleaseMergeIgnoreList.paths(&config).len(),
            2
        );
    }
}
