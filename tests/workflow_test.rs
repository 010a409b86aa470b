// tests/workflow_test.rs
use release_flow::build::mock::VERSION_FILE;
use release_flow::build::{BuildMode, RecordingBuildRunner};
use release_flow::cli::orchestration::{dispatch, WorkflowCommand};
use release_flow::config::Config;
use release_flow::domain::SemanticVersion;
use release_flow::git::mock::PushRecord;
use release_flow::git::{GitClient, MockGitClient};
use release_flow::input::{Answer, ScriptedInputReader};
use release_flow::steps::{Outcome, ReleaseContext, ReleaseOptions};
use release_flow::tracker::RecordingIssueTracker;
use release_flow::ReleaseError;

fn v(text: &str) -> SemanticVersion {
    SemanticVersion::parse(text).unwrap()
}

struct Run {
    result: release_flow::Result<Outcome>,
    tracker_calls: Vec<(SemanticVersion, SemanticVersion)>,
    build_calls: Vec<(BuildMode, SemanticVersion, String)>,
    unused_answers: usize,
}

fn run(
    git: &MockGitClient,
    command: WorkflowCommand,
    options: ReleaseOptions,
    answers: Vec<Answer>,
) -> Run {
    let config = Config::default();
    let tracker = RecordingIssueTracker::new();
    let build = RecordingBuildRunner::new(git);
    let input = ScriptedInputReader::new(answers);
    let ctx = ReleaseContext {
        git,
        issue_tracker: &tracker,
        build: &build,
        input: &input,
        config: &config,
    };

    let result = dispatch(&command, &ctx, &options);
    Run {
        result,
        tracker_calls: tracker.calls(),
        build_calls: build.calls(),
        unused_answers: input.remaining(),
    }
}

fn pushed(remote: &str, branch: &str, tag: Option<&str>) -> PushRecord {
    PushRecord {
        remote: remote.to_string(),
        branch: branch.to_string(),
        tag: tag.map(str::to_string),
    }
}

fn paused() -> ReleaseOptions {
    ReleaseOptions {
        pause_for_commit: true,
        ..Default::default()
    }
}

/// master tagged v1.1.0, support/v1.1 and hotfix/v1.1.1 stamped 1.1.1, hotfix checked out
fn repo_with_hotfix() -> MockGitClient {
    let git = MockGitClient::with_develop();
    git.switch_to("master");
    git.commit("Release 1.1.0", &[("src/app.cs", "v1")]);
    git.add_tag("v1.1.0");
    git.create_branch("support/v1.1", "master");
    git.create_branch("hotfix/v1.1.1", "support/v1.1");
    git.switch_to("hotfix/v1.1.1");
    git.commit("Development for next release 1.1.1", &[(VERSION_FILE, "1.1.1")]);
    git
}

#[test]
fn test_release_on_master_from_develop_releases_new_minor() {
    let git = MockGitClient::with_develop();
    git.commit("Add feature", &[("src/feature.cs", "feature")]);

    let run = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![
            Answer::Version(v("1.0.0")),
            Answer::Choice(v("1.1.0")),
            Answer::Confirm(false),
        ],
    );

    assert_eq!(
        run.result.unwrap(),
        Outcome::Released {
            version: v("1.0.0"),
            pushed: true
        }
    );
    assert_eq!(run.unused_answers, 0);

    // exactly one merge commit on master, carrying the tag
    let master_head = git.branch_head("master").unwrap();
    assert_eq!(git.get_commit(&master_head).unwrap().parents.len(), 2);
    assert_eq!(
        git.log("master"),
        vec!["Merge branch 'release/v1.0.0' into master", "Initial commit"]
    );
    assert_eq!(git.tags(), vec!["v1.0.0"]);
    assert_eq!(git.tag_target("v1.0.0"), Some(master_head));
    assert_eq!(git.file_at("master", "src/feature.cs").as_deref(), Some("feature"));
    assert_eq!(git.file_at("master", VERSION_FILE), None);

    // develop fast-forwarded onto the next version stamp
    assert_eq!(git.branch_head("develop"), git.branch_head("release/v1.0.0"));
    assert_eq!(git.log("develop")[0], "Prepare next version 1.1.0");
    assert_eq!(git.file_at("develop", VERSION_FILE).as_deref(), Some("1.1.0"));
    assert_eq!(git.current_branch_name().unwrap(), "develop");

    assert_eq!(run.tracker_calls, vec![(v("1.0.0"), v("1.1.0"))]);
    assert_eq!(
        run.build_calls,
        vec![(
            BuildMode::PrepareNextVersion,
            v("1.1.0"),
            "release/v1.0.0".to_string()
        )]
    );
    assert_eq!(
        git.pushes(),
        vec![
            pushed("origin", "master", Some("v1.0.0")),
            pushed("origin", "develop", None),
        ]
    );
    assert!(!git.branches().contains(&"support/v1.0".to_string()));
}

#[test]
fn test_release_on_master_with_support_branch() {
    let git = MockGitClient::with_develop();
    git.commit("Add feature", &[("src/feature.cs", "feature")]);

    let run = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![
            Answer::Version(v("1.0.0")),
            Answer::Choice(v("1.1.0")),
            Answer::Confirm(true),
        ],
    );
    run.result.unwrap();

    assert_eq!(git.branch_head("support/v1.0"), git.branch_head("master"));
    assert_eq!(git.log("hotfix/v1.0.1")[0], "Development for next release 1.0.1");
    assert_eq!(
        git.file_at("hotfix/v1.0.1", VERSION_FILE).as_deref(),
        Some("1.0.1")
    );
    assert_eq!(
        git.pushes(),
        vec![
            pushed("origin", "support/v1.0", None),
            pushed("origin", "hotfix/v1.0.1", None),
            pushed("origin", "master", Some("v1.0.0")),
            pushed("origin", "develop", None),
        ]
    );
}

#[test]
fn test_release_alpha_beta_from_hotfix_with_additional_commit_and_continue() {
    let git = repo_with_hotfix();

    let start = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        paused(),
        vec![
            Answer::Choice(v("1.1.1-alpha.1")),
            Answer::Choice(v("1.1.1-alpha.2")),
        ],
    );
    assert_eq!(
        start.result.unwrap(),
        Outcome::Paused {
            branch: "prerelease/v1.1.1-alpha.1".to_string(),
            version: v("1.1.1-alpha.1")
        }
    );
    assert_eq!(git.current_branch_name().unwrap(), "prerelease/v1.1.1-alpha.1");
    assert!(git.tags().iter().all(|t| t != "v1.1.1-alpha.1"));
    assert_eq!(
        git.file_at("hotfix/v1.1.1", VERSION_FILE).as_deref(),
        Some("1.1.1-alpha.2")
    );

    let fix = git.commit("Fix crash", &[("src/app.cs", "v1 fixed")]);

    let close = run(
        &git,
        WorkflowCommand::CloseVersion,
        ReleaseOptions::default(),
        Vec::new(),
    );
    assert_eq!(
        close.result.unwrap(),
        Outcome::Released {
            version: v("1.1.1-alpha.1"),
            pushed: true
        }
    );

    assert_eq!(git.tag_target("v1.1.1-alpha.1"), Some(fix.clone()));
    let hotfix_head = git.branch_head("hotfix/v1.1.1").unwrap();
    assert!(git.get_commit(&hotfix_head).unwrap().parents.contains(&fix));
    assert_eq!(
        git.file_at("hotfix/v1.1.1", "src/app.cs").as_deref(),
        Some("v1 fixed")
    );
    // the pre-release keeps its own stamp out of the hotfix branch
    assert_eq!(
        git.file_at("hotfix/v1.1.1", VERSION_FILE).as_deref(),
        Some("1.1.1-alpha.2")
    );
    assert_eq!(git.current_branch_name().unwrap(), "hotfix/v1.1.1");
    assert_eq!(
        git.pushes(),
        vec![
            pushed("origin", "prerelease/v1.1.1-alpha.1", Some("v1.1.1-alpha.1")),
            pushed("origin", "hotfix/v1.1.1", None),
        ]
    );
}

#[test]
fn test_release_alpha_beta_from_hotfix_without_pause_matches_paused_run() {
    let git = repo_with_hotfix();

    let run = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![
            Answer::Choice(v("1.1.1-alpha.1")),
            Answer::Choice(v("1.1.1-alpha.2")),
        ],
    );
    run.result.unwrap();

    assert!(git.tags().contains(&"v1.1.1-alpha.1".to_string()));
    assert_eq!(
        git.file_at("hotfix/v1.1.1", VERSION_FILE).as_deref(),
        Some("1.1.1-alpha.2")
    );
    assert_eq!(git.current_branch_name().unwrap(), "hotfix/v1.1.1");
    assert_eq!(
        git.pushes(),
        vec![
            pushed("origin", "prerelease/v1.1.1-alpha.1", Some("v1.1.1-alpha.1")),
            pushed("origin", "hotfix/v1.1.1", None),
        ]
    );
}

#[test]
fn test_existing_tag_aborts_before_creating_branch() {
    let git = MockGitClient::with_develop();
    git.create_branch("experiment", "develop");
    git.switch_to("experiment");
    git.commit("Unmerged work", &[("x", "1")]);
    git.add_tag("v1.0.0");
    git.switch_to("develop");
    let branches_before = git.branches();

    let run = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![Answer::Version(v("1.0.0"))],
    );

    let err = run.result.unwrap_err();
    assert!(matches!(err, ReleaseError::TagExists(ref tag) if tag == "v1.0.0"));
    assert_eq!(git.branches(), branches_before);
    assert!(run.tracker_calls.is_empty());
    assert!(git.pushes().is_empty());
}

#[test]
fn test_dirty_working_directory_is_rejected() {
    let git = MockGitClient::with_develop();
    git.set_dirty(true);

    let run = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![Answer::Version(v("1.0.0"))],
    );

    assert!(matches!(run.result.unwrap_err(), ReleaseError::Precondition(_)));
    assert_eq!(git.branches(), vec!["develop", "master"]);
}

#[test]
fn test_from_master_skips_tagged_patch_versions() {
    let git = MockGitClient::with_develop();
    git.switch_to("master");
    git.commit("Release 1.0.0", &[("src/app.cs", "v1")]);
    git.add_tag("v1.0.0");
    git.create_branch("support/v1.0", "master");
    git.switch_to("support/v1.0");
    git.commit("Patch", &[("src/app.cs", "v1.0.1")]);
    git.add_tag("v1.0.1");
    git.switch_to("master");

    let run = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![Answer::Choice(v("1.0.3"))],
    );

    assert_eq!(
        run.result.unwrap(),
        Outcome::Released {
            version: v("1.0.2"),
            pushed: true
        }
    );
    assert_eq!(git.tag_target("v1.0.2"), git.branch_head("master"));
    assert_eq!(run.tracker_calls, vec![(v("1.0.2"), v("1.0.3"))]);
    assert!(run.build_calls.is_empty());
    assert_eq!(git.pushes(), vec![pushed("origin", "master", Some("v1.0.2"))]);
}

#[test]
fn test_release_patch_from_hotfix() {
    let git = repo_with_hotfix();

    let run = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![Answer::Choice(v("1.1.1")), Answer::Choice(v("1.1.2"))],
    );
    run.result.unwrap();

    let support_head = git.branch_head("support/v1.1").unwrap();
    assert_eq!(git.get_commit(&support_head).unwrap().parents.len(), 2);
    assert_eq!(git.tag_target("v1.1.1"), Some(support_head.clone()));
    assert_eq!(git.file_at("support/v1.1", VERSION_FILE), None);
    assert_eq!(
        git.branch_head("hotfix/v1.1.1"),
        git.branch_head("release/v1.1.1")
    );
    assert_eq!(
        git.file_at("hotfix/v1.1.1", VERSION_FILE).as_deref(),
        Some("1.1.2")
    );

    // The next patch continues on a fresh hotfix branch off the tagged support commit
    let next_hotfix = git.branch_head("hotfix/v1.1.2").unwrap();
    assert_eq!(
        git.get_commit(&next_hotfix).unwrap().parents,
        vec![support_head]
    );
    assert_eq!(
        git.file_at("hotfix/v1.1.2", VERSION_FILE).as_deref(),
        Some("1.1.2")
    );
    assert_eq!(
        run.build_calls,
        vec![
            (
                BuildMode::PrepareNextVersion,
                v("1.1.2"),
                "release/v1.1.1".to_string()
            ),
            (
                BuildMode::DevelopmentForNextRelease,
                v("1.1.2"),
                "hotfix/v1.1.2".to_string()
            ),
        ]
    );
    assert_eq!(
        git.pushes(),
        vec![
            pushed("origin", "hotfix/v1.1.2", None),
            pushed("origin", "support/v1.1", Some("v1.1.1")),
            pushed("origin", "hotfix/v1.1.1", None),
        ]
    );
}

#[test]
fn test_second_patch_release_on_hotfix_line() {
    let git = repo_with_hotfix();
    run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![Answer::Choice(v("1.1.1")), Answer::Choice(v("1.1.2"))],
    )
    .result
    .unwrap();

    // The released patch is no longer offered on the old hotfix branch
    assert_eq!(git.current_branch_name().unwrap(), "hotfix/v1.1.1");
    let stale = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![Answer::Choice(v("1.1.1"))],
    );
    assert!(matches!(stale.result.unwrap_err(), ReleaseError::Input(_)));
    assert!(!git.branches().contains(&"release/v1.1.2".to_string()));

    git.switch_to("hotfix/v1.1.2");
    git.commit("Fix regression", &[("src/app.cs", "v1 fixed")]);
    let second = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![Answer::Choice(v("1.1.2")), Answer::Choice(v("1.1.3"))],
    );
    assert_eq!(
        second.result.unwrap(),
        Outcome::Released {
            version: v("1.1.2"),
            pushed: true
        }
    );
    assert_eq!(git.tag_target("v1.1.2"), git.branch_head("support/v1.1"));
    assert_eq!(
        git.file_at("support/v1.1", "src/app.cs").as_deref(),
        Some("v1 fixed")
    );
    assert_eq!(git.file_at("support/v1.1", VERSION_FILE), None);
    assert!(git.branches().contains(&"hotfix/v1.1.3".to_string()));
    assert_eq!(git.current_branch_name().unwrap(), "hotfix/v1.1.2");
}

#[test]
fn test_release_branch_with_release_candidate() {
    let git = MockGitClient::with_develop();
    git.switch_to("master");
    git.commit("Release 1.0.0", &[("src/app.cs", "v1")]);
    git.add_tag("v1.0.0");
    git.switch_to("develop");
    git.commit("Add feature", &[("src/feature.cs", "feature")]);

    let open = run(
        &git,
        WorkflowCommand::NewReleaseBranch,
        ReleaseOptions::default(),
        vec![Answer::Choice(v("1.1.0")), Answer::Choice(v("1.2.0"))],
    );
    assert_eq!(
        open.result.unwrap(),
        Outcome::ReleaseBranchCreated {
            branch: "release/v1.1.0".to_string(),
            pushed: true
        }
    );
    assert_eq!(git.current_branch_name().unwrap(), "release/v1.1.0");
    assert_eq!(git.file_at("develop", VERSION_FILE).as_deref(), Some("1.2.0"));
    assert_eq!(git.file_at("release/v1.1.0", VERSION_FILE), None);

    let rc = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![Answer::Choice(v("1.1.0-rc.1")), Answer::Choice(v("1.1.0"))],
    );
    rc.result.unwrap();
    assert!(git.tags().contains(&"v1.1.0-rc.1".to_string()));
    assert_eq!(git.current_branch_name().unwrap(), "release/v1.1.0");
    assert_eq!(
        git.file_at("release/v1.1.0", VERSION_FILE).as_deref(),
        Some("1.1.0")
    );

    let finish = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![
            Answer::Choice(v("1.1.0")),
            Answer::Choice(v("1.2.0")),
            Answer::Confirm(true),
        ],
    );
    assert_eq!(
        finish.result.unwrap(),
        Outcome::Released {
            version: v("1.1.0"),
            pushed: true
        }
    );
    assert_eq!(finish.tracker_calls, vec![(v("1.1.0"), v("1.2.0"))]);
    assert_eq!(git.tag_target("v1.1.0"), git.branch_head("master"));
    // develop moved on, so the release is merged without its version stamp
    assert_eq!(git.file_at("develop", VERSION_FILE).as_deref(), Some("1.2.0"));
    assert_eq!(
        git.file_at("hotfix/v1.1.1", VERSION_FILE).as_deref(),
        Some("1.1.1")
    );
    assert_eq!(git.current_branch_name().unwrap(), "develop");
}

#[test]
fn test_new_release_branch_only_offers_final_versions() {
    let git = MockGitClient::with_develop();
    git.add_tag("v1.0.0");

    let run = run(
        &git,
        WorkflowCommand::NewReleaseBranch,
        ReleaseOptions {
            no_push: true,
            ..Default::default()
        },
        vec![Answer::Choice(v("1.1.0-alpha.1"))],
    );

    assert!(matches!(run.result.unwrap_err(), ReleaseError::Input(_)));
    assert!(!git.branches().iter().any(|b| b.starts_with("release/")));
}

#[test]
fn test_no_push_then_push_remote_repos() {
    let git = MockGitClient::with_develop();
    git.commit("Add feature", &[("src/feature.cs", "feature")]);

    let release = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions {
            no_push: true,
            ..Default::default()
        },
        vec![
            Answer::Version(v("1.0.0")),
            Answer::Choice(v("1.1.0")),
            Answer::Confirm(true),
        ],
    );
    assert_eq!(
        release.result.unwrap(),
        Outcome::Released {
            version: v("1.0.0"),
            pushed: false
        }
    );
    assert!(git.pushes().is_empty());

    let publish = run(
        &git,
        WorkflowCommand::PushRemoteRepos {
            version: v("1.0.0"),
        },
        ReleaseOptions::default(),
        Vec::new(),
    );
    assert_eq!(
        publish.result.unwrap(),
        Outcome::Pushed {
            version: v("1.0.0")
        }
    );
    assert_eq!(
        git.pushes(),
        vec![
            pushed("origin", "support/v1.0", None),
            pushed("origin", "hotfix/v1.0.1", None),
            pushed("origin", "master", Some("v1.0.0")),
            pushed("origin", "develop", None),
        ]
    );
}

#[test]
fn test_push_remote_repos_requires_tag() {
    let git = MockGitClient::with_develop();
    let run = run(
        &git,
        WorkflowCommand::PushRemoteRepos {
            version: v("2.0.0"),
        },
        ReleaseOptions::default(),
        Vec::new(),
    );
    assert!(matches!(run.result.unwrap_err(), ReleaseError::Precondition(_)));
}

#[test]
fn test_pause_then_close_release_on_master() {
    let git = MockGitClient::with_develop();
    git.commit("Add feature", &[("src/feature.cs", "feature")]);

    let start = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        paused(),
        vec![Answer::Version(v("1.0.0")), Answer::Choice(v("1.1.0"))],
    );
    assert!(matches!(start.result.unwrap(), Outcome::Paused { .. }));
    assert!(git.tags().is_empty());

    git.commit("Last minute fix", &[("src/feature.cs", "feature fixed")]);

    let close = run(
        &git,
        WorkflowCommand::CloseVersion,
        ReleaseOptions::default(),
        vec![Answer::Confirm(false)],
    );
    close.result.unwrap();

    assert_eq!(
        git.file_at("master", "src/feature.cs").as_deref(),
        Some("feature fixed")
    );
    assert_eq!(git.tag_target("v1.0.0"), git.branch_head("master"));
    assert_eq!(git.log("develop")[0], "Last minute fix");
}

#[test]
fn test_close_version_with_pinned_ancestor() {
    let git = MockGitClient::with_develop();
    git.checkout_new_branch("release/v1.0.0").unwrap();
    git.commit("Stabilize", &[("src/app.cs", "stable")]);

    let run = run(
        &git,
        WorkflowCommand::CloseVersion,
        ReleaseOptions {
            ancestor: Some("develop".to_string()),
            no_push: true,
            ..Default::default()
        },
        vec![Answer::Confirm(false)],
    );
    run.result.unwrap();
    assert_eq!(git.tag_target("v1.0.0"), git.branch_head("master"));
}

#[test]
fn test_close_version_on_develop_fails() {
    let git = MockGitClient::with_develop();
    let run = run(
        &git,
        WorkflowCommand::CloseVersion,
        ReleaseOptions::default(),
        Vec::new(),
    );
    assert!(matches!(run.result.unwrap_err(), ReleaseError::Precondition(_)));
}

#[test]
fn test_counter_at_the_limit_is_a_version_error() {
    let git = MockGitClient::with_develop();
    git.commit("Alpha", &[("src/app.cs", "alpha")]);
    git.add_tag(&format!("v1.1.0-alpha.{}", u32::MAX));

    let run = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        ReleaseOptions::default(),
        vec![Answer::Choice(v("1.1.0"))],
    );

    assert!(matches!(run.result.unwrap_err(), ReleaseError::Version(_)));
    assert_eq!(run.unused_answers, 1);
    assert_eq!(git.branches(), vec!["develop", "master"]);
}

#[test]
fn test_pause_then_close_patch_release_from_hotfix() {
    let git = repo_with_hotfix();

    let start = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        paused(),
        vec![Answer::Choice(v("1.1.1")), Answer::Choice(v("1.1.2"))],
    );
    assert_eq!(
        start.result.unwrap(),
        Outcome::Paused {
            branch: "release/v1.1.1".to_string(),
            version: v("1.1.1")
        }
    );
    git.commit("Patch fix", &[("src/app.cs", "v1 patched")]);

    let close = run(
        &git,
        WorkflowCommand::CloseVersion,
        ReleaseOptions::default(),
        Vec::new(),
    );
    assert_eq!(
        close.result.unwrap(),
        Outcome::Released {
            version: v("1.1.1"),
            pushed: true
        }
    );
    assert_eq!(git.tag_target("v1.1.1"), git.branch_head("support/v1.1"));
    assert_eq!(
        git.file_at("support/v1.1", "src/app.cs").as_deref(),
        Some("v1 patched")
    );
    assert_eq!(
        git.branch_head("hotfix/v1.1.1"),
        git.branch_head("release/v1.1.1")
    );
    assert!(git.branches().contains(&"hotfix/v1.1.2".to_string()));
    assert_eq!(git.branch_head("master"), git.tag_target("v1.1.0"));
}

#[test]
fn test_pause_then_close_release_candidate() {
    let git = MockGitClient::with_develop();
    git.switch_to("master");
    git.commit("Release 1.0.0", &[("src/app.cs", "v1")]);
    git.add_tag("v1.0.0");
    git.switch_to("develop");
    git.commit("Add feature", &[("src/feature.cs", "feature")]);

    run(
        &git,
        WorkflowCommand::NewReleaseBranch,
        ReleaseOptions::default(),
        vec![Answer::Choice(v("1.1.0")), Answer::Choice(v("1.2.0"))],
    )
    .result
    .unwrap();

    let start = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        paused(),
        vec![Answer::Choice(v("1.1.0-rc.1")), Answer::Choice(v("1.1.0"))],
    );
    assert_eq!(
        start.result.unwrap(),
        Outcome::Paused {
            branch: "prerelease/v1.1.0-rc.1".to_string(),
            version: v("1.1.0-rc.1")
        }
    );
    git.commit("RC fix", &[("src/feature.cs", "feature fixed")]);
    let rc_tip = git.head_commit();

    let close = run(
        &git,
        WorkflowCommand::CloseVersion,
        ReleaseOptions::default(),
        Vec::new(),
    );
    close.result.unwrap();

    assert_eq!(git.tag_target("v1.1.0-rc.1"), Some(rc_tip));
    assert_eq!(git.current_branch_name().unwrap(), "release/v1.1.0");
    assert_eq!(
        git.file_at("release/v1.1.0", "src/feature.cs").as_deref(),
        Some("feature fixed")
    );
    assert_eq!(
        git.file_at("release/v1.1.0", VERSION_FILE).as_deref(),
        Some("1.1.0")
    );
    assert_eq!(
        git.file_at("develop", "src/feature.cs").as_deref(),
        Some("feature")
    );
    let pushes = git.pushes();
    assert_eq!(
        pushes[pushes.len() - 2..].to_vec(),
        vec![
            pushed("origin", "prerelease/v1.1.0-rc.1", Some("v1.1.0-rc.1")),
            pushed("origin", "release/v1.1.0", None),
        ]
    );
}

#[test]
fn test_pause_then_close_patch_release_on_master() {
    let git = MockGitClient::with_develop();
    git.switch_to("master");
    git.commit("Release 1.0.0", &[("src/app.cs", "v1")]);
    git.add_tag("v1.0.0");

    let start = run(
        &git,
        WorkflowCommand::ReleaseVersion,
        paused(),
        vec![Answer::Choice(v("1.0.2"))],
    );
    assert_eq!(
        start.result.unwrap(),
        Outcome::Paused {
            branch: "release/v1.0.1".to_string(),
            version: v("1.0.1")
        }
    );
    git.commit("Urgent fix", &[("src/app.cs", "v1 urgent")]);

    let close = run(
        &git,
        WorkflowCommand::CloseVersion,
        ReleaseOptions::default(),
        Vec::new(),
    );
    close.result.unwrap();

    assert_eq!(git.tag_target("v1.0.1"), git.branch_head("master"));
    assert_eq!(
        git.file_at("master", "src/app.cs").as_deref(),
        Some("v1 urgent")
    );
    assert!(!git.branches().iter().any(|b| b.starts_with("hotfix/")));
    assert_eq!(git.pushes(), vec![pushed("origin", "master", Some("v1.0.1"))]);
}
