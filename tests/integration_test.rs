// tests/integration_test.rs
use git2::{Commit, Oid, Repository};
use semver_git_tag::config::Overrides;
use semver_git_tag::logger::RecordingLogger;
use semver_git_tag::project::DISTRIBUTION_PROPERTY;
use semver_git_tag::{Project, ResolvedVersion, SemverGitTag, SemverGitTagError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Helper function to setup a temporary git repo for testing
fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    (temp_dir, repo)
}

fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> Oid {
    let workdir = repo.workdir().expect("Repository has a working tree");
    fs::write(workdir.join(name), content).expect("Could not write file");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new(name))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get sig");

    let parents: Vec<Commit> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&Commit> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .expect("Could not create commit")
}

fn tag(repo: &Repository, name: &str, commit: Oid) {
    repo.tag_lightweight(name, &repo.find_object(commit, None).unwrap(), false)
        .expect("Could not create tag");
}

// Settings live outside the repository so they never make the tree dirty
fn plugin(overrides: Overrides) -> (SemverGitTag, TempDir) {
    let settings_dir = TempDir::new().unwrap();
    let settings = settings_dir.path().join("semver-git-tag.toml");
    fs::write(&settings, "").unwrap();
    (
        SemverGitTag::new(overrides).settings_file(settings),
        settings_dir,
    )
}

fn resolve(
    dir: &Path,
    overrides: Overrides,
) -> (semver_git_tag::Result<Option<ResolvedVersion>>, Project) {
    let (mut plugin, _settings) = plugin(overrides);
    let mut project = Project::new("demo", dir);
    let result = plugin.on_load(&mut project, &RecordingLogger::new());
    (result, project)
}

#[test]
fn test_release_version_on_tagged_head() {
    let (temp_dir, repo) = setup_test_repo();
    let first = commit_file(&repo, "README.md", "Initial content\n", "Initial commit");
    tag(&repo, "1.2.3", first);
    tag(&repo, "not_semver", first);

    let (result, project) = resolve(temp_dir.path(), Overrides::new());

    assert_eq!(result.unwrap(), Some(ResolvedVersion::release("1.2.3")));
    assert_eq!(project.version(), Some("1.2.3"));
    assert_eq!(
        project.get_property(DISTRIBUTION_PROPERTY).map(PathBuf::from),
        Some(temp_dir.path().join("target/dist/demo-1.2.3"))
    );
}

#[test]
fn test_development_version_after_new_commit() {
    let (temp_dir, repo) = setup_test_repo();
    let first = commit_file(&repo, "README.md", "Initial content\n", "Initial commit");
    tag(&repo, "1.2.3", first);
    commit_file(&repo, "README.md", "Updated content\n", "feat: add new feature");

    let (result, project) = resolve(
        temp_dir.path(),
        Overrides::from_tokens(["increment_part=minor"]),
    );

    assert_eq!(result.unwrap(), Some(ResolvedVersion::development("1.3.0.dev")));
    assert_eq!(project.version(), Some("1.3.0.dev"));
}

#[test]
fn test_dirty_tree_with_prefixed_tags() {
    let (temp_dir, repo) = setup_test_repo();
    let first = commit_file(&repo, "README.md", "one\n", "Initial commit");
    tag(&repo, "v1.0.0", first);
    let second = commit_file(&repo, "README.md", "two\n", "Second commit");
    tag(&repo, "v1.0.1", second);
    fs::write(temp_dir.path().join("README.md"), "uncommitted\n").unwrap();

    let (result, _) = resolve(
        temp_dir.path(),
        Overrides::from_tokens(["version_prefix=v", "increment_part=patch"]),
    );

    assert_eq!(result.unwrap(), Some(ResolvedVersion::development("1.0.2.dev")));
}

#[test]
fn test_no_semver_tags_leaves_version_unset() {
    let (temp_dir, repo) = setup_test_repo();
    let first = commit_file(&repo, "README.md", "one\n", "Initial commit");
    tag(&repo, "latest", first);

    let (mut plugin, _settings) = plugin(Overrides::new());
    let mut project = Project::new("demo", temp_dir.path());
    let logger = RecordingLogger::new();

    assert_eq!(plugin.on_load(&mut project, &logger).unwrap(), None);
    assert_eq!(project.version(), None);
    assert_eq!(logger.warnings().len(), 1);
}

#[test]
fn test_repository_dir_points_at_parent() {
    let (temp_dir, repo) = setup_test_repo();
    fs::create_dir(temp_dir.path().join("module")).unwrap();
    let first = commit_file(&repo, "README.md", "one\n", "Initial commit");
    tag(&repo, "0.4.0", first);

    let module_dir = temp_dir.path().join("module");
    let (result, _) = resolve(&module_dir, Overrides::new());
    assert!(matches!(
        result,
        Err(SemverGitTagError::RepositoryNotFound { .. })
    ));

    let (result, _) = resolve(
        &module_dir,
        Overrides::from_tokens(["repository_dir=.."]),
    );
    assert_eq!(result.unwrap(), Some(ResolvedVersion::release("0.4.0")));
}

#[test]
fn test_changelog_updated_for_release() {
    let (temp_dir, repo) = setup_test_repo();
    let first = commit_file(&repo, "CHANGELOG.md", "# 1.0.0\n", "Release 1.0.0");
    tag(&repo, "1.0.0", first);
    commit_file(&repo, "src.txt", "code\n", "Work");
    let release = commit_file(&repo, "CHANGELOG.md", "# 1.1.0\n# 1.0.0\n", "Release 1.1.0");
    tag(&repo, "1.1.0", release);

    let (result, _) = resolve(
        temp_dir.path(),
        Overrides::from_tokens(["changelog_path=CHANGELOG.md"]),
    );

    assert_eq!(result.unwrap(), Some(ResolvedVersion::release("1.1.0")));
}

#[test]
fn test_changelog_not_updated_for_release() {
    let (temp_dir, repo) = setup_test_repo();
    let first = commit_file(&repo, "CHANGELOG.md", "# 1.0.0\n", "Release 1.0.0");
    tag(&repo, "1.0.0", first);
    let release = commit_file(&repo, "src.txt", "code\n", "Work");
    tag(&repo, "1.1.0", release);

    let (result, project) = resolve(
        temp_dir.path(),
        Overrides::from_tokens(["changelog_path=CHANGELOG.md"]),
    );

    match result {
        Err(SemverGitTagError::ChangelogNotUpdated {
            previous, release, ..
        }) => {
            assert_eq!(previous, "1.0.0");
            assert_eq!(release, "1.1.0");
        }
        other => panic!("Expected ChangelogNotUpdated, got {:?}", other),
    }
    assert_eq!(project.version(), None);
}

#[test]
fn test_absolute_changelog_with_parent_repository_dir() {
    let (temp_dir, repo) = setup_test_repo();
    fs::create_dir(temp_dir.path().join("module")).unwrap();
    let first = commit_file(&repo, "CHANGELOG.md", "# 1.0.0\n", "Release 1.0.0");
    tag(&repo, "1.0.0", first);
    let release = commit_file(&repo, "CHANGELOG.md", "# 1.1.0\n# 1.0.0\n", "Release 1.1.0");
    tag(&repo, "1.1.0", release);

    let changelog = temp_dir.path().join("CHANGELOG.md");
    let (result, _) = resolve(
        &temp_dir.path().join("module"),
        Overrides::from_tokens([
            "repository_dir=..".to_string(),
            format!("changelog_path={}", changelog.display()),
        ]),
    );

    assert_eq!(result.unwrap(), Some(ResolvedVersion::release("1.1.0")));
}

#[test]
fn test_first_release_requires_changelog() {
    let (temp_dir, repo) = setup_test_repo();
    let first = commit_file(&repo, "README.md", "one\n", "Initial commit");
    tag(&repo, "1.0.0", first);

    let (result, _) = resolve(
        temp_dir.path(),
        Overrides::from_tokens(["changelog_path=CHANGELOG.md"]),
    );
    assert!(matches!(
        result,
        Err(SemverGitTagError::ChangelogNotUpdated { .. })
    ));

    let release = commit_file(&repo, "CHANGELOG.md", "# 1.0.1\n", "Add changelog");
    tag(&repo, "1.0.1", release);
    let (result, _) = resolve(
        temp_dir.path(),
        Overrides::from_tokens(["changelog_path=CHANGELOG.md"]),
    );
    assert_eq!(result.unwrap(), Some(ResolvedVersion::release("1.0.1")));
}

#[test]
fn test_reconfiguration_before_prepare() {
    let (temp_dir, repo) = setup_test_repo();
    let first = commit_file(&repo, "README.md", "one\n", "Initial commit");
    tag(&repo, "2.1.0", first);
    commit_file(&repo, "README.md", "two\n", "Next");

    let (mut plugin, _settings) = plugin(Overrides::new());
    let mut project = Project::new("demo", temp_dir.path());
    let logger = RecordingLogger::new();

    plugin.on_load(&mut project, &logger).unwrap();
    assert_eq!(project.version(), Some("2.1.1.dev"));

    project.set_property("increment_part", "major");
    let resolved = plugin.before_prepare(&mut project, &logger).unwrap();

    assert_eq!(resolved, Some(ResolvedVersion::development("3.0.0.dev")));
    assert_eq!(
        project.get_property(DISTRIBUTION_PROPERTY).map(PathBuf::from),
        Some(temp_dir.path().join("target/dist/demo-3.0.0.dev"))
    );
    assert_eq!(logger.warnings().len(), 1);
}
