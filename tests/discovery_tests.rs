mod repo;

use taskgen::discovery::{enumerate_changes, Classifier};
use taskgen::git::GitRunner;

use repo::TestRepo;

#[tokio::test]
async fn empty_tree_enumerates_nothing() {
    let repo = TestRepo::init();
    repo.commit_file("a.ts", "const a = 1;\n");

    let git = GitRunner::new(&repo.root);
    let paths = enumerate_changes(&git, &repo.root).await.unwrap();

    assert!(paths.is_empty());
}

#[tokio::test]
async fn modified_then_untracked_order() {
    let repo = TestRepo::init();
    repo.commit_file("a.ts", "const a = 1;\n");
    repo.write_file("a.ts", "const a = 2;\n");
    repo.write_file("b.ts", "const b = 1;\n");

    let git = GitRunner::new(&repo.root);
    let paths = enumerate_changes(&git, &repo.root).await.unwrap();

    assert_eq!(
        paths,
        vec![
            repo.root.join("a.ts").display().to_string(),
            repo.root.join("b.ts").display().to_string(),
        ]
    );

    let classifier = Classifier::new(&git);
    assert!(!classifier.is_untracked(&paths[0]).await);
    assert!(classifier.is_untracked(&paths[1]).await);
}

#[tokio::test]
async fn lockfiles_never_enumerate() {
    let repo = TestRepo::init();
    repo.commit_file("pnpm-lock.yaml", "lockfileVersion: 9\n");
    repo.write_file("pnpm-lock.yaml", "lockfileVersion: 10\n");
    repo.write_file("package-lock.json", "{}\n");
    repo.write_file("bun.lockb", "binary\n");

    let git = GitRunner::new(&repo.root);
    let paths = enumerate_changes(&git, &repo.root).await.unwrap();

    assert!(paths.is_empty());
}

#[tokio::test]
async fn lockfile_filter_matches_bare_name_in_subdirs() {
    let repo = TestRepo::init();
    repo.write_file("pkg/sub/package-lock.json", "{}\n");
    repo.write_file("pkg/sub/index.ts", "export {};\n");

    let git = GitRunner::new(&repo.root);
    let paths = enumerate_changes(&git, &repo.root).await.unwrap();

    assert_eq!(
        paths,
        vec![repo.root.join("pkg/sub/index.ts").display().to_string()]
    );
}

#[tokio::test]
async fn enumeration_is_idempotent_on_an_unchanged_tree() {
    let repo = TestRepo::init();
    repo.commit_file("a.ts", "const a = 1;\n");
    repo.write_file("a.ts", "const a = 2;\n");
    repo.write_file("b.ts", "const b = 1;\n");

    let git = GitRunner::new(&repo.root);
    let first = enumerate_changes(&git, &repo.root).await.unwrap();
    let second = enumerate_changes(&git, &repo.root).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn staged_file_is_not_reclassified_as_untracked() {
    let repo = TestRepo::init();
    repo.write_file("fresh.ts", "export {};\n");

    let git = GitRunner::new(&repo.root);
    let classifier = Classifier::new(&git);
    let path = repo.root.join("fresh.ts").display().to_string();

    assert!(classifier.is_untracked(&path).await);

    repo.git(&["add", "fresh.ts"]);
    assert!(!classifier.is_untracked(&path).await);
}

#[tokio::test]
async fn classifier_fails_soft_outside_a_repo() {
    let dir = tempfile::tempdir().unwrap();
    let git = GitRunner::new(dir.path());
    let classifier = Classifier::new(&git);

    // ls-files fails outside a work tree; the safe default is "modified".
    assert!(!classifier.is_untracked("orphan.ts").await);
}

#[tokio::test]
async fn enumeration_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let git = GitRunner::new(dir.path());

    let err = enumerate_changes(&git, dir.path()).await.unwrap_err();
    assert!(matches!(err, taskgen::TaskgenError::Enumeration(_)));
}
