use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;

use tempfile::TempDir;

use super::*;

const SIMPLE_DIFF: &str = "\
--- a/src/Foo.java
+++ b/src/Foo.java
@@ -1 +1,2 @@
 a
+b
";

struct MockClient {
    body: std::result::Result<String, String>,
    requested: RefCell<Vec<String>>,
}

impl MockClient {
    fn ok(body: &str) -> Self {
        Self {
            body: Ok(body.to_string()),
            requested: RefCell::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            body: Err(message.to_string()),
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl HttpClient for MockClient {
    fn get(&self, url: &str) -> Result<String> {
        self.requested.borrow_mut().push(url.to_string());
        self.body
            .clone()
            .map_err(DeltaCoverageError::DiffFetch)
    }
}

#[test]
fn file_source_reads_and_parses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("changes.diff");
    fs::write(&path, SIMPLE_DIFF).unwrap();

    let source = FileDiffSource::new(&path);
    let index = source.load_index().unwrap();

    assert_eq!(index.changed_lines("src/Foo.java"), BTreeSet::from([2]));
    assert!(source.describe().contains("changes.diff"));
}

#[test]
fn file_source_missing_file() {
    let source = FileDiffSource::new("/definitely/missing.diff");
    let err = source.read_diff().unwrap_err();
    assert!(matches!(err, DeltaCoverageError::FileRead { .. }));
}

#[test]
fn file_source_with_garbage_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.diff");
    fs::write(&path, "definitely not a diff").unwrap();

    let err = FileDiffSource::new(&path).load_index().unwrap_err();
    assert!(matches!(err, DeltaCoverageError::DiffParse { .. }));
}

#[test]
fn url_source_uses_client() {
    let source =
        UrlDiffSource::with_client("https://example.com/pr.diff", MockClient::ok(SIMPLE_DIFF));

    let index = source.load_index().unwrap();

    assert_eq!(index.file_count(), 1);
    assert_eq!(
        source.client.requested.borrow().as_slice(),
        ["https://example.com/pr.diff".to_string()]
    );
}

#[test]
fn url_source_propagates_client_error() {
    let source =
        UrlDiffSource::with_client("https://example.com/pr.diff", MockClient::failing("HTTP 404"));
    let err = source.read_diff().unwrap_err();
    assert!(matches!(err, DeltaCoverageError::DiffFetch(_)));
}

#[test]
fn url_source_rejects_non_http_url() {
    let source = UrlDiffSource::with_client("ftp://example.com/pr.diff", MockClient::ok(""));
    assert!(source.read_diff().is_err());
    assert!(source.client.requested.borrow().is_empty());
}

#[test]
fn remote_url_detection() {
    assert!(is_remote_url("https://example.com/a.diff"));
    assert!(is_remote_url("http://example.com/a.diff"));
    assert!(!is_remote_url("changes.diff"));
}

#[test]
fn git_source_outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    // A fresh temp dir may still live inside a repository; only assert when it does not.
    if gix::discover(dir.path()).is_err() {
        assert!(GitDiffSource::discover(dir.path(), "HEAD").is_err());
    }
}

fn git(dir: &Path, args: &[&str]) {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
}

#[test]
fn git_source_diffs_working_tree_against_reference() {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init"]);
    git(dir.path(), &["config", "user.email", "test@test.com"]);
    git(dir.path(), &["config", "user.name", "Test User"]);
    fs::write(dir.path().join("Foo.java"), "a\n").unwrap();
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-m", "initial"]);
    fs::write(dir.path().join("Foo.java"), "a\nb\nc\n").unwrap();

    let source = GitDiffSource::discover(dir.path(), "HEAD").unwrap();
    let index = source.load_index().unwrap();

    assert_eq!(index.changed_lines("Foo.java"), BTreeSet::from([2, 3]));
}

#[test]
fn git_source_unknown_reference_fails() {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init"]);

    let source = GitDiffSource::discover(dir.path(), "no-such-branch").unwrap();
    assert!(matches!(
        source.read_diff(),
        Err(DeltaCoverageError::Git(_))
    ));
}
