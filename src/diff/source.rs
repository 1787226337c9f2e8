use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::{DeltaCoverageError, Result};

use super::DiffIndex;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where the unified diff comes from.
pub trait DiffSource {
    /// Human-readable origin, used in logs and reports.
    fn describe(&self) -> String;

    /// Fetch the raw unified diff text.
    ///
    /// # Errors
    /// Returns an error if the diff cannot be obtained.
    fn read_diff(&self) -> Result<String>;

    /// Fetch and parse the diff.
    ///
    /// # Errors
    /// Returns an error if the diff cannot be obtained or is not a unified diff.
    fn load_index(&self) -> Result<DiffIndex> {
        let text = self.read_diff()?;
        tracing::info!(source = %self.describe(), bytes = text.len(), "diff loaded");
        DiffIndex::parse(&text)
    }
}

/// Diff stored in a file.
#[derive(Debug, Clone)]
pub struct FileDiffSource {
    path: PathBuf,
}

impl FileDiffSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DiffSource for FileDiffSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn read_diff(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|source| DeltaCoverageError::FileRead {
            path: self.path.clone(),
            source,
        })
    }
}

/// Diff of the working tree against a git reference.
///
/// The reference is resolved with gix; the line-level diff is produced by the
/// `git` executable in the repository's work tree.
pub struct GitDiffSource {
    repo_path: PathBuf,
    workdir: PathBuf,
    reference: String,
}

impl GitDiffSource {
    /// Locate the repository containing `path`.
    ///
    /// # Errors
    /// Returns an error if no git repository with a work tree is found.
    pub fn discover(path: &Path, reference: impl Into<String>) -> Result<Self> {
        let repo = gix::discover(path).map_err(|e| {
            DeltaCoverageError::Git(format!("Failed to discover git repository: {e}"))
        })?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| DeltaCoverageError::Git("Repository has no working directory".into()))?
            .to_path_buf();
        Ok(Self {
            repo_path: repo.path().to_path_buf(),
            workdir,
            reference: reference.into(),
        })
    }

    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Resolve the configured reference to a commit id.
    ///
    /// # Errors
    /// Returns an error if the reference does not name a commit.
    pub fn resolve_commit(&self) -> Result<String> {
        let repo = gix::open(&self.repo_path)
            .map_err(|e| DeltaCoverageError::Git(format!("Failed to open git repository: {e}")))?;
        let reference = &self.reference;
        let commit = repo
            .rev_parse_single(reference.as_str())
            .map_err(|e| {
                DeltaCoverageError::Git(format!("Failed to parse reference '{reference}': {e}"))
            })?
            .object()
            .map_err(|e| {
                DeltaCoverageError::Git(format!("Failed to get object for '{reference}': {e}"))
            })?
            .peel_to_commit()
            .map_err(|e| {
                DeltaCoverageError::Git(format!("Failed to peel to commit '{reference}': {e}"))
            })?;
        Ok(commit.id().to_string())
    }
}

impl DiffSource for GitDiffSource {
    fn describe(&self) -> String {
        format!("git diff against {}", self.reference)
    }

    fn read_diff(&self) -> Result<String> {
        let commit = self.resolve_commit()?;
        tracing::debug!(reference = %self.reference, %commit, "resolved diff base");

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.workdir)
            .args(["diff", "--no-color", "--no-ext-diff", "--unified=0", &commit])
            .output()
            .map_err(|e| DeltaCoverageError::Git(format!("Failed to run git diff: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeltaCoverageError::Git(format!(
                "git diff failed: {}",
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// HTTP client abstraction for dependency injection.
pub trait HttpClient {
    /// Perform a GET request and return the response body.
    ///
    /// # Errors
    /// Returns an error on connection failure or a non-success status.
    fn get(&self, url: &str) -> Result<String>;
}

/// Production HTTP client using reqwest.
#[derive(Debug, Default)]
pub struct ReqwestClient;

#[cfg(not(tarpaulin_include))]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                DeltaCoverageError::DiffFetch(format!("Failed to create HTTP client: {e}"))
            })?;

        let response = client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                DeltaCoverageError::DiffFetch(format!("Request timeout fetching {url}"))
            } else if e.is_connect() {
                DeltaCoverageError::DiffFetch(format!("Failed to connect to {url}"))
            } else {
                DeltaCoverageError::DiffFetch(format!("Failed to fetch {url}: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeltaCoverageError::DiffFetch(format!(
                "Failed to fetch {url}: HTTP {status}"
            )));
        }

        response.text().map_err(|e| {
            DeltaCoverageError::DiffFetch(format!("Failed to read response from {url}: {e}"))
        })
    }
}

/// Check if a string is a remote URL (http:// or https://).
#[must_use]
pub fn is_remote_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Diff downloaded over HTTP(S).
pub struct UrlDiffSource<C: HttpClient = ReqwestClient> {
    url: String,
    client: C,
}

impl UrlDiffSource<ReqwestClient> {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, ReqwestClient)
    }
}

impl<C: HttpClient> UrlDiffSource<C> {
    #[must_use]
    pub fn with_client(url: impl Into<String>, client: C) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl<C: HttpClient> DiffSource for UrlDiffSource<C> {
    fn describe(&self) -> String {
        format!("url {}", self.url)
    }

    fn read_diff(&self) -> Result<String> {
        if !is_remote_url(&self.url) {
            return Err(DeltaCoverageError::DiffFetch(format!(
                "Not an http(s) URL: {}",
                self.url
            )));
        }
        self.client.get(&self.url)
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
