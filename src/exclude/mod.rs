use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use indexmap::IndexSet;

use crate::coverage::class_file_path;
use crate::error::{DeltaCoverageError, Result};

/// Compile one exclusion pattern.
///
/// `*` stays within one path segment, `**` spans directories.
///
/// # Errors
/// Returns `InvalidPattern` if the glob cannot be compiled.
pub fn compile_pattern(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| DeltaCoverageError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })
}

/// Decides which classes are dropped from delta coverage.
///
/// Patterns are matched against the compiled class file path, e.g.
/// `com/example/Outer$Inner.class`. The nested-class separator is kept
/// literally, so `**/Outer$Inner.*` excludes only the nested class and
/// `**/Outer.*` only the outer one.
#[derive(Debug, Clone)]
pub struct ClassExclusionFilter {
    patterns: IndexSet<String>,
    matcher: GlobSet,
    invalid: Vec<String>,
}

impl Default for ClassExclusionFilter {
    fn default() -> Self {
        Self {
            patterns: IndexSet::new(),
            matcher: GlobSet::empty(),
            invalid: Vec::new(),
        }
    }
}

impl ClassExclusionFilter {
    /// Build a filter; invalid patterns are logged and never match.
    #[must_use]
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut accepted = IndexSet::new();
        let mut invalid = Vec::new();

        for pattern in patterns.iter().map(AsRef::as_ref) {
            if accepted.contains(pattern) {
                continue;
            }
            match compile_pattern(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                    accepted.insert(pattern.to_string());
                }
                Err(e) => {
                    tracing::warn!(pattern, error = %e, "ignoring invalid exclusion pattern");
                    invalid.push(pattern.to_string());
                }
            }
        }

        let matcher = builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to combine exclusion patterns; excluding nothing");
            GlobSet::empty()
        });

        Self {
            patterns: accepted,
            matcher,
            invalid,
        }
    }

    /// Build a filter, failing on the first invalid pattern.
    ///
    /// # Errors
    /// Returns `InvalidPattern` for the first pattern that does not compile.
    pub fn strict<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            compile_pattern(pattern.as_ref())?;
        }
        Ok(Self::new(patterns))
    }

    /// Whether the class matches any pattern. Unparseable names match nothing.
    #[must_use]
    pub fn is_excluded(&self, class_name: &str) -> bool {
        if self.matcher.is_empty() {
            return false;
        }
        class_file_path(class_name).is_ok_and(|path| self.matcher.is_match(path))
    }

    /// Valid patterns, in first-seen order without duplicates.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    #[must_use]
    pub fn invalid_patterns(&self) -> &[String] {
        &self.invalid
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
