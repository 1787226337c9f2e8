use crate::{DeltaCoverageError, Result};

/// A compiled class and the source file it was compiled from.
///
/// The class name may use `/` (JVM internal form, e.g. `com/example/Foo$Bar`)
/// or `.` (e.g. `com.example.Foo$Bar`) as the package separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassFile {
    class_name: String,
    source_file_name: String,
}

impl ClassFile {
    #[must_use]
    pub fn new(class_name: impl Into<String>, source_file_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            source_file_name: source_file_name.into(),
        }
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn source_file_name(&self) -> &str {
        &self.source_file_name
    }

    /// Relative source path: package directory plus the source file name.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the class name or source file name is empty.
    pub fn path(&self) -> Result<String> {
        resolve_source_path(&self.class_name, &self.source_file_name)
    }

    /// Path of the compiled class file, e.g. `com/example/Foo$Bar.class`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the class name is empty.
    pub fn class_file_path(&self) -> Result<String> {
        class_file_path(&self.class_name)
    }
}

/// Split a qualified class name into its package segments and simple name.
fn split_qualified(class_name: &str) -> Result<(Vec<&str>, &str)> {
    let trimmed = class_name.trim();
    if trimmed.is_empty() {
        return Err(DeltaCoverageError::InvalidArgument(
            "class name must not be empty".to_string(),
        ));
    }

    let mut segments: Vec<&str> = if trimmed.contains(['/', '\\']) {
        trimmed.split(['/', '\\']).collect()
    } else {
        trimmed.split('.').collect()
    };
    segments.retain(|s| !s.is_empty());

    let simple = segments.pop().ok_or_else(|| {
        DeltaCoverageError::InvalidArgument(format!("class name has no segments: '{class_name}'"))
    })?;
    Ok((segments, simple))
}

/// Derive `package/path/SourceFile.ext` from a class name and its source file name.
///
/// A class without a package resolves to the bare source file name.
///
/// # Errors
/// Returns `InvalidArgument` if either argument is empty.
pub fn resolve_source_path(class_name: &str, source_file_name: &str) -> Result<String> {
    if source_file_name.trim().is_empty() {
        return Err(DeltaCoverageError::InvalidArgument(format!(
            "source file name must not be empty for class '{class_name}'"
        )));
    }
    let (package, _) = split_qualified(class_name)?;
    if package.is_empty() {
        return Ok(source_file_name.to_string());
    }
    Ok(format!("{}/{source_file_name}", package.join("/")))
}

/// Derive the compiled class file path used for exclusion matching.
///
/// # Errors
/// Returns `InvalidArgument` if the class name is empty.
pub fn class_file_path(class_name: &str) -> Result<String> {
    let (mut package, simple) = split_qualified(class_name)?;
    let file_name = format!("{simple}.class");
    package.push(&file_name);
    Ok(package.join("/"))
}

#[cfg(test)]
#[path = "class_file_tests.rs"]
mod tests;
