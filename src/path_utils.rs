/// Normalize a path string to forward-slash separators.
#[must_use]
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

fn components(path: &str) -> impl DoubleEndedIterator<Item = &str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty() && *s != ".")
}

/// Check if `path` ends with all components of `suffix`.
///
/// Both sides accept `/` and `\\` separators. The match is per component, so
/// `"com/example/Foo.java"` matches `"src/main/java/com/example/Foo.java"` but
/// not `"src/main/java/com/myexample/Foo.java"`.
#[must_use]
pub fn path_ends_with(path: &str, suffix: &str) -> bool {
    let suffix_count = components(suffix).count();
    if suffix_count == 0 || suffix_count > components(path).count() {
        return false;
    }

    components(path)
        .rev()
        .zip(components(suffix).rev())
        .all(|(path_comp, suffix_comp)| path_comp == suffix_comp)
}
