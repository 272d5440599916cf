//! Relative path and import specifier helpers.

use std::path::{Component, Path, PathBuf};

use path_clean::clean;

/// Path of `to` relative to the directory `from_dir`.
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from = clean(from_dir);
    let to = clean(to);
    let from: Vec<Component<'_>> = from.components().filter(|c| *c != Component::CurDir).collect();
    let to: Vec<Component<'_>> = to.components().filter(|c| *c != Component::CurDir).collect();

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &to[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// Render a path with forward slashes.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Specifier for importing `to_file` from `from_file`: relative, forward
/// slashes, `./` prefixed unless it climbs out of the directory.
pub fn import_specifier(from_file: &Path, to_file: &Path) -> String {
    let dir = from_file.parent().unwrap_or_else(|| Path::new(""));
    let relative = to_slash(&relative_path(dir, to_file));
    if relative.starts_with("../") {
        relative
    } else {
        format!("./{relative}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_specifier() {
        assert_eq!(
            import_specifier(Path::new("/src/index.js"), Path::new("/src/a.js")),
            "./a.js"
        );
    }

    #[test]
    fn test_nested_and_parent_specifiers() {
        assert_eq!(
            import_specifier(Path::new("/src/index.js"), Path::new("/src/lib/b.js")),
            "./lib/b.js"
        );
        assert_eq!(
            import_specifier(Path::new("/src/app/main.js"), Path::new("/src/lib/b.js")),
            "../lib/b.js"
        );
    }

    #[test]
    fn test_relative_path_cleans_input() {
        assert_eq!(
            relative_path(Path::new("/root/./base/"), Path::new("/root/base/x/../y.js")),
            PathBuf::from("y.js")
        );
    }
}
