//! Source discovery under the configured roots.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::error::Result;

const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "ts"];

/// A scanned file and the root it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub root: PathBuf,
}

impl SourceFile {
    /// Path below the root; a file root maps to its file name.
    pub fn relative(&self) -> PathBuf {
        if self.root == self.path {
            return self.path.file_name().map(PathBuf::from).unwrap_or_default();
        }
        self.path
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| self.path.clone())
    }
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Walk `roots` in order and collect source files, skipping `exclude` globs,
/// hidden entries and gitignored paths. A file reached from two roots is
/// kept under the first.
pub fn scan(roots: &[PathBuf], exclude: &[String]) -> Result<Vec<SourceFile>> {
    let mut seen = FxHashSet::default();
    let mut files = Vec::new();

    for root in roots {
        let overrides = exclude_overrides(root, exclude)?;
        if root.is_file() {
            if is_source_file(root) && seen.insert(root.clone()) {
                files.push(SourceFile {
                    path: root.clone(),
                    root: root.clone(),
                });
            }
            continue;
        }

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .overrides(overrides)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker.flatten() {
            let path = entry.path();
            if !entry.file_type().is_some_and(|ty| ty.is_file()) || !is_source_file(path) {
                continue;
            }
            if seen.insert(path.to_path_buf()) {
                trace!(path = %path.display(), "found source");
                files.push(SourceFile {
                    path: path.to_path_buf(),
                    root: root.clone(),
                });
            }
        }
    }

    debug!(count = files.len(), roots = roots.len(), "scanned sources");
    Ok(files)
}

/// Matcher for paths under `root` that should be skipped.
pub fn exclude_overrides(root: &Path, exclude: &[String]) -> Result<Override> {
    let mut builder = OverrideBuilder::new(root);
    for pattern in exclude {
        builder.add(&format!("!{pattern}"))?;
    }
    Ok(builder.build()?)
}

/// True when `path` under `root` matches an exclude glob.
pub fn is_excluded(overrides: &Override, path: &Path) -> bool {
    overrides.matched(path, false).is_ignore()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_scan_filters_extensions_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.js");
        write(dir.path(), "a/z.ts");
        write(dir.path(), "a/y.mjs");
        write(dir.path(), "styles.css");
        write(dir.path(), ".hidden/x.js");

        let files = scan(&[dir.path().to_path_buf()], &[]).unwrap();
        let relative: Vec<_> = files.iter().map(SourceFile::relative).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a/y.mjs"),
                PathBuf::from("a/z.ts"),
                PathBuf::from("b.js")
            ]
        );
    }

    #[test]
    fn test_scan_applies_excludes() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "lib/a.js");
        write(dir.path(), "lib/a_test.js");
        write(dir.path(), "vendor/v.js");

        let files = scan(
            &[dir.path().to_path_buf()],
            &["**/*_test.js".to_string(), "vendor/**".to_string()],
        )
        .unwrap();
        let relative: Vec<_> = files.iter().map(SourceFile::relative).collect();
        assert_eq!(relative, vec![PathBuf::from("lib/a.js")]);
    }

    #[test]
    fn test_file_root_and_duplicates() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/a.js");
        let file = dir.path().join("src/a.js");

        let files = scan(&[file.clone(), dir.path().join("src")], &[]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].root, file);
        assert_eq!(files[0].relative(), PathBuf::from("a.js"));
    }

    #[test]
    fn test_is_excluded() {
        let overrides = exclude_overrides(Path::new("/p"), &["*.gen.js".to_string()]).unwrap();
        assert!(is_excluded(&overrides, Path::new("/p/x/a.gen.js")));
        assert!(!is_excluded(&overrides, Path::new("/p/x/a.js")));
    }
}
