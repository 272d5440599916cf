//! Scanned sources loaded into a module graph, plus output emission.
//!
//! A [`Project`] survives across watch iterations: file changes go through
//! [`Project::refresh`] and [`Project::forget`], which update the graph in
//! place and reuse unchanged parses.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use clove_config::CloveConfig;
use clove_graph::{Diagnostic, DiagnosticKind, ModuleGraph, ParseCache, Severity};
use clove_graph::paths::{relative_path, to_slash};
use clove_transform::{TransformConfig, TransformOutput, transform};

use crate::config::transform_config;
use crate::error::{CliError, Result, ResultExt};
use crate::scan::{SourceFile, exclude_overrides, is_excluded, is_source_file, scan};

/// One converted file ready to be written.
#[derive(Debug)]
pub struct Emitted {
    pub source: SourceFile,
    pub out_path: PathBuf,
    pub output: TransformOutput,
}

/// Counts for the build summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub files: usize,
    pub changed: usize,
    pub maps: usize,
}

pub struct Project {
    config: CloveConfig,
    transform: TransformConfig,
    graph: ModuleGraph,
    cache: ParseCache,
    files: IndexMap<PathBuf, SourceFile>,
}

impl Project {
    pub fn new(config: CloveConfig) -> Self {
        let transform = transform_config(&config);
        Self {
            config,
            transform,
            graph: ModuleGraph::new(),
            cache: ParseCache::new(),
            files: IndexMap::new(),
        }
    }

    /// Scan the roots and register every source.
    pub async fn load(config: CloveConfig) -> Result<Self> {
        let mut project = Self::new(config);
        let files = scan(&project.config.roots, &project.config.exclude)?;
        if files.is_empty() {
            return Err(CliError::NoSources {
                roots: project.config.roots.clone(),
            });
        }
        for file in files {
            project.register(file).await?;
        }
        info!(files = project.files.len(), "loaded sources");
        Ok(project)
    }

    pub fn config(&self) -> &CloveConfig {
        &self.config
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn source(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(path)
    }

    /// Re-read `path` after a change. Returns `false` when the path is not a
    /// source under any root or is excluded.
    pub async fn refresh(&mut self, path: &Path) -> Result<bool> {
        let file = match self.files.get(path) {
            Some(file) => file.clone(),
            None => match self.classify(path)? {
                Some(file) => file,
                None => return Ok(false),
            },
        };

        match tokio::fs::read_to_string(path).await {
            Ok(source) => {
                self.update(file, &source);
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(self.forget(path)),
            Err(err) => Err(CliError::io(path, err)),
        }
    }

    /// Drop a deleted file from the graph.
    pub fn forget(&mut self, path: &Path) -> bool {
        self.cache.invalidate(path);
        let known = self.files.shift_remove(path).is_some();
        if self.graph.remove(path).is_some() {
            debug!(path = %path.display(), "removed source");
        }
        known
    }

    /// Parse and graph diagnostics. With `allow_missing`, missing namespaces
    /// are downgraded to warnings.
    pub fn diagnostics(&self, allow_missing: bool) -> Vec<Diagnostic> {
        let mut diagnostics = self.graph.diagnostics();
        if allow_missing {
            for diagnostic in &mut diagnostics {
                if diagnostic.kind == DiagnosticKind::MissingDependency {
                    diagnostic.severity = Severity::Warning;
                }
            }
        }
        diagnostics
    }

    /// Where `file` is written below the output directory.
    pub fn output_path(&self, file: &SourceFile) -> PathBuf {
        self.config.out_dir.join(file.relative())
    }

    /// Transform every source in dependency order. Import specifiers point
    /// between output locations, since several roots share one `out_dir`.
    pub fn transform_all(&self) -> Result<Vec<Emitted>> {
        let order = self.graph.compute_order()?;
        let config = self.transform.clone().with_output_paths(
            self.files
                .values()
                .map(|file| (file.path.clone(), self.output_path(file))),
        );

        let mut emitted = Vec::with_capacity(order.len());
        for record in order {
            let Some(source) = self.files.get(&record.request) else {
                continue;
            };
            let output = transform(record, &self.graph, &config)?;
            emitted.push(Emitted {
                out_path: self.output_path(source),
                source: source.clone(),
                output,
            });
        }
        Ok(emitted)
    }

    /// Write converted files, and `.map` files when enabled.
    pub async fn write(&self, emitted: &[Emitted]) -> Result<WriteSummary> {
        let mut summary = WriteSummary::default();
        for item in emitted {
            if let Some(parent) = item.out_path.parent() {
                tokio::fs::create_dir_all(parent).await.with_path(parent)?;
            }

            let mut code = item.output.code.clone();
            if self.config.sourcemap {
                let map_path = map_path(&item.out_path);
                let dir = item.out_path.parent().unwrap_or_else(|| Path::new(""));
                let source_name = to_slash(&relative_path(dir, &item.source.path));
                let map = item.output.source_map(&source_name).to_json_string();
                tokio::fs::write(&map_path, map).await.with_path(&map_path)?;
                summary.maps += 1;

                if !code.is_empty() && !code.ends_with('\n') {
                    code.push('\n');
                }
                let map_name = map_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                code.push_str(&format!("//# sourceMappingURL={map_name}\n"));
            }

            tokio::fs::write(&item.out_path, code)
                .await
                .with_path(&item.out_path)?;
            summary.files += 1;
            if !item.output.is_unchanged() {
                summary.changed += 1;
            }
        }
        Ok(summary)
    }

    /// Render the `goog.addDependency` manifest relative to `base`.
    pub fn manifest(&self, base: &Path) -> Result<String> {
        Ok(clove_graph::render_manifest(&self.graph, base)?)
    }

    /// Write the manifest configured in `manifest`, if any. Paths are
    /// relative to `manifest_base`, or the manifest's own directory.
    pub async fn write_manifest(&self) -> Result<Option<PathBuf>> {
        let Some(path) = &self.config.manifest else {
            return Ok(None);
        };
        let base = self
            .config
            .manifest_base
            .clone()
            .or_else(|| path.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let manifest = self.manifest(&base)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.with_path(parent)?;
        }
        tokio::fs::write(path, manifest).await.with_path(path)?;
        Ok(Some(path.clone()))
    }

    async fn register(&mut self, file: SourceFile) -> Result<()> {
        let source = tokio::fs::read_to_string(&file.path)
            .await
            .with_path(&file.path)?;
        self.update(file, &source);
        Ok(())
    }

    fn update(&mut self, file: SourceFile, source: &str) {
        let record = self.cache.parse(&file.path, source);
        let duplicates = self.graph.add_or_update(record);
        debug!(
            path = %file.path.display(),
            duplicates = duplicates.len(),
            "registered source"
        );
        self.files.insert(file.path.clone(), file);
    }

    /// The root a new path belongs to, unless it is not a source or excluded.
    fn classify(&self, path: &Path) -> Result<Option<SourceFile>> {
        if !is_source_file(path) {
            return Ok(None);
        }
        for root in &self.config.roots {
            if root.as_path() == path {
                return Ok(Some(SourceFile {
                    path: path.to_path_buf(),
                    root: root.clone(),
                }));
            }
            if !path.starts_with(root) || root.is_file() {
                continue;
            }
            let overrides = exclude_overrides(root, &self.config.exclude)?;
            if is_excluded(&overrides, path) {
                return Ok(None);
            }
            return Ok(Some(SourceFile {
                path: path.to_path_buf(),
                root: root.clone(),
            }));
        }
        Ok(None)
    }
}

fn map_path(out_path: &Path) -> PathBuf {
    let mut name = out_path.as_os_str().to_os_string();
    name.push(".map");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project_in(dir: &TempDir) -> CloveConfig {
        CloveConfig {
            roots: vec![dir.path().join("src")],
            out_dir: dir.path().join("dist"),
            ..CloveConfig::default()
        }
    }

    fn write(dir: &TempDir, relative: &str, content: &str) -> PathBuf {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_and_transform_in_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/index.js", "const a = goog.require('a');\n");
        write(&dir, "src/lib/a.js", "goog.module('a');\nexports.x = 1;\n");

        let project = Project::load(project_in(&dir)).await.unwrap();
        let emitted = project.transform_all().unwrap();
        let outputs: Vec<_> = emitted.iter().map(|item| item.out_path.clone()).collect();
        assert_eq!(
            outputs,
            vec![dir.path().join("dist/lib/a.js"), dir.path().join("dist/index.js")]
        );
        assert_eq!(
            emitted[1].output.code,
            "import module$a from './lib/a.js';\nconst a = module$a;\n"
        );
    }

    #[tokio::test]
    async fn test_specifiers_point_between_outputs_of_several_roots() {
        let dir = TempDir::new().unwrap();
        write(&dir, "closure/goog/string.js", "goog.module('goog.string');\n");
        write(&dir, "src/index.js", "const str = goog.require('goog.string');\n");
        let config = CloveConfig {
            roots: vec![dir.path().join("closure"), dir.path().join("src")],
            ..project_in(&dir)
        };

        let project = Project::load(config).await.unwrap();
        let emitted = project.transform_all().unwrap();
        let index = emitted
            .iter()
            .find(|item| item.out_path == dir.path().join("dist/index.js"))
            .unwrap();
        assert_eq!(
            index.output.code,
            "import module$goog$string from './goog/string.js';\nconst str = module$goog$string;\n"
        );
        assert!(emitted
            .iter()
            .any(|item| item.out_path == dir.path().join("dist/goog/string.js")));
    }

    #[tokio::test]
    async fn test_write_with_source_maps() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/a.js", "goog.module('a');\nexports.x = 1;\n");
        let config = CloveConfig {
            sourcemap: true,
            ..project_in(&dir)
        };

        let project = Project::load(config).await.unwrap();
        let emitted = project.transform_all().unwrap();
        let summary = project.write(&emitted).await.unwrap();
        assert_eq!(
            summary,
            WriteSummary {
                files: 1,
                changed: 1,
                maps: 1
            }
        );

        let code = fs::read_to_string(dir.path().join("dist/a.js")).unwrap();
        assert!(code.starts_with("let exports = {};\n"));
        assert!(code.ends_with("//# sourceMappingURL=a.js.map\n"));
        let map = fs::read_to_string(dir.path().join("dist/a.js.map")).unwrap();
        assert!(map.contains("\"sources\":[\"../src/a.js\"]"));
    }

    #[tokio::test]
    async fn test_refresh_and_forget() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/index.js", "const a = goog.require('a');\n");
        let mut project = Project::load(project_in(&dir)).await.unwrap();
        assert_eq!(project.diagnostics(false).iter().filter(|d| d.is_error()).count(), 1);
        assert!(project.diagnostics(true).iter().all(|d| !d.is_error()));

        let added = write(&dir, "src/a.js", "goog.module('a');\n");
        assert!(project.refresh(&added).await.unwrap());
        assert!(project.diagnostics(false).is_empty());
        assert_eq!(project.files().count(), 2);

        fs::remove_file(&added).unwrap();
        assert!(project.refresh(&added).await.unwrap());
        assert!(!project.graph().contains(&added));
        assert_eq!(project.files().count(), 1);

        // outside every root
        let stray = write(&dir, "other/b.js", "");
        assert!(!project.refresh(&stray).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_roots_fail() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        let err = Project::load(project_in(&dir)).await.err().unwrap();
        assert!(matches!(err, CliError::NoSources { .. }));
    }

    #[tokio::test]
    async fn test_manifest_relative_to_its_directory() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/a.js", "goog.provide('a');\n");
        let config = CloveConfig {
            manifest: Some(dir.path().join("deps.js")),
            ..project_in(&dir)
        };
        let project = Project::load(config).await.unwrap();
        let written = project.write_manifest().await.unwrap().unwrap();
        let manifest = fs::read_to_string(written).unwrap();
        assert_eq!(manifest, "goog.addDependency('src/a.js', ['a'], [], {});\n");
    }
}
