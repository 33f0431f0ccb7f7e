//! Loading documents from files and directories.
//!
//! Each `--docs` path is either a file or a directory. Directories are walked
//! recursively and filtered with the `[documents]` include/exclude globs;
//! their files are sorted for deterministic order. Paths keep the order they
//! were given in, which is the order the corpus is built in.
//!
//! A file whose text cannot be extracted is reported and kept with empty
//! text, so it contributes no chunks without failing the whole batch.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use rag_advisor_core::models::Document;

use crate::config::DocumentsConfig;
use crate::extract::{content_type_for, extract_text};
use crate::progress::{IngestEvent, IngestReporter};

/// Documents in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// SHA-256 over every name and text, in order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for doc in &self.documents {
            hasher.update(doc.name.as_bytes());
            hasher.update([0u8]);
            hasher.update(doc.text.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Resolve `paths` to files and extract each one.
pub fn load_paths(
    paths: &[PathBuf],
    config: &DocumentsConfig,
    reporter: &dyn IngestReporter,
) -> Result<DocumentSet> {
    let files = collect_files(paths, config)?;
    let total = files.len() as u64;

    let mut documents = Vec::with_capacity(files.len());
    for (i, path) in files.iter().enumerate() {
        let name = path.display().to_string();
        reporter.report(IngestEvent::Extracting {
            name: name.clone(),
            n: i as u64 + 1,
            total,
        });

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let text = match extract_text(&bytes, content_type_for(path)) {
            Ok(text) => text,
            Err(e) => {
                reporter.report(IngestEvent::Failed {
                    name: name.clone(),
                    reason: e.to_string(),
                });
                String::new()
            }
        };
        documents.push(Document::new(name, text));
    }

    Ok(DocumentSet::new(documents))
}

fn collect_files(paths: &[PathBuf], config: &DocumentsConfig) -> Result<Vec<PathBuf>> {
    let include_set = build_globset(&config.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(walk_dir(path, config, &include_set, &exclude_set)?);
        } else {
            bail!("Document path does not exist: {}", path.display());
        }
    }
    Ok(files)
}

fn walk_dir(
    root: &Path,
    config: &DocumentsConfig,
    include_set: &GlobSet,
    exclude_set: &GlobSet,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root).follow_links(config.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            continue;
        }
        if !include_set.is_match(&rel_str) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use std::fs;
    use tempfile::TempDir;

    fn setup_docs() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("b.md"), "Beta notes on hiring.").unwrap();
        fs::write(root.join("a.txt"), "Alpha notes on budgets.").unwrap();
        fs::write(root.join("sub/c.txt"), "Gamma notes on strategy.").unwrap();
        fs::write(root.join("image.png"), [0u8, 1, 2]).unwrap();
        fs::write(root.join(".git/config.txt"), "ignored").unwrap();
        tmp
    }

    #[test]
    fn directory_walk_is_sorted_and_filtered() {
        let tmp = setup_docs();
        let set = load_paths(
            &[tmp.path().to_path_buf()],
            &DocumentsConfig::default(),
            &NoProgress,
        )
        .unwrap();

        let names: Vec<String> = set
            .documents()
            .iter()
            .map(|d| {
                Path::new(&d.name)
                    .strip_prefix(tmp.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["a.txt", "b.md", "sub/c.txt"]);
        assert_eq!(set.documents()[0].text, "Alpha notes on budgets.");
    }

    #[test]
    fn exclude_globs_apply() {
        let tmp = setup_docs();
        let config = DocumentsConfig {
            exclude_globs: vec!["sub/**".to_string()],
            ..DocumentsConfig::default()
        };
        let set = load_paths(&[tmp.path().to_path_buf()], &config, &NoProgress).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn explicit_files_keep_argument_order() {
        let tmp = setup_docs();
        let paths = vec![tmp.path().join("b.md"), tmp.path().join("a.txt")];
        let set = load_paths(&paths, &DocumentsConfig::default(), &NoProgress).unwrap();
        assert_eq!(set.documents()[0].text, "Beta notes on hiring.");
        assert_eq!(set.documents()[1].text, "Alpha notes on budgets.");
    }

    #[test]
    fn broken_pdf_is_kept_with_empty_text() {
        let tmp = setup_docs();
        let pdf = tmp.path().join("broken.pdf");
        fs::write(&pdf, b"definitely not a pdf").unwrap();
        let paths = vec![pdf, tmp.path().join("a.txt")];
        let set = load_paths(&paths, &DocumentsConfig::default(), &NoProgress).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.documents()[0].is_blank());
        assert!(!set.documents()[1].is_blank());
    }

    #[test]
    fn missing_path_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_paths(
            &[tmp.path().join("missing.pdf")],
            &DocumentsConfig::default(),
            &NoProgress,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn fingerprint_tracks_names_and_text() {
        let a = DocumentSet::new(vec![Document::new("a", "x")]);
        let same = DocumentSet::new(vec![Document::new("a", "x")]);
        let renamed = DocumentSet::new(vec![Document::new("b", "x")]);
        let edited = DocumentSet::new(vec![Document::new("a", "y")]);
        assert_eq!(a.fingerprint(), same.fingerprint());
        assert_ne!(a.fingerprint(), renamed.fingerprint());
        assert_ne!(a.fingerprint(), edited.fingerprint());
    }
}
