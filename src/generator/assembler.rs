//! # Project Assembler
//!
//! Materialises a [`GeneratedArtifactSet`] under an output directory.
//!
//! Every file is written to a temporary sibling and renamed into place, so a
//! reader never observes a half-written file. Files whose bytes already match
//! are left untouched. A filesystem failure stops assembly immediately and is
//! reported as [`GenerationError::PartialWrite`] together with the paths that
//! were already written. Optional outputs a run no longer produces are removed,
//! so a tree never keeps a stale `doc/openapi.yaml`.

use std::fmt;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::artifacts::GeneratedArtifactSet;
use super::emitter::EmittedFile;
use crate::error::{GenerationError, Result};

/// What assembly did (or, for a plan, would do) with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Created => write!(f, "created"),
            WriteOutcome::Updated => write!(f, "updated"),
            WriteOutcome::Unchanged => write!(f, "unchanged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: String,
    pub emitter: String,
    pub outcome: WriteOutcome,
    pub bytes: usize,
    /// Lowercase hex SHA-256 of the contents
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    pub output_dir: PathBuf,
    /// `true` when produced by [`plan`]
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    /// Retired outputs deleted (or, for a plan, that would be deleted)
    pub removed: Vec<String>,
}

impl AssemblyReport {
    pub fn count(&self, outcome: WriteOutcome) -> usize {
        self.files.iter().filter(|f| f.outcome == outcome).count()
    }
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn content_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn target_path(output_dir: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .fold(output_dir.to_path_buf(), |path, segment| path.join(segment))
}

fn outcome_for(target: &Path, contents: &[u8]) -> WriteOutcome {
    match std::fs::read(target) {
        Ok(existing) if existing == contents => WriteOutcome::Unchanged,
        Ok(_) => WriteOutcome::Updated,
        Err(e) if e.kind() == IoErrorKind::NotFound => WriteOutcome::Created,
        Err(_) => WriteOutcome::Updated,
    }
}

fn report_for(file: &EmittedFile, outcome: WriteOutcome) -> FileReport {
    FileReport {
        path: file.path.clone(),
        emitter: file.emitter.to_string(),
        outcome,
        bytes: file.contents.len(),
        sha256: content_digest(&file.contents),
    }
}

fn stale<'a>(
    set: &'a GeneratedArtifactSet,
    retired: &'a [&'a str],
) -> impl Iterator<Item = &'a str> + 'a {
    retired.iter().copied().filter(|path| set.get(path).is_none())
}

/// Compute what [`assemble`] would do without touching the filesystem.
pub fn plan(set: &GeneratedArtifactSet, output_dir: &Path, retired: &[&str]) -> AssemblyReport {
    let files = set
        .iter()
        .map(|file| report_for(file, outcome_for(&target_path(output_dir, &file.path), &file.contents)))
        .collect();
    let removed = stale(set, retired)
        .filter(|path| target_path(output_dir, path).is_file())
        .map(str::to_string)
        .collect();
    AssemblyReport {
        output_dir: output_dir.to_path_buf(),
        dry_run: true,
        files,
        removed,
    }
}

/// Remove now-empty directories between `file` and `output_dir`.
fn prune_empty_parents(output_dir: &Path, file: &Path) {
    let mut dir = file.parent();
    while let Some(current) = dir {
        if current == output_dir || std::fs::remove_dir(current).is_err() {
            break;
        }
        dir = current.parent();
    }
}

fn write_atomic(target: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = target
        .parent()
        .ok_or_else(|| std::io::Error::other("output path has no parent directory"))?;
    std::fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Write every file of `set` below `output_dir`, creating it if absent.
///
/// Each path in `retired` that `set` does not contain is deleted if an
/// earlier run left it behind.
///
/// # Errors
///
/// Returns [`GenerationError::PartialWrite`] on the first filesystem failure.
pub fn assemble(
    set: &GeneratedArtifactSet,
    output_dir: &Path,
    retired: &[&str],
) -> Result<AssemblyReport> {
    std::fs::create_dir_all(output_dir).map_err(|source| GenerationError::PartialWrite {
        path: output_dir.to_path_buf(),
        written: Vec::new(),
        source,
    })?;

    let mut written = Vec::new();
    let mut files = Vec::with_capacity(set.len());
    for file in set.iter() {
        let target = target_path(output_dir, &file.path);
        let outcome = outcome_for(&target, &file.contents);
        if outcome != WriteOutcome::Unchanged {
            write_atomic(&target, &file.contents).map_err(|source| {
                GenerationError::PartialWrite {
                    path: target.clone(),
                    written: written.clone(),
                    source,
                }
            })?;
            written.push(file.path.clone());
        }
        debug!(path = %file.path, %outcome, bytes = file.contents.len(), "assembled file");
        files.push(report_for(file, outcome));
    }

    let mut removed = Vec::new();
    for path in stale(set, retired) {
        let target = target_path(output_dir, path);
        match std::fs::remove_file(&target) {
            Ok(()) => {
                debug!(path, "removed retired file");
                prune_empty_parents(output_dir, &target);
                removed.push(path.to_string());
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => {}
            Err(source) => {
                return Err(GenerationError::PartialWrite {
                    path: target,
                    written,
                    source,
                })
            }
        }
    }

    let report = AssemblyReport {
        output_dir: output_dir.to_path_buf(),
        dry_run: false,
        files,
        removed,
    };
    info!(
        output_dir = %output_dir.display(),
        created = report.count(WriteOutcome::Created),
        updated = report.count(WriteOutcome::Updated),
        unchanged = report.count(WriteOutcome::Unchanged),
        removed = report.removed.len(),
        "project assembled"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::EmitterKind;

    fn sample_set() -> GeneratedArtifactSet {
        let mut set = GeneratedArtifactSet::new();
        set.extend([
            EmittedFile::text("Cargo.toml", "[package]\n".to_string(), EmitterKind::BuildDescriptor),
            EmittedFile::text("src/main.rs", "fn main() {}\n".to_string(), EmitterKind::Handler),
        ])
        .unwrap();
        set
    }

    #[test]
    fn test_assemble_creates_then_leaves_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("project");
        let set = sample_set();

        let first = assemble(&set, &out, &[]).unwrap();
        assert_eq!(first.count(WriteOutcome::Created), 2);
        assert_eq!(
            std::fs::read_to_string(out.join("src").join("main.rs")).unwrap(),
            "fn main() {}\n"
        );

        let second = assemble(&set, &out, &[]).unwrap();
        assert_eq!(second.count(WriteOutcome::Unchanged), 2);
        assert_eq!(first.files[0].sha256, second.files[0].sha256);
    }

    #[test]
    fn test_changed_file_is_updated() {
        let dir = tempfile::tempdir().unwrap();
        let set = sample_set();
        assemble(&set, dir.path(), &[]).unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "edited").unwrap();
        let report = assemble(&set, dir.path(), &[]).unwrap();
        assert_eq!(report.files[0].outcome, WriteOutcome::Updated);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Cargo.toml")).unwrap(),
            "[package]\n"
        );
    }

    #[test]
    fn test_plan_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("planned");
        let report = plan(&sample_set(), &out, &[]);
        assert!(report.dry_run);
        assert_eq!(report.count(WriteOutcome::Created), 2);
        assert!(!out.exists());
    }

    #[test]
    fn test_blocked_directory_is_partial_write() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where `src/` has to go
        std::fs::write(dir.path().join("src"), "not a directory").unwrap();
        let err = assemble(&sample_set(), dir.path(), &[]).unwrap_err();
        match err {
            GenerationError::PartialWrite { written, .. } => {
                assert_eq!(written, vec!["Cargo.toml".to_string()]);
            }
            other => panic!("expected PartialWrite, got {other:?}"),
        }
    }

    #[test]
    fn test_retired_output_is_removed_with_its_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc");
        std::fs::create_dir_all(&doc).unwrap();
        std::fs::write(doc.join("openapi.yaml"), "openapi: 3.1.0\n").unwrap();
        let retired = ["doc/openapi.yaml", "doc/absent.yaml"];

        let planned = plan(&sample_set(), dir.path(), &retired);
        assert_eq!(planned.removed, vec!["doc/openapi.yaml".to_string()]);
        assert!(doc.join("openapi.yaml").is_file());

        let report = assemble(&sample_set(), dir.path(), &retired).unwrap();
        assert_eq!(report.removed, vec!["doc/openapi.yaml".to_string()]);
        assert!(!doc.exists());
        assert!(dir.path().join("Cargo.toml").is_file());
    }

    #[test]
    fn test_retired_path_still_emitted_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let report = assemble(&sample_set(), dir.path(), &["Cargo.toml"]).unwrap();
        assert!(report.removed.is_empty());
        assert!(dir.path().join("Cargo.toml").is_file());
    }

    #[test]
    fn test_content_digest_is_hex_sha256() {
        assert_eq!(
            content_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
