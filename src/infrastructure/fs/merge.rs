//! Snapshot merge
//!
//! Copies a fetched repository snapshot over an existing checkout, like a
//! pull that never deletes: remote files replace local ones, files that only
//! exist locally stay, and override-set files already present are skipped.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::domain::value_objects::OverrideSet;

/// Directory names never copied out of a snapshot
const SKIPPED_DIRS: [&str; 1] = [".git"];

/// Paths (relative to the checkout root) touched by a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub preserved: Vec<PathBuf>,
}

/// Merge `source` into `target`, creating `target` if needed
pub fn merge_tree(source: &Path, target: &Path, overrides: &OverrideSet) -> io::Result<MergeReport> {
    fs::create_dir_all(target)?;
    let mut report = MergeReport::default();

    let walker = WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e.path(), e.file_type().is_dir()));

    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?
            .to_path_buf();
        let dest = target.join(&rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }

        // A dangling local link still counts as present
        if overrides.matches(&rel) && dest.symlink_metadata().is_ok() {
            tracing::debug!(path = %rel.display(), "preserving local override");
            report.preserved.push(rel);
            continue;
        }

        if file_type.is_symlink() {
            let link_target = fs::read_link(entry.path())?;
            if fs::read_link(&dest).ok().as_deref() == Some(link_target.as_path()) {
                report.unchanged.push(rel);
            } else {
                copy_link(entry.path(), &link_target, &dest)?;
                report.written.push(rel);
            }
            continue;
        }

        if dest.is_file() && file_digest(&dest)? == file_digest(entry.path())? {
            report.unchanged.push(rel);
            continue;
        }

        copy_file(entry.path(), &dest)?;
        report.written.push(rel);
    }

    Ok(report)
}

/// Put a fresh snapshot at `target`, which must not exist yet
///
/// Renames when possible; falls back to a copy across filesystems.
pub fn place_snapshot(source: &Path, target: &Path) -> io::Result<MergeReport> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(source, target) {
        Ok(()) => {
            let written = list_files(target)?;
            Ok(MergeReport {
                written,
                ..MergeReport::default()
            })
        }
        Err(e) => {
            tracing::debug!(error = %e, "rename failed, copying snapshot instead");
            merge_tree(source, target, &OverrideSet::new(Vec::<String>::new()))
        }
    }
}

/// Relative paths of every regular file and symlink under `root`
pub fn list_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_dir() {
            if let Ok(rel) = entry.path().strip_prefix(root) {
                files.push(rel.to_path_buf());
            }
        }
    }
    Ok(files)
}

/// Whether a directory exists and has at least one entry
pub fn is_non_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

fn is_skipped_dir(path: &Path, is_dir: bool) -> bool {
    is_dir
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| SKIPPED_DIRS.contains(&n))
            .unwrap_or(false)
}

fn file_digest(path: &Path) -> io::Result<Vec<u8>> {
    let bytes = fs::read(path)?;
    Ok(Sha256::digest(&bytes).to_vec())
}

/// Atomic copy: write a sibling temp file, then rename over `dest`
fn copy_file(src: &Path, dest: &Path) -> io::Result<()> {
    match copy_file_once(src, dest) {
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            tracing::warn!(path = %dest.display(), "permission denied, retrying after chmod");
            relax_permissions(dest)?;
            copy_file_once(src, dest)
        }
        other => other,
    }
}

fn copy_file_once(src: &Path, dest: &Path) -> io::Result<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let content = fs::read(src)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(&content)?;
    tmp.flush()?;
    let permissions = fs::metadata(src)?.permissions();
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Recreate the snapshot's link at `dest`, replacing a local file or link
#[cfg(unix)]
fn copy_link(_src: &Path, link_target: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    match dest.symlink_metadata() {
        Ok(meta) if meta.is_dir() => {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a local directory, remote has a link", dest.display()),
            ))
        }
        Ok(_) => fs::remove_file(dest)?,
        Err(_) => {}
    }
    std::os::unix::fs::symlink(link_target, dest)
}

/// Without unix links, copy what the link points at
#[cfg(not(unix))]
fn copy_link(src: &Path, _link_target: &Path, dest: &Path) -> io::Result<()> {
    copy_file(src, dest)
}

#[cfg(unix)]
fn relax_permissions(dest: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(parent) = dest.parent() {
        fs::set_permissions(parent, fs::Permissions::from_mode(0o755))?;
    }
    if dest.exists() {
        fs::set_permissions(dest, fs::Permissions::from_mode(0o644))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn relax_permissions(dest: &Path) -> io::Result<()> {
    if dest.exists() {
        let mut perms = fs::metadata(dest)?.permissions();
        perms.set_readonly(false);
        fs::set_permissions(dest, perms)?;
    }
    Ok(())
}
