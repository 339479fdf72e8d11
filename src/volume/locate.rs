//! T1w file discovery
//!
//! Walks a directory tree and collects the files that follow the
//! `*_T1w.nii[.gz]` naming convention.

use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{NiftiFixError, Result};

/// Basename suffixes that mark a T1-weighted anatomical volume.
pub const T1W_SUFFIXES: [&str; 2] = ["_T1w.nii.gz", "_T1w.nii"];

/// Does this file name follow the T1w naming convention?
pub fn is_t1w_name(name: &str) -> bool {
    T1W_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Recursively collect every T1w volume under `root`.
///
/// Entries are visited sorted by file name so repeated runs over the same
/// tree report files in the same order. An empty result is not an error.
///
/// # Errors
/// * `Walk` - If a directory under `root` cannot be read
pub fn locate_t1ws(root: &Path) -> Result<Vec<PathBuf>> {
    let mut t1ws = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| NiftiFixError::Walk {
            root: root.to_path_buf(),
            source: e,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if is_t1w_name(&entry.file_name().to_string_lossy()) {
            debug!("Found T1w candidate: {}", entry.path().display());
            t1ws.push(entry.into_path());
        }
    }

    Ok(t1ws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_t1w_name() {
        assert!(is_t1w_name("sub-01_T1w.nii.gz"));
        assert!(is_t1w_name("sub-01_ses-02_T1w.nii"));
        assert!(!is_t1w_name("sub-01_T2w.nii.gz"));
        assert!(!is_t1w_name("sub-01_T1w.json"));
        assert!(!is_t1w_name("sub-01_t1w.nii"));
    }

    #[test]
    fn test_locate_nested() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/anat")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("a/anat/sub-01_T1w.nii.gz"), b"").unwrap();
        fs::write(root.join("b/sub-02_T1w.nii"), b"").unwrap();
        fs::write(root.join("b/sub-02_bold.nii.gz"), b"").unwrap();
        fs::write(root.join("notes.txt"), b"").unwrap();

        let found: HashSet<PathBuf> = locate_t1ws(root).unwrap().into_iter().collect();
        let expected: HashSet<PathBuf> = [
            root.join("a/anat/sub-01_T1w.nii.gz"),
            root.join("b/sub-02_T1w.nii"),
        ]
        .into_iter()
        .collect();

        assert_eq!(found, expected);
    }

    #[test]
    fn test_locate_empty_tree() {
        let dir = tempdir().unwrap();
        assert!(locate_t1ws(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_directory_named_like_volume_is_skipped() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("odd_T1w.nii")).unwrap();
        assert!(locate_t1ws(dir.path()).unwrap().is_empty());
    }
}
