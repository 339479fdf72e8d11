//! Output file names for split runs

use std::path::{Path, PathBuf};

/// Marker that identifies a T1-weighted volume in a file name.
pub const T1W_MARKER: &str = "_T1w";

/// Extension fragment the run label goes in front of when there is no marker.
const NIFTI_EXT: &str = ".nii";

/// Prefix of the copy written for `rename_original`.
pub const ORIGINAL_PREFIX: &str = "original_";

/// Run label for a zero-based frame index.
///
/// The label is `_run-0` followed by the one-based run number, so runs 1-9
/// read `_run-01`..`_run-09` and run 10 reads `_run-010`.
pub fn run_label(frame: usize) -> String {
    format!("_run-0{}", frame + 1)
}

/// Insert the run label for `frame` into a file name.
///
/// The label goes in front of `_T1w` when the name carries it, otherwise in
/// front of `.nii`. Every occurrence of the anchor is rewritten.
pub fn run_name(name: &str, frame: usize) -> String {
    let label = run_label(frame);
    if name.contains(T1W_MARKER) {
        name.replace(T1W_MARKER, &format!("{}{}", label, T1W_MARKER))
    } else {
        name.replace(NIFTI_EXT, &format!("{}{}", label, NIFTI_EXT))
    }
}

/// Sibling path of `path` holding run `frame`.
///
/// Only the file name is rewritten; the directory is left alone.
pub fn run_file_name(path: &Path, frame: usize) -> PathBuf {
    let name = file_name_lossy(path);
    path.with_file_name(run_name(&name, frame))
}

/// Drop the first-run label from a path, giving the single-run output name.
pub fn strip_first_run(path: &Path) -> PathBuf {
    let name = file_name_lossy(path);
    path.with_file_name(name.replace(&run_label(0), ""))
}

/// Path of the `original_` copy of `path` inside `dir`.
pub fn original_copy_path(path: &Path, dir: &Path) -> PathBuf {
    dir.join(format!("{}{}", ORIGINAL_PREFIX, file_name_lossy(path)))
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_name_with_marker() {
        assert_eq!(run_name("sub-01_T1w.nii.gz", 0), "sub-01_run-01_T1w.nii.gz");
        assert_eq!(run_name("sub-01_T1w.nii", 1), "sub-01_run-02_T1w.nii");
    }

    #[test]
    fn test_run_name_without_marker() {
        assert_eq!(run_name("sub-01.nii", 2), "sub-01_run-03.nii");
        assert_eq!(run_name("sub-01.nii.gz", 0), "sub-01_run-01.nii.gz");
    }

    #[test]
    fn test_run_numbering_past_nine() {
        assert_eq!(run_label(8), "_run-09");
        assert_eq!(run_label(9), "_run-010");
    }

    #[test]
    fn test_run_file_name_keeps_directory() {
        let path = Path::new("/data/sub-01_T1w.nii/anat/sub-01_T1w.nii.gz");
        assert_eq!(
            run_file_name(path, 0),
            PathBuf::from("/data/sub-01_T1w.nii/anat/sub-01_run-01_T1w.nii.gz")
        );
    }

    #[test]
    fn test_strip_first_run() {
        let path = Path::new("/data/sub-01_run-01_T1w.nii.gz");
        assert_eq!(strip_first_run(path), PathBuf::from("/data/sub-01_T1w.nii.gz"));
        let original = Path::new("/data/sub-01_T1w.nii.gz");
        assert_eq!(strip_first_run(&run_file_name(original, 0)), original);
    }

    #[test]
    fn test_original_copy_path() {
        assert_eq!(
            original_copy_path(Path::new("/data/anat/sub-01_T1w.nii"), Path::new("/work")),
            PathBuf::from("/work/original_sub-01_T1w.nii")
        );
    }
}
