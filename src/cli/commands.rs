//! CLI Command Implementations
//!
//! The directory and single-file workflows: list, inspect, confirm, split.

use std::path::{Path, PathBuf};

use log::info;

use crate::cli::prompt::Confirm;
use crate::error::{NiftiFixError, Result};
use crate::volume::{
    locate_t1ws, split_volume, Classification, SplitOptions, SplitOutcome, VolumeInfo,
};

const FIX_FILES_PROMPT: &str = "Would you like to fix these files? [y/n]: ";
const FIX_FILE_PROMPT: &str = "Would you like to fix this file? [y/n]: ";
const DELETE_PROMPT: &str = "Enter 'y' to continue: ";

/// Exit status for a completed run.
pub const EXIT_OK: u8 = 0;
/// Exit status for an invalid path or a declined single-file fix.
pub const EXIT_FAILURE: u8 = 1;

/// What kind of path the user gave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    File,
    Directory,
}

/// How a workflow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// Every inspected volume is already 3D
    NothingToFix,
    /// The user declined; nothing was changed
    Declined,
    /// Bad volumes were processed
    Fixed(FixReport),
}

/// Tally of a confirmed fix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixReport {
    /// Originals that were split
    pub split: Vec<PathBuf>,
    /// 3D files written
    pub written: Vec<PathBuf>,
    /// Bad files left alone (4D with a single frame)
    pub unchanged: Vec<PathBuf>,
}

impl FixReport {
    fn record(&mut self, path: &Path, outcome: SplitOutcome) {
        match outcome {
            SplitOutcome::AlreadySingle => self.unchanged.push(path.to_path_buf()),
            SplitOutcome::Split { written, .. } => {
                self.split.push(path.to_path_buf());
                self.written.extend(written);
            }
        }
    }
}

/// Result of [`fix_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixRun {
    pub target: Target,
    pub outcome: FixOutcome,
}

impl FixRun {
    /// Process exit status for this run.
    ///
    /// Declining a directory fix is a clean abort; declining a single-file fix
    /// shares the failure status used for invalid paths.
    pub fn exit_code(&self) -> u8 {
        match (self.target, &self.outcome) {
            (Target::File, FixOutcome::Declined) => EXIT_FAILURE,
            _ => EXIT_OK,
        }
    }
}

/// Fix a single volume or every T1w volume under a directory.
///
/// # Errors
/// * `InvalidPath` - If `path` is neither a file nor a directory
/// * Any error from locating, inspecting or splitting, naming the file involved
pub fn fix_path(path: &Path, options: &SplitOptions, confirm: &mut dyn Confirm) -> Result<FixRun> {
    if path.is_dir() {
        let outcome = fix_directory(path, options, confirm)?;
        Ok(FixRun {
            target: Target::Directory,
            outcome,
        })
    } else if path.is_file() {
        let outcome = fix_file(path, options, confirm)?;
        Ok(FixRun {
            target: Target::File,
            outcome,
        })
    } else {
        Err(NiftiFixError::InvalidPath {
            path: path.to_path_buf(),
        })
    }
}

/// Find every T1w volume under `root`, report the ones that are not 3D and
/// split them once confirmed.
///
/// Inspection stops at the first file that cannot be read.
pub fn fix_directory(
    root: &Path,
    options: &SplitOptions,
    confirm: &mut dyn Confirm,
) -> Result<FixOutcome> {
    info!("Scanning {} for T1w volumes", root.display());

    let t1ws = locate_t1ws(root)?;
    println!("Found {} T1w files at {}:", t1ws.len(), root.display());
    for t1w in &t1ws {
        println!("{}", t1w.display());
    }

    let mut bad_t1ws = Vec::new();
    for t1w in &t1ws {
        let info = VolumeInfo::inspect(t1w)?;
        if !info.is_3d() {
            bad_t1ws.push(info);
        }
    }

    println!("Found {} bad T1w files", bad_t1ws.len());
    for bad_t1w in &bad_t1ws {
        println!("{}", bad_t1w.path().display());
    }

    if bad_t1ws.is_empty() {
        return Ok(FixOutcome::NothingToFix);
    }

    if !confirm_fix(&bad_t1ws, FIX_FILES_PROMPT, options, confirm)? {
        info!("Fix declined; no files changed");
        return Ok(FixOutcome::Declined);
    }

    let mut report = FixReport::default();
    for bad_t1w in &bad_t1ws {
        // headers are re-read right before splitting
        let info = VolumeInfo::inspect(bad_t1w.path())?;
        let outcome = split_volume(&info, options)?;
        report.record(info.path(), outcome);
    }

    print_report(&report);
    Ok(FixOutcome::Fixed(report))
}

/// Inspect one volume and split it once confirmed.
pub fn fix_file(path: &Path, options: &SplitOptions, confirm: &mut dyn Confirm) -> Result<FixOutcome> {
    let info = VolumeInfo::inspect(path)?;
    info!("{}", info.describe());

    if info.is_3d() {
        println!("The file {} is already a 3D volume", path.display());
        return Ok(FixOutcome::NothingToFix);
    }

    println!("The file {} is not a 3D volume", path.display());
    if !confirm_fix(std::slice::from_ref(&info), FIX_FILE_PROMPT, options, confirm)? {
        info!("Fix declined; no files changed");
        return Ok(FixOutcome::Declined);
    }

    let mut report = FixReport::default();
    let outcome = split_volume(&info, options)?;
    report.record(path, outcome);

    print_report(&report);
    Ok(FixOutcome::Fixed(report))
}

/// Ask to fix `targets`, and again when originals will be deleted.
///
/// Only multi-frame volumes get split, so only their originals are listed
/// for deletion.
fn confirm_fix(
    targets: &[VolumeInfo],
    question: &str,
    options: &SplitOptions,
    confirm: &mut dyn Confirm,
) -> Result<bool> {
    if !confirm.confirm(question)? {
        return Ok(false);
    }

    if !options.removes_original() {
        return Ok(true);
    }

    let doomed: Vec<&Path> = targets
        .iter()
        .filter(|info| matches!(info.classification(), Classification::FourDMulti { .. }))
        .map(|info| info.path())
        .collect();
    if doomed.is_empty() {
        return Ok(true);
    }

    println!("You've selected an option that will delete the original file, this cannot be undone");
    for path in doomed {
        println!("The following original files will be deleted {}", path.display());
    }
    confirm.confirm(DELETE_PROMPT)
}

fn print_report(report: &FixReport) {
    println!(
        "Split {} files into {} runs",
        report.split.len(),
        report.written.len()
    );
    for path in &report.written {
        println!("{}", path.display());
    }
    if !report.unchanged.is_empty() {
        println!(
            "Left {} single-frame 4D files unchanged",
            report.unchanged.len()
        );
        for path in &report.unchanged {
            println!("{}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::ScriptedConfirm;
    use ndarray::Array4;
    use nifti::writer::WriterOptions;
    use std::fs;
    use tempfile::tempdir;

    fn write_frames(path: &Path, frames: usize) {
        let data = Array4::<f32>::from_elem((3, 3, 2, frames), 1.0);
        WriterOptions::new(path).write_nifti(&data).unwrap();
    }

    #[test]
    fn test_invalid_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let mut confirm = ScriptedConfirm::default();

        let err = fix_path(&missing, &SplitOptions::default(), &mut confirm).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PATH");
        assert!(confirm.asked().is_empty());
    }

    #[test]
    fn test_empty_directory_asks_nothing() {
        let dir = tempdir().unwrap();
        let mut confirm = ScriptedConfirm::default();

        let run = fix_path(dir.path(), &SplitOptions::default(), &mut confirm).unwrap();
        assert_eq!(run.target, Target::Directory);
        assert_eq!(run.outcome, FixOutcome::NothingToFix);
        assert_eq!(run.exit_code(), EXIT_OK);
        assert!(confirm.asked().is_empty());
    }

    #[test]
    fn test_corrupt_volume_halts_scan() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("sub-01_T1w.nii");
        fs::write(&bad, b"definitely not a nifti header").unwrap();
        let mut confirm = ScriptedConfirm::new([true, true]);

        let err = fix_directory(dir.path(), &SplitOptions::default(), &mut confirm).unwrap_err();
        assert_eq!(err.error_code(), "LOAD_ERROR");
        assert!(err.to_string().contains("sub-01_T1w.nii"));
        assert!(confirm.asked().is_empty());
    }

    #[test]
    fn test_exit_codes() {
        let declined_file = FixRun {
            target: Target::File,
            outcome: FixOutcome::Declined,
        };
        let declined_dir = FixRun {
            target: Target::Directory,
            outcome: FixOutcome::Declined,
        };
        assert_eq!(declined_file.exit_code(), EXIT_FAILURE);
        assert_eq!(declined_dir.exit_code(), EXIT_OK);
    }

    #[test]
    fn test_single_frame_files_skip_deletion_prompt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub-01_T1w.nii");
        write_frames(&path, 1);
        let options = SplitOptions {
            delete_original: true,
            ..Default::default()
        };
        let mut confirm = ScriptedConfirm::new([true]);

        let outcome = fix_directory(dir.path(), &options, &mut confirm).unwrap();
        assert_eq!(confirm.asked(), &[FIX_FILES_PROMPT.to_string()]);
        match outcome {
            FixOutcome::Fixed(report) => assert_eq!(report.unchanged, vec![path.clone()]),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(path.exists());
    }

    #[test]
    fn test_deletion_prompt_when_a_split_removes_originals() {
        let dir = tempdir().unwrap();
        let single = dir.path().join("sub-01_T1w.nii");
        let multi = dir.path().join("sub-02_T1w.nii");
        write_frames(&single, 1);
        write_frames(&multi, 2);
        let options = SplitOptions {
            delete_original: true,
            ..Default::default()
        };
        let mut confirm = ScriptedConfirm::new([true, true]);

        fix_directory(dir.path(), &options, &mut confirm).unwrap();
        assert_eq!(
            confirm.asked(),
            &[FIX_FILES_PROMPT.to_string(), DELETE_PROMPT.to_string()]
        );
        assert!(single.exists());
        assert!(!multi.exists());
    }
}
