//! Error handling for niftifix
//!
//! Every variant that concerns a file carries its path so a failed batch
//! names the volume it stopped on.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for niftifix operations
pub type Result<T> = std::result::Result<T, NiftiFixError>;

/// Main error type for niftifix operations
#[derive(Error, Debug)]
pub enum NiftiFixError {
    // Input Errors
    #[error("The path {path} is not a file or directory")]
    InvalidPath { path: PathBuf },

    // Volume Errors
    #[error("Failed to load NIfTI volume {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: nifti::NiftiError,
    },

    #[error("Invalid NIfTI header in {path}: {reason}")]
    InvalidHeader { path: PathBuf, reason: String },

    #[error("Cannot split {path}: unsupported {ndim}-dimensional volume")]
    UnsupportedShape { path: PathBuf, ndim: usize },

    #[error("Cannot derive a run file name from {path}")]
    RunName { path: PathBuf },

    #[error("Failed to read voxel data from {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    // Output Errors
    #[error("Failed to write volume {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: nifti::NiftiError,
    },

    #[error("Failed to remove original volume {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Traversal Errors
    #[error("Failed to scan directory {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    // Interaction Errors
    #[error("Failed to read confirmation from terminal: {0}")]
    Prompt(#[source] std::io::Error),
}

impl NiftiFixError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            NiftiFixError::InvalidPath { .. } => "INVALID_PATH",
            NiftiFixError::Load { .. } => "LOAD_ERROR",
            NiftiFixError::InvalidHeader { .. } => "INVALID_HEADER",
            NiftiFixError::UnsupportedShape { .. } => "UNSUPPORTED_SHAPE",
            NiftiFixError::RunName { .. } => "RUN_NAME_ERROR",
            NiftiFixError::Read { .. } => "READ_ERROR",
            NiftiFixError::Write { .. } => "WRITE_ERROR",
            NiftiFixError::Remove { .. } => "REMOVE_ERROR",
            NiftiFixError::Rename { .. } => "RENAME_ERROR",
            NiftiFixError::Walk { .. } => "WALK_ERROR",
            NiftiFixError::Prompt(_) => "PROMPT_ERROR",
        }
    }

    /// Whether files may have been left half-converted when this error surfaced.
    ///
    /// Splits are not transactional: frames written before a failing write or
    /// removal stay on disk.
    pub fn may_leave_partial_output(&self) -> bool {
        matches!(
            self,
            NiftiFixError::Write { .. }
                | NiftiFixError::Remove { .. }
                | NiftiFixError::Rename { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            NiftiFixError::InvalidPath { .. } => vec![
                "Check the path is correct",
                "Pass either a single .nii/.nii.gz file or a directory",
            ],
            NiftiFixError::Load { .. } | NiftiFixError::InvalidHeader { .. } => vec![
                "The file may be truncated or corrupt - try re-exporting it",
                "Check that the file really is a NIfTI-1 volume (.nii or .nii.gz)",
            ],
            NiftiFixError::RunName { .. } => vec![
                "Rename the file so it contains _T1w or ends in .nii/.nii.gz",
            ],
            NiftiFixError::UnsupportedShape { .. } => vec![
                "Only 4D volumes can be split into 3D runs",
                "Inspect the volume dimensions and fix the file by hand",
            ],
            NiftiFixError::Write { .. } | NiftiFixError::Rename { .. } => vec![
                "Check that the output directory is writable",
                "Free up disk space",
                "Remove any run files already written before retrying",
            ],
            NiftiFixError::Remove { .. } => vec![
                "The split runs were written; remove the original by hand",
            ],
            _ => vec![],
        }
    }
}
