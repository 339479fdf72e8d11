//! Niftifix - T1w NIfTI repair tool
//!
//! Finds T1-weighted anatomical volumes that were saved as multi-volume (4D)
//! files and splits them into one 3D file per run.
//!
//! # Architecture
//!
//! The work happens in three steps, all in one sequential pass:
//! - Locate: walk a directory tree for `*_T1w.nii` / `*_T1w.nii.gz`
//! - Inspect: read each header and classify the volume by dimensionality
//! - Split: write every frame of a 4D volume as its own 3D run

pub mod cli;
pub mod error;
pub mod volume;

pub use error::{NiftiFixError, Result};
