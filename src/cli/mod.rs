//! CLI Module
//!
//! Command-line interface for niftifix.

pub mod commands;
pub mod prompt;

use clap::Parser;
use std::path::PathBuf;

use crate::volume::SplitOptions;

/// Niftifix - split multi-volume T1w NIfTI files into 3D runs
#[derive(Parser, Debug)]
#[command(name = "niftifix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a NIfTI file, or a directory to search for *_T1w.nii[.gz]
    pub path: PathBuf,

    /// Only keep the first run; it replaces the original file
    #[arg(long = "first_run_only", alias = "first-run-only")]
    pub first_run_only: bool,

    /// Delete the original file after splitting
    #[arg(long = "delete_original", alias = "delete-original")]
    pub delete_original: bool,

    /// Save a copy of each split original as original_<name> in the current directory
    #[arg(long = "rename_original", alias = "rename-original")]
    pub rename_original: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Splitter settings for this invocation.
    pub fn split_options(&self, original_copy_dir: PathBuf) -> SplitOptions {
        SplitOptions {
            first_run_only: self.first_run_only,
            delete_original: self.delete_original,
            rename_original: self.rename_original,
            original_copy_dir,
        }
    }

    /// Default log filter, before `RUST_LOG` is applied.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
