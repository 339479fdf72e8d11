//! Volume Module
//!
//! Everything that touches NIfTI files:
//! - Locating T1w volumes in a directory tree
//! - Header-only inspection and classification
//! - Run file naming
//! - Splitting 4D volumes into 3D runs

pub mod inspect;
pub mod locate;
pub mod naming;
pub mod split;

pub use inspect::{Classification, VolumeInfo};
pub use locate::{is_t1w_name, locate_t1ws, T1W_SUFFIXES};
pub use naming::{original_copy_path, run_file_name, run_name, strip_first_run};
pub use split::{split_volume, SplitOptions, SplitOutcome};
