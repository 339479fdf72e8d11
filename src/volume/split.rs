//! Multi-volume splitting
//!
//! Turns a 4D T1w volume into one 3D file per frame. Each frame keeps the
//! original header (affine, spacing, descriptions) and the element type the
//! voxels are stored with; the writer only updates the fields that describe
//! the new data layout.
//!
//! Splitting is not transactional. If a write or the removal of the original
//! fails, frames already written stay where they are.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use ndarray::{Array4, ArrayD, Axis, Ix4};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, NiftiType, NiftiVolume, ReaderOptions};
use num_traits::NumCast;

use crate::error::{NiftiFixError, Result};
use crate::volume::inspect::{Classification, VolumeInfo};
use crate::volume::naming::{original_copy_path, run_file_name, strip_first_run};

/// What to do while splitting a volume.
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Keep only the first frame, written back under the original name
    pub first_run_only: bool,
    /// Remove the 4D original once every frame is written
    pub delete_original: bool,
    /// Also write the untouched 4D volume as `original_<name>`
    pub rename_original: bool,
    /// Where the `original_` copy goes; empty means the working directory
    pub original_copy_dir: PathBuf,
}

impl SplitOptions {
    /// Will this split remove the 4D original?
    pub fn removes_original(&self) -> bool {
        self.delete_original || self.first_run_only
    }
}

/// Result of a split request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The volume already holds a single frame; nothing was written
    AlreadySingle,
    /// Frames were written
    Split {
        /// Paths of the 3D files now on disk, in frame order
        written: Vec<PathBuf>,
        /// Whether the 4D original is gone
        removed_original: bool,
        /// Location of the `original_` copy, if one was requested
        original_copy: Option<PathBuf>,
    },
}

/// Voxel data in the element type the volume is stored with.
#[derive(Debug)]
enum Voxels {
    U8(Array4<u8>),
    I8(Array4<i8>),
    U16(Array4<u16>),
    I16(Array4<i16>),
    U32(Array4<u32>),
    I32(Array4<i32>),
    U64(Array4<u64>),
    I64(Array4<i64>),
    F32(Array4<f32>),
    F64(Array4<f64>),
}

/// Evaluate `$body` with `$data` bound to the typed array inside `$voxels`.
macro_rules! with_voxels {
    ($voxels:expr, $data:ident => $body:expr) => {
        match $voxels {
            Voxels::U8($data) => $body,
            Voxels::I8($data) => $body,
            Voxels::U16($data) => $body,
            Voxels::I16($data) => $body,
            Voxels::U32($data) => $body,
            Voxels::I32($data) => $body,
            Voxels::U64($data) => $body,
            Voxels::I64($data) => $body,
            Voxels::F32($data) => $body,
            Voxels::F64($data) => $body,
        }
    };
}

impl Voxels {
    fn frames(&self) -> usize {
        with_voxels!(self, data => data.len_of(Axis(3)))
    }

    /// Write frame `frame` as a 3D volume.
    fn write_frame(&self, frame: usize, path: &Path, header: &NiftiHeader) -> Result<()> {
        let writer = WriterOptions::new(path).reference_header(header);
        let result = with_voxels!(self, data => writer.write_nifti(&data.index_axis(Axis(3), frame)));
        result.map_err(|e| NiftiFixError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the whole 4D volume.
    fn write_all(&self, path: &Path, header: &NiftiHeader) -> Result<()> {
        let writer = WriterOptions::new(path).reference_header(header);
        let result = with_voxels!(self, data => writer.write_nifti(data));
        result.map_err(|e| NiftiFixError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Split an inspected volume into 3D runs.
///
/// # Errors
/// * `UnsupportedShape` - If the volume is neither 3D nor 4D
/// * `RunName` - If no run label can be placed in the file name
/// * `Load` / `Read` - If the voxel data cannot be loaded
/// * `Write` / `Rename` / `Remove` - If an output step fails part way
pub fn split_volume(info: &VolumeInfo, options: &SplitOptions) -> Result<SplitOutcome> {
    let path = info.path();

    match info.classification() {
        Classification::ThreeD => return Ok(SplitOutcome::AlreadySingle),
        Classification::FourDSingle => {
            warn!(
                "{} is 4D with a single frame; leaving it unchanged",
                path.display()
            );
            return Ok(SplitOutcome::AlreadySingle);
        }
        Classification::FourDMulti { .. } => {}
        Classification::Unsupported { ndim } => {
            return Err(NiftiFixError::UnsupportedShape {
                path: path.to_path_buf(),
                ndim,
            })
        }
    }

    if run_file_name(path, 0) == path {
        return Err(NiftiFixError::RunName {
            path: path.to_path_buf(),
        });
    }

    let data = load_voxels(path)?;
    let frames = if options.first_run_only { 1 } else { data.frames() };
    info!("Splitting {} into {} run(s)", path.display(), frames);

    let mut written = Vec::with_capacity(frames);
    for frame in 0..frames {
        let out_path = run_file_name(path, frame);
        data.write_frame(frame, &out_path, info.header())?;

        if options.first_run_only {
            // only one run left, so it takes the original name
            let final_path = strip_first_run(&out_path);
            fs::rename(&out_path, &final_path).map_err(|e| NiftiFixError::Rename {
                from: out_path.clone(),
                to: final_path.clone(),
                source: e,
            })?;
            info!("Wrote {}", final_path.display());
            written.push(final_path);
        } else {
            info!("Wrote {}", out_path.display());
            written.push(out_path);
        }
    }

    let removed_original = if options.first_run_only {
        // the rename only replaced the original if the names match
        if written.iter().all(|out| out != path) {
            remove_original(path)?;
        }
        true
    } else if options.delete_original {
        remove_original(path)?;
        true
    } else {
        false
    };

    let original_copy = if options.rename_original {
        let copy_path = original_copy_path(path, &options.original_copy_dir);
        data.write_all(&copy_path, info.header())?;
        info!("Saved copy of original as {}", copy_path.display());
        Some(copy_path)
    } else {
        None
    };

    Ok(SplitOutcome::Split {
        written,
        removed_original,
        original_copy,
    })
}

/// Load the full voxel array of a 4D volume.
///
/// Unscaled data keeps its stored element type. Scaled integer data keeps it
/// too when every scaled value is whole and in range, since the writer always
/// stores a unit slope; anything else is widened to `f32`.
fn load_voxels(path: &Path) -> Result<Voxels> {
    let obj = ReaderOptions::new()
        .read_file(path)
        .map_err(|e| NiftiFixError::Load {
            path: path.to_path_buf(),
            source: e,
        })?;

    let slope = obj.header().scl_slope;
    let inter = obj.header().scl_inter;
    let volume = obj.into_volume();
    let stored = volume.data_type();
    debug!(
        "{} stores {:?} (scl_slope={}, scl_inter={})",
        path.display(),
        stored,
        slope,
        inter
    );

    if slope == 0.0 || (slope == 1.0 && inter == 0.0) {
        return Ok(match stored {
            NiftiType::Uint8 => Voxels::U8(as_frames(path, volume.into_ndarray())?),
            NiftiType::Int8 => Voxels::I8(as_frames(path, volume.into_ndarray())?),
            NiftiType::Uint16 => Voxels::U16(as_frames(path, volume.into_ndarray())?),
            NiftiType::Int16 => Voxels::I16(as_frames(path, volume.into_ndarray())?),
            NiftiType::Uint32 => Voxels::U32(as_frames(path, volume.into_ndarray())?),
            NiftiType::Int32 => Voxels::I32(as_frames(path, volume.into_ndarray())?),
            NiftiType::Uint64 => Voxels::U64(as_frames(path, volume.into_ndarray())?),
            NiftiType::Int64 => Voxels::I64(as_frames(path, volume.into_ndarray())?),
            NiftiType::Float64 => Voxels::F64(as_frames(path, volume.into_ndarray())?),
            _ => Voxels::F32(as_frames(path, volume.into_ndarray())?),
        });
    }

    let real: Array4<f64> = as_frames(path, volume.into_ndarray())?;
    let narrowed = match stored {
        NiftiType::Float64 => return Ok(Voxels::F64(real)),
        NiftiType::Uint8 => narrow(&real).map(Voxels::U8),
        NiftiType::Int8 => narrow(&real).map(Voxels::I8),
        NiftiType::Uint16 => narrow(&real).map(Voxels::U16),
        NiftiType::Int16 => narrow(&real).map(Voxels::I16),
        NiftiType::Uint32 => narrow(&real).map(Voxels::U32),
        NiftiType::Int32 => narrow(&real).map(Voxels::I32),
        NiftiType::Uint64 => narrow(&real).map(Voxels::U64),
        NiftiType::Int64 => narrow(&real).map(Voxels::I64),
        _ => None,
    };

    Ok(narrowed.unwrap_or_else(|| {
        debug!("{} widened to f32 after scaling", path.display());
        Voxels::F32(real.mapv(|v| v as f32))
    }))
}

fn as_frames<T>(path: &Path, data: nifti::Result<ArrayD<T>>) -> Result<Array4<T>> {
    let read_error = |reason: String| NiftiFixError::Read {
        path: path.to_path_buf(),
        reason,
    };
    data.map_err(|e| read_error(e.to_string()))?
        .into_dimensionality::<Ix4>()
        .map_err(|e| read_error(e.to_string()))
}

/// Convert scaled values back to `T`, if every one of them fits exactly.
fn narrow<T: NumCast>(real: &Array4<f64>) -> Option<Array4<T>> {
    let values = real
        .iter()
        .map(|&v| if v.fract() == 0.0 { T::from(v) } else { None })
        .collect::<Option<Vec<T>>>()?;
    Array4::from_shape_vec(real.raw_dim(), values).ok()
}

fn remove_original(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| NiftiFixError::Remove {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Deleted original {}", path.display());
    Ok(())
}
