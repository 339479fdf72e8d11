//! Header-only volume inspection
//!
//! Reads the NIfTI header of a candidate file and classifies the volume by
//! its dimensionality. Voxel data is left on disk until a split needs it.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use nifti::NiftiHeader;

use crate::error::{NiftiFixError, Result};

/// Largest dimensionality a NIfTI-1 header can describe.
const MAX_NIFTI_DIMS: usize = 7;

/// Dimensionality class of a volume, derived from its shape alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Exactly three spatial dimensions
    ThreeD,
    /// Four dimensions with a single frame along the fourth
    FourDSingle,
    /// Four dimensions holding several frames
    FourDMulti { frames: usize },
    /// Any other dimensionality
    Unsupported { ndim: usize },
}

impl Classification {
    /// Classify a volume shape.
    pub fn from_shape(shape: &[usize]) -> Self {
        match *shape {
            [_, _, _] => Classification::ThreeD,
            [_, _, _, 1] => Classification::FourDSingle,
            [_, _, _, frames] => Classification::FourDMulti { frames },
            _ => Classification::Unsupported { ndim: shape.len() },
        }
    }

    /// True only for volumes with exactly three dimensions.
    ///
    /// A single-frame 4D volume still reports four dimensions and is not 3D.
    pub fn is_3d(&self) -> bool {
        matches!(self, Classification::ThreeD)
    }

    /// True when the file holds one volume, whether 3D or 4D with one frame.
    pub fn is_single_volume(&self) -> bool {
        matches!(self, Classification::ThreeD | Classification::FourDSingle)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::ThreeD => write!(f, "3D volume"),
            Classification::FourDSingle => write!(f, "4D volume with a single frame"),
            Classification::FourDMulti { frames } => write!(f, "4D volume with {} frames", frames),
            Classification::Unsupported { ndim } => write!(f, "unsupported {}D volume", ndim),
        }
    }
}

/// An inspected volume file.
///
/// Holds what the header says about the file; immutable once built.
#[derive(Debug, Clone)]
pub struct VolumeInfo {
    path: PathBuf,
    header: NiftiHeader,
    shape: Vec<usize>,
    zooms: Vec<f32>,
    classification: Classification,
}

impl VolumeInfo {
    /// Read the header of `path` and classify the volume.
    ///
    /// Gzip compression is detected from a `.gz` extension.
    ///
    /// # Errors
    /// * `Load` - If the file cannot be opened or parsed as NIfTI
    /// * `InvalidHeader` - If the header declares an impossible dimensionality
    pub fn inspect(path: &Path) -> Result<Self> {
        let header = NiftiHeader::from_file(path).map_err(|e| NiftiFixError::Load {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_header(path, header)
    }

    /// Build from an already parsed header.
    pub fn from_header(path: &Path, header: NiftiHeader) -> Result<Self> {
        let ndim = header.dim[0] as usize;
        if ndim == 0 || ndim > MAX_NIFTI_DIMS {
            return Err(NiftiFixError::InvalidHeader {
                path: path.to_path_buf(),
                reason: format!("dim[0] = {} is outside 1..={}", header.dim[0], MAX_NIFTI_DIMS),
            });
        }

        let shape: Vec<usize> = header.dim[1..=ndim].iter().map(|&d| d as usize).collect();
        let zooms = header.pixdim[1..=ndim].to_vec();
        let classification = Classification::from_shape(&shape);

        debug!(
            "Inspected {}: shape {:?}, zooms {:?} ({})",
            path.display(),
            shape,
            zooms,
            classification
        );

        Ok(VolumeInfo {
            path: path.to_path_buf(),
            header,
            shape,
            zooms,
            classification,
        })
    }

    /// Path of the inspected file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Original header, reused verbatim as the reference for split outputs
    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// Per-dimension extents
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Per-dimension voxel spacing
    pub fn zooms(&self) -> &[f32] {
        &self.zooms
    }

    /// Rows of the sform affine mapping voxel indices to physical space
    pub fn affine_rows(&self) -> [[f32; 4]; 3] {
        [self.header.srow_x, self.header.srow_y, self.header.srow_z]
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn is_3d(&self) -> bool {
        self.classification.is_3d()
    }

    pub fn is_single_volume(&self) -> bool {
        self.classification.is_single_volume()
    }

    /// Human-readable summary of path and shape.
    pub fn describe(&self) -> String {
        format!(
            "Nifti path: {}\nShape: {:?}\nZooms: {:?}",
            self.path.display(),
            self.shape,
            self.zooms
        )
    }
}
