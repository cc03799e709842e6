use super::VoxelizationError;
use crate::math::{Point, Real, Vector, DIM};
#[cfg(not(feature = "std"))]
use na::ComplexField;
use alloc::vec::Vec;

/// The default ceiling on the number of voxels created per scale.
pub const DEFAULT_MAX_VOXELS: usize = 20_000;

/// The default per-voxel point cap, used until caps are set explicitly.
pub const DEFAULT_MAX_POINTS: usize = 32;

/// The axis-aligned region of space being voxelized.
///
/// Containment is half-open: a coordinate `c` is inside along an axis iff
/// `mins <= c < maxs`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CoordsRange {
    /// The lower (inclusive) corner.
    pub mins: Point<Real>,
    /// The upper (exclusive) corner.
    pub maxs: Point<Real>,
}

impl CoordsRange {
    /// Creates a range from its two corners.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Self {
        Self { mins, maxs }
    }

    /// Creates a range from the `[xmin, ymin, zmin, xmax, ymax, zmax]` layout.
    #[inline]
    pub fn from_xyzxyz(range: [Real; 6]) -> Self {
        Self {
            mins: Point::new(range[0], range[1], range[2]),
            maxs: Point::new(range[3], range[4], range[5]),
        }
    }

    /// The size of the range along each axis.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Is `pt` inside of this half-open range?
    ///
    /// Always `false` if any coordinate of `pt` is NaN.
    #[inline]
    pub fn contains_point(&self, pt: &Point<Real>) -> bool {
        (0..DIM).all(|i| pt[i] >= self.mins[i] && pt[i] < self.maxs[i])
    }

    /// The number of cells along each axis of the grid with the given voxel size.
    ///
    /// This is `round(extent / voxel_size)`. When the extents are not a multiple
    /// of the voxel size, the last cell on an axis may be partial, so points can
    /// still receive the index `grid_size` on that axis.
    pub fn grid_size(&self, voxel_size: &Vector<Real>) -> Vector<i32> {
        self.extents()
            .component_div(voxel_size)
            .map(|e| e.round() as i32)
    }

    pub(crate) fn validate(&self) -> Result<(), VoxelizationError> {
        let valid = (0..DIM).all(|i| {
            self.mins[i].is_finite() && self.maxs[i].is_finite() && self.mins[i] < self.maxs[i]
        });

        if valid {
            Ok(())
        } else {
            Err(VoxelizationError::InvalidCoordsRange)
        }
    }
}

/// Everything needed to voxelize a point cloud at one resolution.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ScaleConfig {
    /// The size of a voxel along each axis.
    pub voxel_size: Vector<Real>,
    /// The region of space being voxelized.
    pub coords_range: CoordsRange,
    /// The maximum number of points stored in a single voxel.
    pub max_points: usize,
    /// The maximum number of distinct voxels created.
    pub max_voxels: usize,
}

impl ScaleConfig {
    /// Creates a new scale configuration.
    pub fn new(
        voxel_size: Vector<Real>,
        coords_range: CoordsRange,
        max_points: usize,
        max_voxels: usize,
    ) -> Self {
        Self {
            voxel_size,
            coords_range,
            max_points,
            max_voxels,
        }
    }

    /// Checks that this configuration can be voxelized.
    ///
    /// `scale` is only used to label the error.
    pub fn validate(&self, scale: usize) -> Result<(), VoxelizationError> {
        if !self.voxel_size.iter().all(|s| s.is_finite() && *s > 0.0) {
            return Err(VoxelizationError::InvalidVoxelSize {
                scale,
                size: self.voxel_size,
            });
        }

        if self.max_points == 0 || self.max_voxels == 0 {
            return Err(VoxelizationError::ZeroCapacity { scale });
        }

        self.coords_range.validate()?;

        let cells = self.coords_range.extents().component_div(&self.voxel_size);
        if cells.iter().any(|c| *c >= i32::MAX as Real) {
            return Err(VoxelizationError::GridTooLarge { scale, cells });
        }

        Ok(())
    }

    /// The number of values in the point buffer of one voxel, for points of `ndim` values.
    ///
    /// Fails with [`VoxelizationError::CapacityOverflow`] if a buffer holding
    /// `min(num_points, max_voxels)` such voxels cannot be allocated.
    pub fn voxel_block_len(
        &self,
        scale: usize,
        ndim: usize,
        num_points: usize,
    ) -> Result<usize, VoxelizationError> {
        let voxels = num_points.min(self.max_voxels);
        let block = self.max_points.checked_mul(ndim);
        let bytes = block
            .and_then(|block| block.checked_mul(voxels))
            .and_then(|len| len.checked_mul(core::mem::size_of::<Real>()));

        match (block, bytes) {
            (Some(block), Some(bytes)) if bytes <= isize::MAX as usize => Ok(block),
            _ => Err(VoxelizationError::CapacityOverflow { scale }),
        }
    }
}

/// The per-voxel point caps of a multi-scale request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum MaxPoints {
    /// The same cap for every scale.
    Shared(usize),
    /// One cap per scale, in scale order.
    PerScale(Vec<usize>),
}

impl MaxPoints {
    /// The point cap of each of the `num_scales` scales.
    pub fn resolve(&self, num_scales: usize) -> Result<Vec<usize>, VoxelizationError> {
        match self {
            MaxPoints::Shared(max_points) => Ok(alloc::vec![*max_points; num_scales]),
            MaxPoints::PerScale(caps) if caps.len() == num_scales => Ok(caps.clone()),
            MaxPoints::PerScale(caps) => Err(VoxelizationError::ScaleCountMismatch {
                voxel_sizes: num_scales,
                max_points: caps.len(),
            }),
        }
    }
}

impl From<usize> for MaxPoints {
    fn from(max_points: usize) -> Self {
        MaxPoints::Shared(max_points)
    }
}

impl From<Vec<usize>> for MaxPoints {
    fn from(caps: Vec<usize>) -> Self {
        MaxPoints::PerScale(caps)
    }
}

/// A multi-scale voxelization request.
///
/// All scales share the coordinate range and the voxel ceiling; the voxel size
/// and the per-voxel point cap vary per scale.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MultiScaleRequest {
    /// The voxel size of each scale, in output order.
    pub voxel_sizes: Vec<Vector<Real>>,
    /// The per-voxel point caps.
    pub max_points: MaxPoints,
    /// The region of space being voxelized, shared by all scales.
    pub coords_range: CoordsRange,
    /// The maximum number of voxels created per scale.
    pub max_voxels: usize,
    /// Must be `true`: only the order-preserving voxelization exists.
    pub deterministic: bool,
}

impl MultiScaleRequest {
    /// A request over the `[xmin, ymin, zmin, xmax, ymax, zmax]` range, without any scale yet.
    pub fn new(coords_range: [Real; 6]) -> Self {
        Self::with_range(CoordsRange::from_xyzxyz(coords_range))
    }

    /// A request over the given range, without any scale yet.
    pub fn with_range(coords_range: CoordsRange) -> Self {
        Self {
            voxel_sizes: Vec::new(),
            max_points: MaxPoints::Shared(DEFAULT_MAX_POINTS),
            coords_range,
            max_voxels: DEFAULT_MAX_VOXELS,
            deterministic: true,
        }
    }

    /// Appends a scale with its own point cap.
    ///
    /// If the caps were shared so far, they become per-scale.
    pub fn with_scale(mut self, voxel_size: Vector<Real>, max_points: usize) -> Self {
        let mut caps = match self.max_points {
            MaxPoints::PerScale(caps) => caps,
            MaxPoints::Shared(shared) => alloc::vec![shared; self.voxel_sizes.len()],
        };
        caps.push(max_points);
        self.voxel_sizes.push(voxel_size);
        self.max_points = MaxPoints::PerScale(caps);
        self
    }

    /// Replaces the voxel sizes, leaving the point caps untouched.
    pub fn with_voxel_sizes(mut self, voxel_sizes: impl IntoIterator<Item = Vector<Real>>) -> Self {
        self.voxel_sizes = voxel_sizes.into_iter().collect();
        self
    }

    /// Uses the same point cap for every scale.
    pub fn with_shared_max_points(mut self, max_points: usize) -> Self {
        self.max_points = MaxPoints::Shared(max_points);
        self
    }

    /// Sets one point cap per scale.
    pub fn with_max_points_per_scale(mut self, caps: impl IntoIterator<Item = usize>) -> Self {
        self.max_points = MaxPoints::PerScale(caps.into_iter().collect());
        self
    }

    /// Sets the maximum number of voxels per scale.
    pub fn with_max_voxels(mut self, max_voxels: usize) -> Self {
        self.max_voxels = max_voxels;
        self
    }

    /// Requests the deterministic (`true`) or non-deterministic (`false`) variant.
    ///
    /// Voxelizing fails with [`VoxelizationError::NonDeterministicUnsupported`]
    /// when this is `false`.
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// The number of scales.
    pub fn num_scales(&self) -> usize {
        self.voxel_sizes.len()
    }

    /// Resolves and validates one [`ScaleConfig`] per scale, in output order.
    pub fn scale_configs(&self) -> Result<Vec<ScaleConfig>, VoxelizationError> {
        if !self.deterministic {
            return Err(VoxelizationError::NonDeterministicUnsupported);
        }

        let caps = self.max_points.resolve(self.voxel_sizes.len())?;
        self.coords_range.validate()?;

        self.voxel_sizes
            .iter()
            .zip(caps)
            .enumerate()
            .map(|(scale, (voxel_size, max_points))| {
                let config =
                    ScaleConfig::new(*voxel_size, self.coords_range, max_points, self.max_voxels);
                config.validate(scale).map(|_| config)
            })
            .collect()
    }
}
