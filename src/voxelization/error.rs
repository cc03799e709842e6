use crate::math::{Real, Vector};
use alloc::string::String;

/// Errors raised when a voxelization call is misconfigured.
///
/// Every variant is detected before any point is processed, so an error never
/// comes with a partial result. Points that are dropped because they fall out
/// of range or exceed a capacity limit are **not** errors: they are silently
/// excluded and can be observed through the returned voxel counts and tallies
/// (see [`DropStats`](crate::voxelization::DropStats)).
///
/// # Example
///
/// ```
/// # #[cfg(feature = "f32")] {
/// use hardvox::math::Vector;
/// use hardvox::voxelization::{MultiScaleRequest, PointCloud, VoxelizationError};
///
/// let points = [0.5, 0.5, 0.5, 1.0];
/// let cloud = PointCloud::new(&points, 4).unwrap();
///
/// // Two voxel sizes but three point caps.
/// let request = MultiScaleRequest::new([0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
///     .with_voxel_sizes([Vector::new(0.5, 0.5, 0.5), Vector::new(0.25, 0.25, 0.25)])
///     .with_max_points_per_scale([4, 8, 16]);
///
/// assert_eq!(
///     request.voxelize(&cloud),
///     Err(VoxelizationError::ScaleCountMismatch { voxel_sizes: 2, max_points: 3 })
/// );
/// # }
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VoxelizationError {
    /// The number of per-scale point caps differs from the number of voxel sizes.
    #[error("scale count mismatch: {voxel_sizes} voxel sizes but {max_points} point caps were given. Please assign a point cap to every scale.")]
    ScaleCountMismatch {
        /// Number of voxel sizes supplied.
        voxel_sizes: usize,
        /// Number of per-scale point caps supplied.
        max_points: usize,
    },
    /// A voxel size component is zero, negative, or not finite.
    #[error("the voxel size {size:?} of scale {scale} must be finite and strictly positive on every axis.")]
    InvalidVoxelSize {
        /// Index of the offending scale.
        scale: usize,
        /// The rejected voxel size.
        size: Vector<Real>,
    },
    /// `max_points` or `max_voxels` is zero for some scale.
    #[error("scale {scale} must allow at least one voxel and one point per voxel.")]
    ZeroCapacity {
        /// Index of the offending scale.
        scale: usize,
    },
    /// The voxel grid of some scale has more than `i32::MAX` cells along an axis.
    #[error("scale {scale} spans {cells:?} cells, beyond the range of 32-bit voxel coordinates.")]
    GridTooLarge {
        /// Index of the offending scale.
        scale: usize,
        /// `extent / voxel_size` along each axis.
        cells: Vector<Real>,
    },
    /// The point buffer of some scale cannot be addressed.
    #[error("the point buffer of scale {scale} would exceed the maximum allocation size.")]
    CapacityOverflow {
        /// Index of the offending scale.
        scale: usize,
    },
    /// The coordinate range is empty or not finite on some axis.
    #[error("the coordinate range must be finite and satisfy min < max on every axis.")]
    InvalidCoordsRange,
    /// Points must carry at least their three spatial coordinates.
    #[error("points must have at least 3 values (x, y, z), got {0}.")]
    InvalidPointDimension(usize),
    /// The flat point buffer does not hold a whole number of points.
    #[error("a point buffer of length {len} cannot be split into rows of {ndim} values.")]
    RaggedPointData {
        /// Length of the flat buffer.
        len: usize,
        /// Values per point.
        ndim: usize,
    },
    /// Only the deterministic, order-preserving voxelization is available.
    #[error("non-deterministic voxelization is not supported: `deterministic` must be true.")]
    NonDeterministicUnsupported,
    /// A reduction name other than `sum`, `mean` or `max`.
    #[error("unsupported reduction type `{0}`.")]
    UnknownReduction(String),
}
