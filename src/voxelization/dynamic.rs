use super::point_cloud::spatial;
use super::{CoordinateQuantizer, CoordsRange, PointCloud, ScaleConfig, VoxelizationError};
use crate::math::{Point, Real, Vector};
use alloc::vec::Vec;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Computes the `(x, y, z)` voxel coordinates of every point, without any capacity limit.
///
/// Unlike [`voxelize`](super::voxelize), no voxel table is built and no point
/// is dropped for capacity reasons: the `i`-th entry of the output is the voxel
/// of the `i`-th point, or `None` if that point is out of range.
pub fn dynamic_voxelize(
    points: &PointCloud,
    voxel_size: &Vector<Real>,
    coords_range: &CoordsRange,
) -> Result<Vec<Option<Point<i32>>>, VoxelizationError> {
    ScaleConfig::new(*voxel_size, *coords_range, 1, 1).validate(0)?;
    let quantizer = CoordinateQuantizer::from_parts(*voxel_size, *coords_range);

    #[cfg(not(feature = "parallel"))]
    let coords = points
        .rows()
        .map(|row| quantizer.quantize_xyz(&spatial(row)))
        .collect();

    #[cfg(feature = "parallel")]
    let coords = points
        .as_slice()
        .par_chunks_exact(points.ndim())
        .map(|row| quantizer.quantize_xyz(&spatial(row)))
        .collect();

    Ok(coords)
}
