use super::{
    CoordsRange, MaxPoints, MultiScaleRequest, PointAssigner, PointCloud, ScaleConfig,
    ScaleResult, TransformResult, VoxelizationError,
};
use crate::math::{Real, Vector};
use alloc::vec::Vec;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Voxelizes `points` at a single scale.
///
/// Voxels are numbered in the order in which their first in-range point
/// appears in `points`. At most `config.max_voxels` voxels are created and at
/// most `config.max_points` points are stored per voxel; every other point is
/// silently dropped.
pub fn voxelize_scale(
    points: &PointCloud,
    config: &ScaleConfig,
) -> Result<ScaleResult, VoxelizationError> {
    config.validate(0)?;
    let block = config.voxel_block_len(0, points.ndim(), points.len())?;
    Ok(run_scale(points, config, block, 0))
}

/// Voxelizes `points` once per configuration, returning the results in the same order.
///
/// Unlike [`voxelize`], each scale may use its own coordinate range and voxel
/// ceiling. Every configuration is validated before any point is processed.
pub fn voxelize_scales(
    points: &PointCloud,
    configs: &[ScaleConfig],
) -> Result<TransformResult, VoxelizationError> {
    for (scale, config) in configs.iter().enumerate() {
        config.validate(scale)?;
    }

    let blocks = block_lens(points, configs)?;
    Ok(TransformResult::new(run_scales(points, configs, &blocks)))
}

/// Voxelizes `points` at several scales sharing one coordinate range and voxel ceiling.
///
/// The `i`-th scale uses `voxel_sizes[i]` and the `i`-th point cap of
/// `max_points`. Results are returned in the same order as `voxel_sizes`.
///
/// Fails before processing any point if the configuration is invalid, or if
/// `deterministic` is `false`: only the deterministic, order-preserving
/// voxelization is implemented.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "f32")] {
/// use hardvox::math::Vector;
/// use hardvox::voxelization::{voxelize, CoordsRange, MaxPoints, PointCloud};
///
/// let points = [
///     0.1, 0.1, 0.1, 7.0, // x, y, z, intensity
///     0.2, 0.3, 0.1, 8.0,
///     1.5, 0.1, 0.1, 9.0,
/// ];
/// let cloud = PointCloud::new(&points, 4).unwrap();
/// let range = CoordsRange::from_xyzxyz([0.0, 0.0, 0.0, 2.0, 2.0, 2.0]);
///
/// let result = voxelize(
///     &cloud,
///     &[Vector::repeat(1.0), Vector::repeat(2.0)],
///     &range,
///     &MaxPoints::PerScale(vec![4, 8]),
///     100,
///     true,
/// )
/// .unwrap();
///
/// assert_eq!(result[0].voxel_count(), 2);
/// assert_eq!(result[0].num_points(), &[2, 1]);
/// assert_eq!(result[1].voxel_count(), 1);
/// assert_eq!(result[1].num_points(), &[3]);
/// # }
/// ```
pub fn voxelize(
    points: &PointCloud,
    voxel_sizes: &[Vector<Real>],
    coords_range: &CoordsRange,
    max_points: &MaxPoints,
    max_voxels: usize,
    deterministic: bool,
) -> Result<TransformResult, VoxelizationError> {
    let request = MultiScaleRequest {
        voxel_sizes: voxel_sizes.to_vec(),
        max_points: max_points.clone(),
        coords_range: *coords_range,
        max_voxels,
        deterministic,
    };
    request.voxelize(points)
}

impl MultiScaleRequest {
    /// Voxelizes `points` at every scale of this request.
    ///
    /// See [`voxelize`] for details.
    pub fn voxelize(&self, points: &PointCloud) -> Result<TransformResult, VoxelizationError> {
        let configs = self.scale_configs()?;
        let blocks = block_lens(points, &configs)?;
        Ok(TransformResult::new(run_scales(points, &configs, &blocks)))
    }
}

fn block_lens(
    points: &PointCloud,
    configs: &[ScaleConfig],
) -> Result<Vec<usize>, VoxelizationError> {
    configs
        .iter()
        .enumerate()
        .map(|(scale, config)| config.voxel_block_len(scale, points.ndim(), points.len()))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_scales(points: &PointCloud, configs: &[ScaleConfig], blocks: &[usize]) -> Vec<ScaleResult> {
    configs
        .iter()
        .zip(blocks)
        .enumerate()
        .map(|(scale, (config, block))| run_scale(points, config, *block, scale))
        .collect()
}

// Each scale owns its table and buffers. The indexed collect keeps the
// results in scale order whatever the completion order.
#[cfg(feature = "parallel")]
fn run_scales(points: &PointCloud, configs: &[ScaleConfig], blocks: &[usize]) -> Vec<ScaleResult> {
    configs
        .par_iter()
        .zip(blocks)
        .enumerate()
        .map(|(scale, (config, block))| run_scale(points, config, *block, scale))
        .collect()
}

fn run_scale(points: &PointCloud, config: &ScaleConfig, block: usize, scale: usize) -> ScaleResult {
    let mut assigner = PointAssigner::with_block(config, points.ndim(), block, points.len());
    assigner.assign_all(points);
    let result = assigner.finish();

    let drops = result.drops();
    log::debug!(
        "scale {}: {} voxels from {} points (dropped: {} out of range, {} over the voxel ceiling, {} over the point cap)",
        scale,
        result.voxel_count(),
        points.len(),
        drops.out_of_range,
        drops.voxel_overflow,
        drops.point_overflow,
    );

    result
}
