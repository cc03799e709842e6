//! Multi-scale hard voxelization of point clouds.
//!
//! A scale pass streams every point through three stages:
//! 1. the [`CoordinateQuantizer`] maps the point to a [`VoxelKey`], or rejects it
//!    if it lies outside of the coordinate range;
//! 2. the [`VoxelTable`] resolves the key to a slot, creating the voxel on first
//!    sight unless `max_voxels` voxels already exist;
//! 3. the [`PointAssigner`] appends the point to its voxel's buffer unless the
//!    voxel already stores `max_points` points, and counts it in the voxel's tally.
//!
//! [`voxelize`] runs one such pass per requested scale over the same points and
//! returns the per-scale [`ScaleResult`]s in request order. With the `parallel`
//! feature, scales run concurrently; the output is identical either way.

pub use self::config::{
    CoordsRange, MaxPoints, MultiScaleRequest, ScaleConfig, DEFAULT_MAX_POINTS,
    DEFAULT_MAX_VOXELS,
};
pub use self::dynamic::dynamic_voxelize;
pub use self::error::VoxelizationError;
pub use self::multi_scale::{voxelize, voxelize_scale, voxelize_scales};
pub use self::point_assigner::{Assignment, PointAssigner};
pub use self::point_cloud::PointCloud;
pub use self::quantizer::{CoordinateQuantizer, VoxelKey};
pub use self::reduction::Reduction;
pub use self::scale_result::{DropStats, ScaleResult, TransformResult, Voxel};
pub use self::voxel_table::{SlotLookup, VoxelTable};

mod config;
mod dynamic;
mod error;
mod multi_scale;
mod point_assigner;
mod point_cloud;
mod quantizer;
mod reduction;
mod scale_result;
mod voxel_table;
