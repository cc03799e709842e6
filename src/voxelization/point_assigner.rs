use super::point_cloud::spatial;
use super::{
    CoordinateQuantizer, DropStats, PointCloud, ScaleConfig, ScaleResult, SlotLookup, VoxelTable,
    VoxelizationError,
};
use crate::math::Real;
use alloc::vec::Vec;

/// What happened to a single point streamed through a [`PointAssigner`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Assignment {
    /// The point was copied into the buffer of the voxel at this slot.
    Stored(usize),
    /// The voxel at this slot was already full: the point was counted in its
    /// tally but not stored.
    VoxelFull(usize),
    /// The point lies outside of the coordinate range.
    OutOfRange,
    /// The point falls into a new voxel but the voxel ceiling was reached.
    TableFull,
}

/// Streams points into capacity-bounded voxels for one scale.
///
/// Each voxel owns a block of `max_points * ndim` values in a single dense
/// arena, zero-initialized when the voxel is created. A point is appended to
/// its voxel's block while there is room left; either way the voxel's tally is
/// incremented, so the tally counts every point that mapped into the voxel while
/// the stored length counts the points actually retained.
pub struct PointAssigner {
    config: ScaleConfig,
    quantizer: CoordinateQuantizer,
    table: VoxelTable,
    ndim: usize,
    block: usize,
    features: Vec<Real>,
    num_points: Vec<u32>,
    stored: Vec<u32>,
    drops: DropStats,
}

impl PointAssigner {
    /// An assigner for points of `ndim` values.
    ///
    /// The buffers are reserved for `min(max_voxels, expected_points)` voxels,
    /// which bounds the number of voxels a pass over `expected_points` points
    /// can create. Fails if `config` is invalid, or if the buffers of
    /// `max_voxels` full voxels could not be addressed.
    pub fn new(
        config: &ScaleConfig,
        ndim: usize,
        expected_points: usize,
    ) -> Result<Self, VoxelizationError> {
        config.validate(0)?;
        let block = config.voxel_block_len(0, ndim, usize::MAX)?;
        Ok(Self::with_block(config, ndim, block, expected_points))
    }

    /// An assigner whose `block` was checked for `expected_points` points.
    pub(crate) fn with_block(
        config: &ScaleConfig,
        ndim: usize,
        block: usize,
        expected_points: usize,
    ) -> Self {
        let expected_voxels = expected_points.min(config.max_voxels);
        Self {
            config: *config,
            quantizer: CoordinateQuantizer::new(config),
            table: VoxelTable::new(config.max_voxels, expected_voxels),
            ndim,
            block,
            features: Vec::with_capacity(expected_voxels * block),
            num_points: Vec::with_capacity(expected_voxels),
            stored: Vec::with_capacity(expected_voxels),
            drops: DropStats::default(),
        }
    }

    /// Assigns one point, given as a full row of `ndim` values.
    pub fn assign(&mut self, row: &[Real]) -> Assignment {
        debug_assert_eq!(row.len(), self.ndim);

        let Some(key) = self.quantizer.quantize(&spatial(row)) else {
            self.drops.out_of_range += 1;
            return Assignment::OutOfRange;
        };

        let slot = match self.table.lookup_or_insert(key) {
            SlotLookup::Existing(slot) => slot,
            SlotLookup::Inserted(slot) => {
                self.open_voxel();
                if self.table.is_full() {
                    log::trace!(
                        "voxel ceiling of {} reached, new voxels are dropped from now on",
                        self.config.max_voxels
                    );
                }
                slot
            }
            SlotLookup::Full => {
                self.drops.voxel_overflow += 1;
                return Assignment::TableFull;
            }
        };

        let stored = self.stored[slot] as usize;
        self.num_points[slot] += 1;

        if stored < self.config.max_points {
            let start = slot * self.block + stored * self.ndim;
            self.features[start..start + self.ndim].copy_from_slice(row);
            self.stored[slot] += 1;
            Assignment::Stored(slot)
        } else {
            self.drops.point_overflow += 1;
            Assignment::VoxelFull(slot)
        }
    }

    /// Assigns every point of `cloud`, in input order.
    pub fn assign_all(&mut self, cloud: &PointCloud) {
        for row in cloud.rows() {
            let _ = self.assign(row);
        }
    }

    /// The number of voxels created so far.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.table.len()
    }

    /// The points dropped so far.
    #[inline]
    pub fn drops(&self) -> DropStats {
        self.drops
    }

    /// Completes the pass.
    pub fn finish(self) -> ScaleResult {
        let coords = self
            .table
            .into_keys()
            .into_iter()
            .map(|key| key.to_xyz())
            .collect();

        ScaleResult {
            config: self.config,
            ndim: self.ndim,
            features: self.features,
            coords,
            num_points: self.num_points,
            stored: self.stored,
            drops: self.drops,
        }
    }

    fn open_voxel(&mut self) {
        self.features.resize(self.features.len() + self.block, 0.0);
        self.num_points.push(0);
        self.stored.push(0);
    }
}
