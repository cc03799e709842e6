use super::{ScaleConfig, VoxelKey};
use crate::math::{Point, Real};
use alloc::vec::Vec;
use core::ops::Index;
use core::slice::ChunksExact;

/// Counts of points silently excluded from a scale.
///
/// Drops are a policy of bounded voxelization, never an error.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DropStats {
    /// Points outside of the coordinate range.
    pub out_of_range: usize,
    /// Points falling into a voxel that could not be created because the
    /// voxel ceiling was reached.
    pub voxel_overflow: usize,
    /// Points counted in their voxel's tally but not stored because the voxel
    /// already held `max_points` points.
    pub point_overflow: usize,
}

impl DropStats {
    /// The number of points that do not appear in any voxel buffer.
    pub fn total(&self) -> usize {
        self.out_of_range + self.voxel_overflow + self.point_overflow
    }
}

/// The voxels produced for one scale, as dense arrays.
///
/// With `n = voxel_count()`, `m = max_points()` and `d = ndim()`:
/// - [`features`](Self::features) has shape `(n, m, d)`, each voxel's rows
///   zero-padded beyond its stored points;
/// - [`coords`](Self::coords) has shape `(n, 3)` in `(x, y, z)` order;
/// - [`num_points`](Self::num_points) has shape `(n,)` and holds the tallies.
///
/// Voxels appear in the order in which their first point appears in the input.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ScaleResult {
    pub(crate) config: ScaleConfig,
    pub(crate) ndim: usize,
    pub(crate) features: Vec<Real>,
    pub(crate) coords: Vec<Point<i32>>,
    pub(crate) num_points: Vec<u32>,
    pub(crate) stored: Vec<u32>,
    pub(crate) drops: DropStats,
}

impl ScaleResult {
    /// The configuration this scale was voxelized with.
    #[inline]
    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    /// The number of voxels.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.coords.len()
    }

    /// Is there no voxel at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The per-voxel point capacity.
    #[inline]
    pub fn max_points(&self) -> usize {
        self.config.max_points
    }

    /// The number of values per point.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// The `(voxel_count, max_points, ndim)` point buffer, flattened.
    #[inline]
    pub fn features(&self) -> &[Real] {
        &self.features
    }

    /// The `(x, y, z)` grid coordinates of each voxel.
    #[inline]
    pub fn coords(&self) -> &[Point<i32>] {
        &self.coords
    }

    /// The number of points that mapped into each voxel.
    ///
    /// This may exceed [`max_points`](Self::max_points); see
    /// [`stored_points`](Self::stored_points) for the number actually kept.
    #[inline]
    pub fn num_points(&self) -> &[u32] {
        &self.num_points
    }

    /// The number of points actually stored in each voxel buffer.
    #[inline]
    pub fn stored_points(&self) -> &[u32] {
        &self.stored
    }

    /// The points dropped while voxelizing this scale.
    #[inline]
    pub fn drops(&self) -> DropStats {
        self.drops
    }

    /// The `i`-th voxel.
    #[inline]
    pub fn voxel(&self, i: usize) -> Voxel<'_> {
        let block = self.config.max_points * self.ndim;
        Voxel {
            slot: i,
            coords: self.coords[i],
            num_points: self.num_points[i],
            stored: self.stored[i],
            ndim: self.ndim,
            block: &self.features[i * block..(i + 1) * block],
        }
    }

    /// Iterates through the voxels, in creation order.
    pub fn voxels(&self) -> impl ExactSizeIterator<Item = Voxel<'_>> + '_ {
        (0..self.voxel_count()).map(move |i| self.voxel(i))
    }

    /// Consumes this result, returning the `(features, coords, num_points)` arrays.
    pub fn into_arrays(self) -> (Vec<Real>, Vec<Point<i32>>, Vec<u32>) {
        (self.features, self.coords, self.num_points)
    }
}

/// A borrowed view of one voxel of a [`ScaleResult`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Voxel<'a> {
    slot: usize,
    coords: Point<i32>,
    num_points: u32,
    stored: u32,
    ndim: usize,
    block: &'a [Real],
}

impl<'a> Voxel<'a> {
    /// The `(x, y, z)` grid coordinates.
    #[inline]
    pub fn coords(&self) -> Point<i32> {
        self.coords
    }

    /// The grid coordinates in the internal `(z, y, x)` order.
    #[inline]
    pub fn coords_zyx(&self) -> [i32; 3] {
        VoxelKey::from_xyz(self.coords).zyx()
    }

    /// Position of this voxel in creation order.
    #[inline]
    pub fn first_seen_order(&self) -> usize {
        self.slot
    }

    /// The number of points that mapped into this voxel.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.num_points as usize
    }

    /// The number of points stored in this voxel.
    #[inline]
    pub fn num_stored(&self) -> usize {
        self.stored as usize
    }

    /// Iterates through the stored points, in input order.
    #[inline]
    pub fn points(&self) -> ChunksExact<'a, Real> {
        self.block[..self.num_stored() * self.ndim].chunks_exact(self.ndim)
    }

    /// The whole `max_points * ndim` block, zero padding included.
    #[inline]
    pub fn padded_points(&self) -> &'a [Real] {
        self.block
    }
}

/// The results of a multi-scale voxelization, one per requested scale, in
/// request order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TransformResult {
    scales: Vec<ScaleResult>,
}

impl TransformResult {
    pub(crate) fn new(scales: Vec<ScaleResult>) -> Self {
        Self { scales }
    }

    /// All the scales.
    #[inline]
    pub fn scales(&self) -> &[ScaleResult] {
        &self.scales
    }

    /// The `i`-th scale, if any.
    #[inline]
    pub fn scale(&self, i: usize) -> Option<&ScaleResult> {
        self.scales.get(i)
    }

    /// The number of scales.
    #[inline]
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    /// Were zero scales requested?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Iterates through the scales.
    pub fn iter(&self) -> core::slice::Iter<'_, ScaleResult> {
        self.scales.iter()
    }

    /// Consumes this result, returning the per-scale results.
    pub fn into_inner(self) -> Vec<ScaleResult> {
        self.scales
    }
}

impl Index<usize> for TransformResult {
    type Output = ScaleResult;

    fn index(&self, i: usize) -> &ScaleResult {
        &self.scales[i]
    }
}

impl IntoIterator for TransformResult {
    type Item = ScaleResult;
    type IntoIter = alloc::vec::IntoIter<ScaleResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.scales.into_iter()
    }
}

impl<'a> IntoIterator for &'a TransformResult {
    type Item = &'a ScaleResult;
    type IntoIter = core::slice::Iter<'a, ScaleResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.scales.iter()
    }
}

