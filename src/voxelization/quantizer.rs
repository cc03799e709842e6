use super::{CoordsRange, ScaleConfig};
use crate::math::{Point, Real, Vector};
use core::hash::{Hash, Hasher};
#[cfg(not(feature = "std"))]
use na::ComplexField;

/// Integer voxel-grid coordinates, stored in `(z, y, x)` order.
///
/// This reversed order is the one used by every internal voxel buffer. Results
/// handed to callers are flipped back to `(x, y, z)`, see [`VoxelKey::to_xyz`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VoxelKey(pub [i32; 3]);

// One word per axis, without the slice length prefix nor native-endian bytes.
impl Hash for VoxelKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.iter().for_each(|i| state.write_i32(*i));
    }
}

impl VoxelKey {
    /// Builds a key from `(x, y, z)` grid coordinates.
    #[inline]
    pub fn from_xyz(xyz: Point<i32>) -> Self {
        Self([xyz.z, xyz.y, xyz.x])
    }

    /// The `(z, y, x)` grid coordinates.
    #[inline]
    pub fn zyx(self) -> [i32; 3] {
        self.0
    }

    /// The grid coordinates, flipped back to `(x, y, z)`.
    #[inline]
    pub fn to_xyz(self) -> Point<i32> {
        Point::new(self.0[2], self.0[1], self.0[0])
    }
}

/// Maps spatial coordinates to voxel-grid coordinates for one scale.
///
/// Along each axis, `i = floor((c - min) / voxel_size)`. Points outside of the
/// half-open coordinate range (including points with NaN coordinates) are
/// rejected rather than clamped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateQuantizer {
    range: CoordsRange,
    voxel_size: Vector<Real>,
}

impl CoordinateQuantizer {
    /// A quantizer for the voxel size and coordinate range of `config`.
    #[inline]
    pub fn new(config: &ScaleConfig) -> Self {
        Self::from_parts(config.voxel_size, config.coords_range)
    }

    /// A quantizer for the given voxel size and coordinate range.
    ///
    /// The voxel size must be strictly positive on every axis.
    #[inline]
    pub fn from_parts(voxel_size: Vector<Real>, range: CoordsRange) -> Self {
        Self { range, voxel_size }
    }

    /// The voxel key of `pt`, or `None` if `pt` is out of range.
    #[inline]
    pub fn quantize(&self, pt: &Point<Real>) -> Option<VoxelKey> {
        self.quantize_xyz(pt).map(VoxelKey::from_xyz)
    }

    /// The `(x, y, z)` grid coordinates of `pt`, or `None` if `pt` is out of range.
    #[inline]
    pub fn quantize_xyz(&self, pt: &Point<Real>) -> Option<Point<i32>> {
        if !self.range.contains_point(pt) {
            return None;
        }

        let rel = pt - self.range.mins;
        Some(Point::new(
            (rel.x / self.voxel_size.x).floor() as i32,
            (rel.y / self.voxel_size.y).floor() as i32,
            (rel.z / self.voxel_size.z).floor() as i32,
        ))
    }
}
