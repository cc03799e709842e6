use super::VoxelizationError;
use crate::math::{Point, Real, DIM};
use core::slice::ChunksExact;

/// A borrowed, row-major `(num_points, ndim)` point buffer.
///
/// The first three values of each row are the spatial `x, y, z` coordinates.
/// Any remaining values are opaque per-point features (intensity, timestamp,
/// …) that are copied verbatim into the voxel buffers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointCloud<'a> {
    data: &'a [Real],
    ndim: usize,
}

impl<'a> PointCloud<'a> {
    /// Wraps a flat buffer holding `data.len() / ndim` points of `ndim` values each.
    pub fn new(data: &'a [Real], ndim: usize) -> Result<Self, VoxelizationError> {
        if ndim < DIM {
            return Err(VoxelizationError::InvalidPointDimension(ndim));
        }

        if data.len() % ndim != 0 {
            return Err(VoxelizationError::RaggedPointData {
                len: data.len(),
                ndim,
            });
        }

        Ok(Self { data, ndim })
    }

    /// A cloud without any point.
    ///
    /// `ndim` is clamped to at least 3.
    pub fn empty(ndim: usize) -> Self {
        Self {
            data: &[],
            ndim: ndim.max(DIM),
        }
    }

    /// The number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.ndim
    }

    /// Does this cloud contain no point?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The number of values per point, spatial coordinates included.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// The flat underlying buffer.
    #[inline]
    pub fn as_slice(&self) -> &'a [Real] {
        self.data
    }

    /// All the values of the `i`-th point.
    #[inline]
    pub fn point(&self, i: usize) -> &'a [Real] {
        &self.data[i * self.ndim..(i + 1) * self.ndim]
    }

    /// The spatial coordinates of the `i`-th point.
    #[inline]
    pub fn xyz(&self, i: usize) -> Point<Real> {
        spatial(self.point(i))
    }

    /// Iterates through the points, in input order.
    #[inline]
    pub fn rows(&self) -> ChunksExact<'a, Real> {
        self.data.chunks_exact(self.ndim)
    }
}

#[inline]
pub(crate) fn spatial(row: &[Real]) -> Point<Real> {
    Point::new(row[0], row[1], row[2])
}
