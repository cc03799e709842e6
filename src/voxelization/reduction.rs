use super::{ScaleResult, VoxelizationError};
use crate::math::Real;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::str::FromStr;

/// How the stored points of a voxel are combined into one feature vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Reduction {
    /// Component-wise sum.
    Sum,
    /// Component-wise mean.
    Mean,
    /// Component-wise maximum.
    Max,
}

impl FromStr for Reduction {
    type Err = VoxelizationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "sum" => Ok(Reduction::Sum),
            "mean" => Ok(Reduction::Mean),
            "max" => Ok(Reduction::Max),
            _ => Err(VoxelizationError::UnknownReduction(name.to_string())),
        }
    }
}

impl ScaleResult {
    /// Reduces the stored points of each voxel, returning a `(voxel_count, ndim)` array.
    ///
    /// Only stored points participate: padding rows and points dropped by the
    /// per-voxel cap are ignored, and [`Reduction::Mean`] divides by the stored
    /// count rather than by the tally.
    pub fn reduce(&self, reduction: Reduction) -> Vec<Real> {
        let ndim = self.ndim();
        let mut out = Vec::with_capacity(self.voxel_count() * ndim);

        for voxel in self.voxels() {
            let start = out.len();
            let init = match reduction {
                Reduction::Sum | Reduction::Mean => 0.0,
                Reduction::Max => Real::NEG_INFINITY,
            };
            out.resize(start + ndim, init);
            let acc = &mut out[start..];

            for row in voxel.points() {
                for (a, v) in acc.iter_mut().zip(row) {
                    match reduction {
                        Reduction::Sum | Reduction::Mean => *a += *v,
                        Reduction::Max => *a = a.max(*v),
                    }
                }
            }

            if reduction == Reduction::Mean {
                let n = voxel.num_stored() as Real;
                acc.iter_mut().for_each(|a| *a /= n);
            }
        }

        out
    }
}
