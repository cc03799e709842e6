use super::support::{scale, unit_range};
use hardvox::math::{Point, Real, Vector};
use hardvox::voxelization::{
    dynamic_voxelize, voxelize, voxelize_scale, voxelize_scales, CoordsRange, MaxPoints,
    MultiScaleRequest, PointAssigner, PointCloud, VoxelizationError, DEFAULT_MAX_POINTS,
    DEFAULT_MAX_VOXELS,
};

const POINTS: [Real; 8] = [0.5, 0.5, 0.5, 1.0, 1.5, 1.5, 1.5, 2.0];

fn cloud() -> PointCloud<'static> {
    PointCloud::new(&POINTS, 4).unwrap()
}

#[test]
fn point_layout_is_validated() {
    assert_eq!(
        PointCloud::new(&POINTS, 2),
        Err(VoxelizationError::InvalidPointDimension(2))
    );
    assert_eq!(
        PointCloud::new(&POINTS, 3),
        Err(VoxelizationError::RaggedPointData { len: 8, ndim: 3 })
    );

    let cloud = cloud();
    assert_eq!(cloud.len(), 2);
    assert_eq!(cloud.ndim(), 4);
    assert_eq!(cloud.point(1), &[1.5, 1.5, 1.5, 2.0]);
    assert_eq!(cloud.xyz(0), Point::new(0.5, 0.5, 0.5));
    assert_eq!(PointCloud::empty(1).ndim(), 3);
}

#[test]
fn scale_count_mismatch_is_rejected() {
    let err = voxelize(
        &cloud(),
        &[Vector::repeat(1.0), Vector::repeat(2.0)],
        &unit_range(),
        &MaxPoints::PerScale(vec![4]),
        10,
        true,
    );

    assert_eq!(
        err,
        Err(VoxelizationError::ScaleCountMismatch {
            voxel_sizes: 2,
            max_points: 1
        })
    );
}

#[test]
fn non_deterministic_mode_is_rejected() {
    let err = voxelize(
        &cloud(),
        &[Vector::repeat(1.0)],
        &unit_range(),
        &MaxPoints::Shared(4),
        10,
        false,
    );
    assert_eq!(err, Err(VoxelizationError::NonDeterministicUnsupported));
}

#[test]
fn invalid_voxel_sizes_are_rejected() {
    for bad in [
        Vector::new(1.0, 0.0, 1.0),
        Vector::new(1.0, 1.0, -0.5),
        Vector::new(Real::NAN, 1.0, 1.0),
        Vector::new(1.0, Real::INFINITY, 1.0),
    ] {
        let err = voxelize(
            &cloud(),
            &[Vector::repeat(1.0), bad],
            &unit_range(),
            &MaxPoints::Shared(4),
            10,
            true,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            VoxelizationError::InvalidVoxelSize { scale: 1, .. }
        ));
    }
}

#[test]
fn zero_capacities_and_empty_ranges_are_rejected() {
    assert_eq!(
        voxelize_scale(&cloud(), &scale(1.0, 0, 10)),
        Err(VoxelizationError::ZeroCapacity { scale: 0 })
    );
    assert_eq!(
        voxelize_scales(&cloud(), &[scale(1.0, 4, 10), scale(1.0, 4, 0)]),
        Err(VoxelizationError::ZeroCapacity { scale: 1 })
    );

    let flat = CoordsRange::from_xyzxyz([0.0, 0.0, 1.0, 4.0, 4.0, 1.0]);
    let err = voxelize(
        &cloud(),
        &[Vector::repeat(1.0)],
        &flat,
        &MaxPoints::Shared(4),
        10,
        true,
    );
    assert_eq!(err, Err(VoxelizationError::InvalidCoordsRange));
}

#[test]
fn unaddressable_point_buffers_are_rejected() {
    let huge = usize::MAX / 2;

    assert_eq!(
        voxelize_scale(&cloud(), &scale(1.0, huge, 1)),
        Err(VoxelizationError::CapacityOverflow { scale: 0 })
    );
    assert_eq!(
        voxelize_scales(&cloud(), &[scale(1.0, 4, 10), scale(1.0, huge, 10)]),
        Err(VoxelizationError::CapacityOverflow { scale: 1 })
    );

    let request = MultiScaleRequest::with_range(unit_range())
        .with_scale(Vector::repeat(1.0), 4)
        .with_scale(Vector::repeat(2.0), huge);
    assert_eq!(
        request.voxelize(&cloud()),
        Err(VoxelizationError::CapacityOverflow { scale: 1 })
    );

    assert!(matches!(
        PointAssigner::new(&scale(1.0, huge, 1), 4, 1),
        Err(VoxelizationError::CapacityOverflow { scale: 0 })
    ));

    // The cap alone fits, but not for every voxel the ceiling allows.
    assert!(matches!(
        PointAssigner::new(&scale(1.0, 1 << 20, usize::MAX / 4), 4, 1),
        Err(VoxelizationError::CapacityOverflow { scale: 0 })
    ));
}

#[test]
fn empty_clouds_only_need_the_per_voxel_block() {
    let empty = PointCloud::empty(4);
    let result = voxelize_scale(&empty, &scale(1.0, 1 << 20, usize::MAX / 4)).unwrap();
    assert!(result.is_empty());
    assert_eq!(
        scale(1.0, 1 << 20, usize::MAX / 4).voxel_block_len(0, 4, 0),
        Ok(4 << 20)
    );
}

#[test]
fn grids_beyond_32_bit_coordinates_are_rejected() {
    let tiny = Vector::repeat(1.0e-9);

    let err = voxelize_scale(&cloud(), &scale(1.0e-9, 4, 10)).unwrap_err();
    assert!(matches!(err, VoxelizationError::GridTooLarge { scale: 0, .. }));

    let err = dynamic_voxelize(&cloud(), &tiny, &unit_range()).unwrap_err();
    assert!(matches!(err, VoxelizationError::GridTooLarge { scale: 0, .. }));

    let err = voxelize(
        &cloud(),
        &[Vector::repeat(1.0), Vector::new(1.0, 1.0, 1.0e-9)],
        &unit_range(),
        &MaxPoints::Shared(4),
        10,
        true,
    )
    .unwrap_err();
    assert!(matches!(err, VoxelizationError::GridTooLarge { scale: 1, .. }));

    // 2^20 cells per axis is well within range.
    let fine = voxelize_scale(&cloud(), &scale(4.0 / (1 << 20) as Real, 4, 10)).unwrap();
    assert_eq!(fine.voxel_count(), 2);
    assert_eq!(fine.coords()[0], Point::new(1 << 17, 1 << 17, 1 << 17));
    assert_eq!(fine.coords()[1], Point::new(3 << 17, 3 << 17, 3 << 17));
}

#[test]
fn request_builder_resolves_scales() {
    let request = MultiScaleRequest::new([0.0, -39.68, -3.0, 69.12, 39.68, 1.0])
        .with_scale(Vector::new(0.16, 0.16, 4.0), 32)
        .with_scale(Vector::new(0.32, 0.32, 4.0), 64)
        .with_scale(Vector::new(0.64, 0.64, 4.0), 128);

    assert_eq!(request.num_scales(), 3);
    assert_eq!(request.max_voxels, DEFAULT_MAX_VOXELS);
    assert!(request.deterministic);

    let configs = request.scale_configs().unwrap();
    let caps: Vec<_> = configs.iter().map(|c| c.max_points).collect();
    assert_eq!(caps, [32, 64, 128]);
    assert!(configs.iter().all(|c| c.max_voxels == DEFAULT_MAX_VOXELS));
    assert!(configs.iter().all(|c| c.coords_range == request.coords_range));

    let shared = MultiScaleRequest::with_range(unit_range())
        .with_voxel_sizes([Vector::repeat(1.0), Vector::repeat(2.0)]);
    let configs = shared.scale_configs().unwrap();
    assert!(configs.iter().all(|c| c.max_points == DEFAULT_MAX_POINTS));

    let mixed = shared.with_scale(Vector::repeat(4.0), 3);
    assert_eq!(
        mixed.max_points,
        MaxPoints::PerScale(vec![DEFAULT_MAX_POINTS, DEFAULT_MAX_POINTS, 3])
    );
}

#[test]
fn grid_size_rounds_extents() {
    let range = CoordsRange::from_xyzxyz([0.0, -39.68, -3.0, 69.12, 39.68, 1.0]);
    assert_eq!(
        range.grid_size(&Vector::new(0.16, 0.16, 4.0)),
        Vector::new(432, 496, 1)
    );
    assert_eq!(range.extents().z, 4.0);
}

#[test]
fn errors_render_a_message() {
    let msg = VoxelizationError::ScaleCountMismatch {
        voxel_sizes: 3,
        max_points: 2,
    }
    .to_string();
    assert!(msg.contains("3 voxel sizes"));
    assert!(msg.contains("2 point caps"));
}
