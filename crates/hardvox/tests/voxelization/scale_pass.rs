use super::support::{random_cloud, scale};
use hardvox::math::{Point, Real};
use hardvox::voxelization::{
    voxelize_scale, Assignment, CoordinateQuantizer, PointAssigner, PointCloud, VoxelKey,
};

#[test]
fn repeated_passes_are_bit_identical() {
    let data = random_cloud(42, 5_000, 4, 5.0);
    let cloud = PointCloud::new(&data, 4).unwrap();
    let config = scale(0.25, 5, 300);

    let a = voxelize_scale(&cloud, &config).unwrap();
    let b = voxelize_scale(&cloud, &config).unwrap();

    assert_eq!(a.coords(), b.coords());
    assert_eq!(a.num_points(), b.num_points());
    let bits = |r: &[Real]| r.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(a.features()), bits(b.features()));
}

#[test]
fn capacities_bound_every_voxel() {
    let data = random_cloud(7, 20_000, 5, 4.0);
    let cloud = PointCloud::new(&data, 5).unwrap();

    for (max_points, max_voxels) in [(1, 10), (3, 50), (16, 10_000)] {
        let config = scale(0.5, max_points, max_voxels);
        let result = voxelize_scale(&cloud, &config).unwrap();

        assert!(result.voxel_count() <= max_voxels);
        assert_eq!(
            result.features().len(),
            result.voxel_count() * max_points * 5
        );
        for voxel in result.voxels() {
            assert!(voxel.num_stored() <= max_points);
            assert_eq!(voxel.num_stored(), voxel.num_points().min(max_points));
            assert_eq!(voxel.points().count(), voxel.num_stored());
        }

        // Every point is either counted in a tally or dropped before reaching a voxel.
        let tallied: usize = result.num_points().iter().map(|n| *n as usize).sum();
        let drops = result.drops();
        assert_eq!(tallied + drops.out_of_range + drops.voxel_overflow, cloud.len());
    }
}

#[test]
fn padding_rows_are_zero() {
    let data = random_cloud(3, 2_000, 4, 4.0);
    let cloud = PointCloud::new(&data, 4).unwrap();
    let result = voxelize_scale(&cloud, &scale(0.5, 6, 1_000)).unwrap();

    for voxel in result.voxels() {
        let padded = voxel.padded_points();
        assert_eq!(padded.len(), 6 * 4);
        assert!(padded[voxel.num_stored() * 4..].iter().all(|v| *v == 0.0));
    }
}

#[test]
fn out_of_range_points_never_appear() {
    let data = random_cloud(11, 5_000, 4, 6.0);
    let cloud = PointCloud::new(&data, 4).unwrap();
    let config = scale(0.5, 64, 100_000);
    let result = voxelize_scale(&cloud, &config).unwrap();

    let expected_in_range = cloud
        .rows()
        .filter(|row| config.coords_range.contains_point(&Point::new(row[0], row[1], row[2])))
        .count();
    assert_eq!(result.drops().out_of_range, cloud.len() - expected_in_range);

    for voxel in result.voxels() {
        for row in voxel.points() {
            let pt = Point::new(row[0], row[1], row[2]);
            assert!(config.coords_range.contains_point(&pt));
        }
    }
}

#[test]
fn voxels_are_numbered_by_first_occurrence() {
    let data = random_cloud(5, 3_000, 4, 5.0);
    let cloud = PointCloud::new(&data, 4).unwrap();
    let config = scale(0.5, 4, 100_000);
    let quantizer = CoordinateQuantizer::new(&config);
    let result = voxelize_scale(&cloud, &config).unwrap();

    // Sequential reference scan: the first in-range point of each new voxel fixes its slot.
    let mut expected: Vec<Point<i32>> = Vec::new();
    for i in 0..cloud.len() {
        if let Some(coords) = quantizer.quantize_xyz(&cloud.xyz(i)) {
            if !expected.contains(&coords) {
                expected.push(coords);
            }
        }
    }

    assert_eq!(result.coords(), &expected[..]);
    for (slot, voxel) in result.voxels().enumerate() {
        assert_eq!(voxel.first_seen_order(), slot);
    }
}

#[test]
fn stored_coordinates_flip_back_to_xyz() {
    let data = random_cloud(9, 1_000, 4, 3.9);
    let cloud = PointCloud::new(&data, 4).unwrap();
    let config = scale(0.3, 8, 100_000);
    let result = voxelize_scale(&cloud, &config).unwrap();
    let mins = config.coords_range.mins;

    for voxel in result.voxels() {
        let first = voxel.points().next().unwrap();
        let independent = Point::new(
            ((first[0] - mins.x) / config.voxel_size.x).floor() as i32,
            ((first[1] - mins.y) / config.voxel_size.y).floor() as i32,
            ((first[2] - mins.z) / config.voxel_size.z).floor() as i32,
        );

        assert_eq!(voxel.coords(), independent);
        assert_eq!(
            voxel.coords_zyx(),
            [independent.z, independent.y, independent.x]
        );
        assert_eq!(VoxelKey(voxel.coords_zyx()).to_xyz(), voxel.coords());
    }
}

#[test]
fn assigner_reports_each_drop_kind() {
    let config = scale(1.0, 1, 1);
    let mut assigner = PointAssigner::new(&config, 3, 4).unwrap();

    assert_eq!(assigner.assign(&[0.5, 0.5, 0.5]), Assignment::Stored(0));
    assert_eq!(assigner.assign(&[0.7, 0.2, 0.9]), Assignment::VoxelFull(0));
    assert_eq!(assigner.assign(&[1.5, 0.5, 0.5]), Assignment::TableFull);
    assert_eq!(assigner.assign(&[-0.5, 0.5, 0.5]), Assignment::OutOfRange);
    assert_eq!(assigner.voxel_count(), 1);

    let drops = assigner.drops();
    assert_eq!(drops.point_overflow, 1);
    assert_eq!(drops.voxel_overflow, 1);
    assert_eq!(drops.out_of_range, 1);
    assert_eq!(drops.total(), 3);

    let result = assigner.finish();
    assert_eq!(result.num_points(), &[2]);
    assert_eq!(result.features(), &[0.5, 0.5, 0.5]);
}
