//! End-to-end use of the umbrella crate: a point cloud feeds landmark
//! selection, the witness complex and the alpha complex.

use topocrate::prelude::*;

fn grid(side: usize) -> PointCloudD {
    (0..side * side)
        .map(|i| point(&[(i % side) as f64, (i / side) as f64 + 0.01 * (i % 3) as f64]))
        .collect()
}

#[test]
fn test_point_cloud_through_both_builders() -> anyhow::Result<()> {
    let cloud = grid(5);
    assert_eq!(cloud.len(), 25);
    assert_eq!(cloud.dimension()?, Some(2));

    let indices = select_landmarks(cloud.as_slice(), 6, LandmarkPolicy::default(), Some(1))?;
    assert_eq!(indices[0], 0);
    let landmarks = landmark_points(cloud.as_slice(), &indices)?;
    for (landmark, &index) in landmarks.iter().zip(&indices) {
        assert_eq!(landmark, &cloud[index]);
    }

    let mut witnessed = SimplexMap::new();
    let config = WitnessConfig::default().with_max_dimension(2);
    WitnessComplex::new(&landmarks, cloud.as_slice())?.create_complex(&mut witnessed, &config)?;
    assert_eq!(witnessed.num_vertices(), 6);
    assert!(witnessed.is_monotone());

    let mut alpha = SimplexMap::new();
    build_alpha_complex(cloud.as_slice(), &[], true, false, f64::INFINITY, false, &mut alpha)?;
    assert_eq!(alpha.num_vertices(), cloud.len());
    assert_eq!(alpha.dimension(), Some(2));
    assert!(alpha.is_monotone());
    Ok(())
}

#[test]
fn test_mixed_dimensions_rejected_before_building() {
    let mut cloud = grid(2);
    cloud.push(point(&[0.0, 0.0, 1.0]));

    assert!(cloud.dimension().is_err());
    assert!(select_landmarks(cloud.as_slice(), 2, LandmarkPolicy::default(), None).is_err());
    let mut complex = SimplexMap::new();
    assert!(
        build_alpha_complex(cloud.as_slice(), &[], true, false, f64::INFINITY, false, &mut complex)
            .is_err()
    );
}
