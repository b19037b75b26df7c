//! Basic usage example for topocrate
//!
//! This example demonstrates fundamental operations:
//! - Creating point clouds
//! - Selecting landmarks
//! - Building witness and alpha complexes into one target type

use topocrate::prelude::*;

fn print_complex(name: &str, complex: &SimplexMap) {
    println!("{}: {} simplices", name, complex.num_simplices());
    for (simplex, value) in complex.iter() {
        println!("  {:?} at {}", simplex, value);
    }
}

fn main() -> anyhow::Result<()> {
    println!("topocrate Umbrella Crate Example");
    println!("================================");

    // Corners of the unit square plus its center
    let cloud = PointCloudD::from_points(vec![
        point(&[0.0, 0.0]),
        point(&[1.0, 0.0]),
        point(&[1.0, 1.0]),
        point(&[0.0, 1.0]),
        point(&[0.5, 0.5]),
    ]);
    println!("Created point cloud with {} points", cloud.len());
    println!("- Point cloud is empty: {}", cloud.is_empty());
    println!("- Squared distances to the center: {:?}", cloud.squared_distances_to(&cloud[4]));

    // Witness complex on the four corners, every point witnessing
    let indices = select_landmarks(cloud.as_slice(), 4, LandmarkPolicy::default(), Some(7))?;
    let landmarks = landmark_points(cloud.as_slice(), &indices)?;
    println!("\nLandmarks (farthest point order): {:?}", indices);

    let builder = WitnessComplex::new(&landmarks, cloud.as_slice())?;
    let mut strict = SimplexMap::new();
    builder.create_complex(
        &mut strict,
        &WitnessConfig::default()
            .with_max_dimension(2)
            .with_max_alpha_square(0.0),
    )?;
    print_complex("Witness complex without relaxation", &strict);

    let mut filtered = SimplexMap::new();
    build_witness_complex(
        &landmarks,
        cloud.as_slice(),
        2,
        FiltrationMode::MinimalRelaxation,
        &mut filtered,
    )?;
    print_complex("\nFull witness filtration", &filtered);

    // Alpha complex of all five points
    let mut alpha = SimplexMap::new();
    build_alpha_complex(cloud.as_slice(), &[], false, false, f64::INFINITY, false, &mut alpha)?;
    print_complex("\nAlpha complex", &alpha);

    println!("\nExample completed successfully!");
    Ok(())
}
