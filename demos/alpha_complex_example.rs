//! Alpha complex of a random point cloud
//!
//! Builds the alpha complex in the requested variant and prints the number of
//! simplices per dimension together with a few vertex coordinates.

mod points;

use anyhow::Result;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use topocrate::prelude::*;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "alpha_complex_example")]
#[command(about = "Build an alpha complex of random points in the unit cube")]
struct Args {
    /// Number of points
    #[arg(short = 'n', long, default_value_t = 200)]
    points: usize,

    #[arg(short, long, default_value_t = 3)]
    dimension: usize,

    /// Use the floating point kernel for the triangulation
    #[arg(long)]
    fast: bool,

    /// Compute alpha values in exact arithmetic
    #[arg(long)]
    exact: bool,

    /// Give every point a random weight below this value
    #[arg(long)]
    max_weight: Option<f64>,

    /// Keep simplices with alpha value up to this
    #[arg(long, default_value_t = f64::INFINITY)]
    cutoff: f64,

    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    points::init_logging();
    let args = Args::parse();

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let cloud = PointCloudD::from_points(points::cube_points(args.points, args.dimension, &mut rng));
    let weights: Vec<f64> = match args.max_weight {
        Some(max) if max > 0.0 => (0..cloud.len()).map(|_| rng.gen_range(0.0..max)).collect(),
        _ => Vec::new(),
    };
    info!(points = cloud.len(), dimension = ?cloud.dimension()?, "point cloud ready");

    let alpha = AlphaComplex::new(cloud.as_slice(), &weights, args.fast, args.exact)?;
    println!("Variant: {:?}", alpha.variant());
    println!("Vertices: {} of {} points", alpha.num_vertices(), cloud.len());

    let mut complex = SimplexMap::new();
    let inserted = alpha.build(&mut complex, args.cutoff, false)?;
    println!("Inserted {} simplices", inserted);

    for dimension in 0..=complex.dimension().unwrap_or(0) {
        let (count, largest) = complex
            .simplices_of_dimension(dimension)
            .fold((0, f64::NEG_INFINITY), |(n, m), (_, f)| (n + 1, m.max(f)));
        println!(
            "  dimension {}: {} simplices, largest alpha value {:.6}",
            dimension, count, largest
        );
    }

    for vertex in (0..cloud.len()).take(3) {
        match alpha.get_point(vertex) {
            Ok(p) => println!("  vertex {} at {:?}", vertex, p.as_slice()),
            Err(e) => println!("  point {} is hidden: {}", vertex, e),
        }
    }

    Ok(())
}
