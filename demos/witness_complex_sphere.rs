//! Witness complex timing on growing samples of the unit 3-sphere
//!
//! For each sample size, picks landmarks by farthest-point sampling from a
//! random start, builds the witness complex without relaxation, and reports
//! the elapsed time and simplex count. The timings are written as
//! `size, seconds` lines for plotting.

mod points;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use topocrate::prelude::*;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "witness_complex_sphere")]
#[command(about = "Time witness complex construction on points sampled from a sphere")]
struct Args {
    /// Number of landmarks
    landmarks: usize,

    /// Ambient dimension of the sphere samples
    #[arg(long, default_value_t = 4)]
    dimension: usize,

    /// Smallest sample size
    #[arg(long, default_value_t = 500)]
    start: usize,

    /// Sample sizes stay below this
    #[arg(long, default_value_t = 10000)]
    stop: usize,

    #[arg(long, default_value_t = 500)]
    step: usize,

    /// Largest simplex dimension
    #[arg(long, default_value_t = 4)]
    max_dimension: usize,

    /// Relaxation bound in squared distance units
    #[arg(long, default_value_t = 0.0)]
    max_alpha_square: f64,

    /// Random seed (thread RNG when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Timing output file
    #[arg(short, long, default_value = "w_time.dat")]
    output: PathBuf,
}

fn main() -> Result<()> {
    points::init_logging();
    let args = Args::parse();
    anyhow::ensure!(args.step > 0, "step must be positive");

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let config = WitnessConfig::default()
        .with_max_dimension(args.max_dimension)
        .with_max_alpha_square(args.max_alpha_square);

    let mut timings = Vec::new();
    for size in (args.start..args.stop).step_by(args.step) {
        let cloud = PointCloudD::from_points(points::sphere_points(size, args.dimension, &mut rng));
        println!("Successfully generated {} points.", cloud.len());
        if let Some(dimension) = cloud.dimension()? {
            println!("Ambient dimension is {}.", dimension);
        }

        let start = Instant::now();
        let indices = select_landmarks(
            cloud.as_slice(),
            args.landmarks,
            LandmarkPolicy::FarthestPoint(StartPoint::Random),
            args.seed.map(|s| s.wrapping_add(size as u64)),
        )
        .context("landmark selection failed")?;
        let landmarks = landmark_points(cloud.as_slice(), &indices)?;

        let mut complex = SimplexMap::new();
        WitnessComplex::new(&landmarks, cloud.as_slice())?.create_complex(&mut complex, &config)?;
        let seconds = start.elapsed().as_secs_f64();

        println!(
            "Witness complex for {} landmarks took {:.3} s.",
            args.landmarks, seconds
        );
        println!("Number of simplices is: {}", complex.num_simplices());
        info!(points = size, seconds, simplices = complex.num_simplices(), "sample done");
        timings.push((size, seconds));
    }

    let file = File::create(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    for (size, seconds) in &timings {
        writeln!(writer, "{}, {}", size, seconds)?;
    }
    writer.flush()?;
    info!(path = %args.output.display(), "timings written");

    Ok(())
}
