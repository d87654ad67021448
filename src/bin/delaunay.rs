use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use quadfold::algorithms::delaunay;
use quadfold::data::Point;
use quadfold::render;

/// Triangulates random sites in a disk and writes the result as a
/// PDF of thin blue strokes.
#[derive(Parser)]
#[command(about = "Delaunay-triangulate random sites and plot them")]
struct Args {
  /// Number of random sites to insert.
  #[arg(long, default_value_t = 10_000)]
  sites: usize,
  /// Seed for reproducible runs; random otherwise.
  #[arg(long)]
  seed: Option<u64>,
  #[arg(long, default_value = "hello.pdf")]
  output: PathBuf,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt().init();
  let args = Args::parse();

  let mut rng = match args.seed {
    Some(seed) => SmallRng::seed_from_u64(seed),
    None => SmallRng::from_entropy(),
  };
  let sites: Vec<Point> = (0..args.sites).map(|_| disk_site(&mut rng)).collect();

  tracing::info!(sites = sites.len(), "inserting sites");
  let (sd, e) = delaunay::triangulate(&sites)?;
  tracing::info!(edges = sd.edges(e).len(), "triangulation done");

  let doc = render::svg::subdivision_lines(&sd, e);
  let pdf = render::pdf::from_svg(&doc.to_string())?;
  std::fs::write(&args.output, pdf)?;
  tracing::info!(output = %args.output.display(), "wrote plot");
  Ok(())
}

/// Uniform in the disk of radius 100 centred on (150, 105), by
/// rejection sampling the enclosing square.
fn disk_site<R: Rng>(rng: &mut R) -> Point {
  loop {
    let x = rng.gen::<f64>() - 0.5;
    let y = rng.gen::<f64>() - 0.5;
    if x * x + y * y < 0.25 {
      return Point::new(x * 200.0 + 150.0, y * 200.0 + 105.0);
    }
  }
}
