use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use quadfold::algorithms::delaunay::triangulate;
use quadfold::data::Point;

fn disk_sites(n: usize) -> Vec<Point> {
  let mut rng = SmallRng::seed_from_u64(1);
  (0..n)
    .map(|_| loop {
      let x = rng.gen::<f64>() - 0.5;
      let y = rng.gen::<f64>() - 0.5;
      if x * x + y * y < 0.25 {
        break Point::new(x * 200.0 + 150.0, y * 200.0 + 105.0);
      }
    })
    .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
  let p1 = disk_sites(100);
  let p2 = disk_sites(1000);
  c.bench_function("triangulate(1e2)", |b| b.iter(|| triangulate(&p1)));
  c.bench_function("triangulate(1e3)", |b| b.iter(|| triangulate(&p2)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
