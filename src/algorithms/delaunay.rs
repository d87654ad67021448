// Incremental Delaunay triangulation, following Guibas & Stolfi's
// InsertSite with Lawson edge flips (Lischinski's presentation).
use crate::data::{EdgeRef, Point, Subdivision};
use crate::orientation::in_circle;
use crate::Error;

/// Walks from `start` towards the triangle containing `x`. Returns
/// an edge with `x` on it or on its left face. Termination requires
/// the subdivision to be a triangulation whose outer face is a
/// triangle containing `x`.
pub fn locate(sd: &Subdivision, x: Point, start: EdgeRef) -> EdgeRef {
  let mut e = start;
  loop {
    if x == sd.org(e) || x == sd.dest(e) {
      return e;
    } else if sd.right_of(x, e) {
      e = e.sym();
    } else if !sd.right_of(x, sd.onext(e)) {
      e = sd.onext(e);
    } else if !sd.right_of(x, sd.dprev(e)) {
      e = sd.dprev(e);
    } else {
      return e;
    }
  }
}

/// Inserts the site `x`, keeping the triangulation Delaunay.
/// Sites coinciding with an existing vertex are no-ops; sites on an
/// existing edge delete that edge first.
pub fn insert_site(sd: &mut Subdivision, x: Point, start: EdgeRef) {
  let mut e = locate(sd, x, start);
  if x == sd.org(e) || x == sd.dest(e) {
    return;
  }
  if sd.on_edge(x, e) {
    e = sd.oprev(e);
    let covered = sd.onext(e);
    sd.delete_edge(covered);
  }

  // Connect x to the surrounding triangle (or quadrilateral).
  let mut base = sd.make_edge();
  let org = sd.org_id(e);
  sd.set_org_shared(base, org);
  sd.set_dest(base, x);
  sd.splice(base, e);
  let first = base;
  loop {
    base = sd.connect(e, base.sym());
    e = sd.oprev(base);
    if sd.lnext(e) == first {
      break;
    }
  }

  // Legalise: swap edges failing the in-circle test, rippling
  // outwards until we come back around to the first spoke.
  loop {
    let t = sd.oprev(e);
    if sd.right_of(sd.dest(t), e) && in_circle(sd.org(e), sd.dest(t), sd.dest(e), x) {
      sd.swap(e);
      e = sd.oprev(e);
    } else if sd.onext(e) == first {
      return;
    } else {
      let up = sd.onext(e);
      e = sd.lprev(up);
    }
  }
}

/// Builds a triangulation of `sites` inside a large bounding
/// triangle (side 1e4, centred on the origin). The bounding triangle
/// remains part of the subdivision; callers may filter it out.
pub fn triangulate(sites: &[Point]) -> Result<(Subdivision, EdgeRef), Error> {
  let mut sd = Subdivision::new();
  let e = sd.ngon(3, 1e4)?;
  for &site in sites {
    insert_site(&mut sd, site, e);
  }
  Ok((sd, e))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::VertexId;
  use crate::orientation::in_circle_det;
  use claims::assert_ok;

  fn bounding_triangle(sd: &mut Subdivision) -> EdgeRef {
    sd.triangle(
      Point::new(-1e4, -1e4),
      Point::new(1e4, -1e4),
      Point::new(0.0, 1e4),
    )
    .unwrap()
  }

  fn is_bounding(p: Point) -> bool {
    p.x.abs() == 1e4 || p.y.abs() == 1e4
  }

  /// V - E + F for the closed subdivision, faces counted as Lnext
  /// orbits over directed edges (the outer face included).
  fn euler_characteristic(sd: &Subdivision, e0: EdgeRef) -> isize {
    let primal = sd.edges(e0);
    let e = primal.len() as isize;

    let mut vertices: std::collections::HashSet<VertexId> = std::collections::HashSet::new();
    for &e1 in &primal {
      vertices.insert(sd.org_id(e1));
      vertices.insert(sd.dest_id(e1));
    }
    let v = vertices.len() as isize;

    let mut unvisited: std::collections::HashSet<EdgeRef> = primal
      .iter()
      .flat_map(|&e1| [e1, e1.sym()])
      .collect();
    let mut f = 0;
    while let Some(&start) = unvisited.iter().next() {
      f += 1;
      let mut e1 = start;
      loop {
        unvisited.remove(&e1);
        e1 = sd.lnext(e1);
        if e1 == start {
          break;
        }
      }
    }

    v - e + f
  }

  /// Every edge not touching the bounding triangle must pass the
  /// local empty-circumcircle test against the two opposite
  /// vertices.
  fn assert_locally_delaunay(sd: &Subdivision, e0: EdgeRef) {
    for e in sd.edges(e0) {
      let org = sd.org(e);
      let dest = sd.dest(e);
      let left = sd.dest(sd.lnext(e));
      let right = sd.dest(sd.lnext(e.sym()));
      if [org, dest, left, right].into_iter().any(is_bounding) {
        continue;
      }
      let det = in_circle_det(org, dest, left, right);
      assert!(
        det <= 0.0,
        "edge {:?} -> {:?} violates in-circle: {}",
        org,
        dest,
        det
      );
    }
  }

  #[test]
  fn smoke_four_sites() {
    let mut sd = Subdivision::new();
    let e0 = bounding_triangle(&mut sd);
    for site in [
      Point::new(10.0, 10.0),
      Point::new(90.0, 10.0),
      Point::new(50.0, 90.0),
      Point::new(50.0, 30.0),
    ] {
      insert_site(&mut sd, site, e0);
    }
    // 7 vertices, 3 of them on the hull: E = 3V - 3 - h = 15.
    assert_eq!(sd.edges(e0).len(), 15);
    assert_eq!(euler_characteristic(&sd, e0), 2);
    assert_locally_delaunay(&sd, e0);
  }

  #[test]
  fn duplicate_sites_are_noops() {
    let mut sd = Subdivision::new();
    let e0 = bounding_triangle(&mut sd);
    let site = Point::new(25.0, 25.0);
    insert_site(&mut sd, site, e0);
    let edges = sd.edges(e0).len();
    insert_site(&mut sd, site, e0);
    assert_eq!(sd.edges(e0).len(), edges);
  }

  #[test]
  fn site_on_edge_is_absorbed() {
    let mut sd = Subdivision::new();
    let e0 = bounding_triangle(&mut sd);
    insert_site(&mut sd, Point::new(-40.0, 0.0), e0);
    insert_site(&mut sd, Point::new(40.0, 0.0), e0);
    // Lands exactly on the edge between the two sites.
    insert_site(&mut sd, Point::new(0.0, 0.0), e0);
    assert_eq!(euler_characteristic(&sd, e0), 2);
    assert_locally_delaunay(&sd, e0);
  }

  #[test]
  fn triangulate_disk_sites() {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    let mut rng = SmallRng::seed_from_u64(7);
    let sites: Vec<Point> = (0..200)
      .map(|_| loop {
        let x = rng.gen::<f64>() - 0.5;
        let y = rng.gen::<f64>() - 0.5;
        if x * x + y * y < 0.25 {
          break Point::new(x * 200.0 + 150.0, y * 200.0 + 105.0);
        }
      })
      .collect();
    let (sd, e0) = assert_ok!(triangulate(&sites));
    assert_eq!(euler_characteristic(&sd, e0), 2);
  }

  use proptest::prelude::*;
  use test_strategy::proptest;

  // Integer coordinates keep every in-circle determinant exact, so
  // the local Delaunay check needs no tolerance.
  #[proptest]
  fn delaunay_property_holds(
    #[strategy(proptest::collection::vec((-100i32..100, -100i32..100), 1..40))] coords: Vec<(
      i32,
      i32,
    )>,
  ) {
    let mut sd = Subdivision::new();
    let e0 = bounding_triangle(&mut sd);
    for &(x, y) in &coords {
      insert_site(&mut sd, Point::new(x as f64, y as f64), e0);
    }
    prop_assert_eq!(euler_characteristic(&sd, e0), 2);
    assert_locally_delaunay(&sd, e0);
  }
}
