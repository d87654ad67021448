mod delaunay {
  use quadfold::algorithms::delaunay::{insert_site, triangulate};
  use quadfold::data::{EdgeRef, Point, Subdivision};
  use quadfold::in_circle_det;
  use quadfold::Error;

  use rand::rngs::SmallRng;
  use rand::{Rng, SeedableRng};

  fn bounding_triangle(sd: &mut Subdivision) -> EdgeRef {
    sd.triangle(
      Point::new(-1e4, -1e4),
      Point::new(1e4, -1e4),
      Point::new(0.0, 1e4),
    )
    .unwrap()
  }

  fn face_count(sd: &Subdivision, e0: EdgeRef) -> usize {
    let mut unvisited: std::collections::HashSet<EdgeRef> = sd
      .edges(e0)
      .into_iter()
      .flat_map(|e| [e, e.sym()])
      .collect();
    let mut faces = 0;
    while let Some(&start) = unvisited.iter().next() {
      faces += 1;
      let mut e = start;
      loop {
        unvisited.remove(&e);
        e = sd.lnext(e);
        if e == start {
          break;
        }
      }
    }
    faces
  }

  fn vertex_count(sd: &Subdivision, e0: EdgeRef) -> usize {
    let mut vertices = std::collections::HashSet::new();
    for e in sd.edges(e0) {
      vertices.insert(sd.org_id(e));
      vertices.insert(sd.dest_id(e));
    }
    vertices.len()
  }

  fn assert_euler(sd: &Subdivision, e0: EdgeRef) {
    let v = vertex_count(sd, e0) as isize;
    let e = sd.edges(e0).len() as isize;
    let f = face_count(sd, e0) as isize;
    assert_eq!(v - e + f, 2, "V={} E={} F={}", v, e, f);
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
    // Seven vertices, three on the hull: E = 3V - 3 - h.
    assert_eq!(sd.edges(e0).len(), 15);
    assert_eq!(vertex_count(&sd, e0), 7);
    assert_euler(&sd, e0);

    // Every interior edge passes the local empty-circumcircle test.
    let on_hull = |p: Point| p.x.abs() == 1e4 || p.y.abs() == 1e4;
    for e in sd.edges(e0) {
      let quad = [
        sd.org(e),
        sd.dest(e),
        sd.dest(sd.lnext(e)),
        sd.dest(sd.lnext(e.sym())),
      ];
      if quad.into_iter().any(on_hull) {
        continue;
      }
      assert!(in_circle_det(quad[0], quad[1], quad[2], quad[3]) <= 0.0);
    }
  }

  #[test]
  fn triangulate_retains_every_site() -> Result<(), Error> {
    let mut rng = SmallRng::seed_from_u64(3);
    let sites: Vec<Point> = (0..300)
      .map(|_| {
        Point::new(
          (rng.gen::<f64>() - 0.5) * 150.0,
          (rng.gen::<f64>() - 0.5) * 150.0,
        )
      })
      .collect();
    let (sd, e0) = triangulate(&sites)?;
    assert_euler(&sd, e0);

    let mut coords = std::collections::HashSet::new();
    for e in sd.edges(e0) {
      for p in [sd.org(e), sd.dest(e)] {
        coords.insert((p.x.to_bits(), p.y.to_bits()));
      }
    }
    for site in &sites {
      assert!(coords.contains(&(site.x.to_bits(), site.y.to_bits())));
    }
    Ok(())
  }
}
