use std::collections::HashSet;
use std::f64::consts::{PI, TAU};

use crate::data::Point;
use crate::orientation::ccw;
use crate::Error;

/* Quad Edge data structure from section 4.1 (for when a single
   orientation is sufficient) of

   Primitives for the Manipulation of General Subdivisions and the
   Computation of Voronoi Diagrams
   Leonidas Guibas and Jorge Stolfi
   ACM Transactions on Graphics, Vol. 4, No. 2, April 1985, pp. 74-123.
*/

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuadId(pub usize);

impl std::fmt::Debug for QuadId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "q{}", self.0)
  }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

impl std::fmt::Debug for VertexId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "v{}", self.0)
  }
}

impl VertexId {
  const INVALID: VertexId = VertexId(usize::MAX);

  pub fn is_valid(self) -> bool {
    self != VertexId::INVALID
  }
}

/// A directed edge handle: a record plus a rotation r in 0..4.
/// r=0 is the primal edge, r=2 its reverse; r=1 and r=3 are the dual
/// crossing edges. Equality and hashing are by value, so handles
/// produced independently for the same slot compare equal.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct EdgeRef {
  quad: QuadId,
  rot: u8,
}

impl std::fmt::Debug for EdgeRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "q{}:{}", self.quad.0, self.rot)
  }
}

impl EdgeRef {
  fn new(quad: QuadId, rot: u8) -> EdgeRef {
    EdgeRef { quad, rot }
  }

  pub fn quad(self) -> QuadId {
    self.quad
  }

  pub fn rot(self) -> EdgeRef {
    EdgeRef::new(self.quad, (self.rot + 1) % 4)
  }

  pub fn inv_rot(self) -> EdgeRef {
    EdgeRef::new(self.quad, (self.rot + 3) % 4)
  }

  pub fn sym(self) -> EdgeRef {
    EdgeRef::new(self.quad, (self.rot + 2) % 4)
  }
}

#[derive(Copy, Clone, Debug)]
struct Slot {
  next: EdgeRef,
  data: VertexId,
}

#[derive(Clone, Debug)]
struct QuadRecord {
  slots: [Slot; 4],
}

/// An arena of quad-edge records plus the vertex coordinates they
/// share. Records are never reclaimed; `delete_edge` only detaches
/// them, as in the paper.
///
/// Vertex storage: every edge of an origin ring holds the same
/// `VertexId`, written through the ring by `set_org`. Mutating the
/// vertex therefore moves the whole ring at once.
#[derive(Clone, Debug, Default)]
pub struct Subdivision {
  quads: Vec<QuadRecord>,
  vertices: Vec<Point>,
}

impl Subdivision {
  pub fn new() -> Subdivision {
    Subdivision::default()
  }

  fn slot(&self, e: EdgeRef) -> &Slot {
    &self.quads[e.quad.0].slots[e.rot as usize]
  }

  fn slot_mut(&mut self, e: EdgeRef) -> &mut Slot {
    &mut self.quads[e.quad.0].slots[e.rot as usize]
  }

  fn add_vertex(&mut self, p: Point) -> VertexId {
    let id = VertexId(self.vertices.len());
    self.vertices.push(p);
    id
  }

  //////////////////////////////////////////////////////////////////
  // Primitive algebraic operations

  pub fn onext(&self, e: EdgeRef) -> EdgeRef {
    self.slot(e).next
  }

  /// The Guibas-Stolfi splice. Its own inverse: it either joins the
  /// origin orbits of `a` and `b` or separates them, and does the
  /// dual operation on the crossing edges.
  pub fn splice(&mut self, a: EdgeRef, b: EdgeRef) {
    let alpha = self.onext(a).rot();
    let beta = self.onext(b).rot();

    let a_next = self.onext(a);
    let b_next = self.onext(b);
    let alpha_next = self.onext(alpha);
    let beta_next = self.onext(beta);

    self.slot_mut(a).next = b_next;
    self.slot_mut(b).next = a_next;
    self.slot_mut(alpha).next = beta_next;
    self.slot_mut(beta).next = alpha_next;
  }

  //////////////////////////////////////////////////////////////////
  // Derived algebraic operations

  pub fn oprev(&self, e: EdgeRef) -> EdgeRef {
    self.onext(e.rot()).rot()
  }

  pub fn dnext(&self, e: EdgeRef) -> EdgeRef {
    self.onext(e.sym()).sym()
  }

  pub fn dprev(&self, e: EdgeRef) -> EdgeRef {
    self.onext(e.inv_rot()).inv_rot()
  }

  pub fn lnext(&self, e: EdgeRef) -> EdgeRef {
    self.onext(e.inv_rot()).rot()
  }

  pub fn lprev(&self, e: EdgeRef) -> EdgeRef {
    self.onext(e).sym()
  }

  pub fn rnext(&self, e: EdgeRef) -> EdgeRef {
    self.onext(e.rot()).inv_rot()
  }

  pub fn rprev(&self, e: EdgeRef) -> EdgeRef {
    self.onext(e.sym())
  }

  //////////////////////////////////////////////////////////////////
  // Basic topological operators, p. 96

  /// Allocates a fresh record in the isolated-edge configuration:
  /// the primal slots are their own origin rings, the dual slots
  /// form one two-element ring.
  pub fn make_edge(&mut self) -> EdgeRef {
    let q = QuadId(self.quads.len());
    let e = |rot| EdgeRef::new(q, rot);
    self.quads.push(QuadRecord {
      slots: [
        Slot { next: e(0), data: VertexId::INVALID },
        Slot { next: e(3), data: VertexId::INVALID },
        Slot { next: e(2), data: VertexId::INVALID },
        Slot { next: e(1), data: VertexId::INVALID },
      ],
    });
    e(0)
  }

  //////////////////////////////////////////////////////////////////
  // Getters and setters for geometric data
  // These are the "Org" and "Dest" of section 6, p. 103, not rings
  // of edges as in the rest of the paper.

  pub fn org_id(&self, e: EdgeRef) -> VertexId {
    self.slot(e).data
  }

  pub fn dest_id(&self, e: EdgeRef) -> VertexId {
    self.org_id(e.sym())
  }

  pub fn org(&self, e: EdgeRef) -> Point {
    self.vertices[self.slot(e).data.0]
  }

  pub fn dest(&self, e: EdgeRef) -> Point {
    self.org(e.sym())
  }

  pub fn vertex(&self, v: VertexId) -> Point {
    self.vertices[v.0]
  }

  /// Writes `v` into every slot of the origin ring of `e`, so the
  /// whole ring keeps referring to one shared vertex.
  pub fn set_org_shared(&mut self, e: EdgeRef, v: VertexId) {
    self.slot_mut(e).data = v;
    let mut e1 = self.onext(e);
    while e1.quad != e.quad {
      self.slot_mut(e1).data = v;
      e1 = self.onext(e1);
    }
  }

  pub fn set_dest_shared(&mut self, e: EdgeRef, v: VertexId) {
    self.set_org_shared(e.sym(), v);
  }

  /// Allocates a fresh vertex at `p` and assigns it to the whole
  /// origin ring of `e`.
  pub fn set_org(&mut self, e: EdgeRef, p: Point) -> VertexId {
    let v = self.add_vertex(p);
    self.set_org_shared(e, v);
    v
  }

  pub fn set_dest(&mut self, e: EdgeRef, p: Point) -> VertexId {
    self.set_org(e.sym(), p)
  }

  //////////////////////////////////////////////////////////////////
  // Derived topological operators, p. 103

  /// Adds an edge from Dest(a) to Org(b) across the left face of a,
  /// meeting b.
  pub fn connect(&mut self, a: EdgeRef, b: EdgeRef) -> EdgeRef {
    let e = self.make_edge();
    let org = self.dest_id(a);
    self.set_org_shared(e, org);
    let dest = self.org_id(b);
    self.set_dest_shared(e, dest);
    self.splice(e, self.lnext(a));
    self.splice(e.sym(), b);
    e
  }

  /// Detaches `e` from both endpoint rings. The record stays in the
  /// arena but is no longer reachable from the subdivision.
  pub fn delete_edge(&mut self, e: EdgeRef) {
    self.splice(e, self.oprev(e));
    self.splice(e.sym(), self.oprev(e.sym()));
  }

  /// Turns `e` into the other diagonal of the quadrilateral formed
  /// by its two adjacent triangles.
  pub fn swap(&mut self, e: EdgeRef) {
    let a = self.oprev(e);
    let b = self.oprev(e.sym());
    self.splice(e, a);
    self.splice(e.sym(), b);
    self.splice(e, self.lnext(a));
    self.splice(e.sym(), self.lnext(b));
    let org = self.dest_id(a);
    self.set_org_shared(e, org);
    let dest = self.dest_id(b);
    self.set_dest_shared(e, dest);
  }

  //////////////////////////////////////////////////////////////////
  // Geometric predicates on edges

  pub fn right_of(&self, x: Point, e: EdgeRef) -> bool {
    ccw(x, self.dest(e), self.org(e))
  }

  pub fn left_of(&self, x: Point, e: EdgeRef) -> bool {
    ccw(x, self.org(e), self.dest(e))
  }

  pub fn on_edge(&self, x: Point, e: EdgeRef) -> bool {
    const EPS: f64 = 1e-6;
    let org = self.org(e);
    let dest = self.dest(e);
    let t1 = x.distance(org);
    let t2 = x.distance(dest);
    if t1 < EPS || t2 < EPS {
      return true;
    }
    let t3 = org.distance(dest);
    if t1 > t3 || t2 > t3 {
      return false;
    }
    // Plug x into the equation of the line through org and dest.
    ((x.y - org.y) * (dest.x - org.x) - (dest.y - org.y) * (x.x - org.x)).abs() < EPS
  }

  pub fn edge_length(&self, e: EdgeRef) -> f64 {
    self.org(e).distance(self.dest(e))
  }

  /// NaN for zero-length edges; callers that feed the result into a
  /// rotation must check the length first.
  pub fn edge_radians(&self, e: EdgeRef) -> f64 {
    let d = self.dest(e) - self.org(e);
    d.y.atan2(d.x)
  }

  //////////////////////////////////////////////////////////////////
  // Traversal

  /// Every distinct record reachable from `start`, as a dense list
  /// of canonical primal references. Deterministic given the start
  /// edge: breadth-first over records, scanning the inbound ring of
  /// each reference in discovery order.
  pub fn edges(&self, start: EdgeRef) -> Vec<EdgeRef> {
    let mut seen: HashSet<QuadId> = HashSet::new();
    seen.insert(start.quad);
    let mut index = vec![start];
    self.inbound(start.sym(), &mut seen, &mut index);
    let mut i = 0;
    while i < index.len() {
      let e = index[i];
      self.inbound(e, &mut seen, &mut index);
      i += 1;
    }
    index
  }

  fn inbound(&self, e1: EdgeRef, seen: &mut HashSet<QuadId>, index: &mut Vec<EdgeRef>) {
    let mut e2 = self.onext(e1);
    while e2 != e1 {
      if seen.insert(e2.quad) {
        index.push(e2.sym());
      }
      e2 = self.onext(e2);
    }
  }

  /// Min and max corner over org and dest of every edge reachable
  /// from `e`.
  pub fn bounding_box(&self, e: EdgeRef) -> (Point, Point) {
    let mut small = self.org(e);
    let mut big = small;
    for e1 in self.edges(e) {
      for p in [self.org(e1), self.dest(e1)] {
        small.x = small.x.min(p.x);
        small.y = small.y.min(p.y);
        big.x = big.x.max(p.x);
        big.y = big.y.max(p.y);
      }
    }
    (small, big)
  }

  //////////////////////////////////////////////////////////////////
  // Whole-component transforms

  /// Applies `f` to each distinct vertex of the connected component
  /// of `e0` exactly once. Shared vertices move with every edge that
  /// refers to them.
  pub fn map_component<F>(&mut self, e0: EdgeRef, f: F)
  where
    F: Fn(Point) -> Point,
  {
    let mut moved: HashSet<VertexId> = HashSet::new();
    for e in self.edges(e0) {
      for v in [self.org_id(e), self.dest_id(e)] {
        if v.is_valid() && moved.insert(v) {
          self.vertices[v.0] = f(self.vertices[v.0]);
        }
      }
    }
  }

  pub fn translate(&mut self, e0: EdgeRef, d: Point) {
    self.map_component(e0, |p| p + d);
  }

  pub fn scale(&mut self, e0: EdgeRef, factor: f64) {
    self.map_component(e0, |p| p * factor);
  }

  pub fn rotate(&mut self, e0: EdgeRef, rad: f64) {
    self.map_component(e0, |p| p.rotated(rad));
  }

  //////////////////////////////////////////////////////////////////
  // Polygon builders

  /// A simple closed polygon: n edges, edge i running pts[i] ->
  /// pts[i+1 mod n]. Returns the first edge; with pts in
  /// counter-clockwise order its left face is the interior.
  pub fn polygon(&mut self, pts: &[Point]) -> Result<EdgeRef, Error> {
    let n = pts.len();
    if n < 3 {
      return Err(Error::InsufficientVertices);
    }
    let vids: Vec<VertexId> = pts.iter().map(|&p| self.add_vertex(p)).collect();

    let e0 = self.make_edge();
    self.set_org_shared(e0, vids[0]);
    self.set_dest_shared(e0, vids[1]);

    let mut prev = e0;
    for i in 1..n {
      let e = self.make_edge();
      self.set_org_shared(e, vids[i]);
      self.set_dest_shared(e, vids[(i + 1) % n]);
      self.splice(prev.sym(), e);
      prev = e;
    }
    self.splice(prev.sym(), e0);
    Ok(e0)
  }

  /// Regular polygon with n sides of length `side_length`, centred
  /// on the origin.
  pub fn ngon(&mut self, n: usize, side_length: f64) -> Result<EdgeRef, Error> {
    if n < 3 {
      return Err(Error::InsufficientVertices);
    }
    let radius = (side_length / 2.0) / (PI / n as f64).sin();
    let pts: Vec<Point> = (0..n)
      .map(|i| {
        let (sin, cos) = (TAU * i as f64 / n as f64).sin_cos();
        Point::new(radius * cos, radius * sin)
      })
      .collect();
    self.polygon(&pts)
  }

  pub fn triangle(&mut self, a: Point, b: Point, c: Point) -> Result<EdgeRef, Error> {
    self.polygon(&[a, b, c])
  }

  pub fn rect(&mut self, a: Point, b: Point, c: Point, d: Point) -> Result<EdgeRef, Error> {
    self.polygon(&[a, b, c, d])
  }

  //////////////////////////////////////////////////////////////////
  // Splitting primitives

  /// Inserts a vertex at the midpoint of `e` and returns the new
  /// first half-edge, running from the old origin to the midpoint.
  /// `e` itself becomes the second half.
  pub fn halfsies(&mut self, e: EdgeRef) -> EdgeRef {
    let mid = self.org(e).midpoint(self.dest(e));
    self.split_at(e, mid)
  }

  /// Same topology as `halfsies` but the new vertex sits on the old
  /// origin: a zero-length sliver used to root a tab.
  pub fn split_back(&mut self, e: EdgeRef) -> EdgeRef {
    let org = self.org(e);
    self.split_at(e, org)
  }

  fn split_at(&mut self, e: EdgeRef, p: Point) -> EdgeRef {
    let old_org = self.org_id(e);
    let prev = self.oprev(e);
    self.splice(e, prev);
    let e1 = self.make_edge();
    self.splice(e1, prev);
    self.splice(e1.sym(), e);
    self.set_org_shared(e1, old_org);
    // Written through the merged dest ring, so Org(e) moves too.
    self.set_dest(e1, p);
    e1
  }
}
