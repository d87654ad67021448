//! Passive SVG views over the subdivision. Nothing here mutates the
//! store.

use ordered_float::OrderedFloat;
use svg::node::element::path::Data;
use svg::node::element::{Definitions, Group, Line, Marker, Path, Rectangle};
use svg::Document;

use crate::data::{EdgeRef, Point, Subdivision};
use crate::editor::Editor;

// Letter landscape, 100 units to the inch.
const PAGE_W: f64 = 1100.0;
const PAGE_H: f64 = 850.0;
const MARGIN: f64 = 50.0;

/// The editor's net as one printable document: a solid outline path
/// for cutting, dashed fold lines, and the cursor in red with an
/// arrowhead.
pub fn net(editor: &Editor) -> Document {
  let doc = Document::new()
    .set("width", "11in")
    .set("height", "8.5in")
    .set("viewBox", (0, 0, PAGE_W as i32, PAGE_H as i32))
    .add(
      Rectangle::new()
        .set("x", 0)
        .set("y", 0)
        .set("width", PAGE_W)
        .set("height", PAGE_H)
        .set("fill", "none")
        .set("stroke", "black"),
    )
    .add(Definitions::new().add(arrowhead()));

  let Some(cursor) = editor.cursor() else {
    return doc;
  };
  let sd = editor.subdivision();

  let mut transform = format!("translate({} {})", MARGIN, MARGIN);
  if editor.maximized() {
    let (small, big) = sd.bounding_box(cursor);
    let fit = fit_scale(big - small);
    transform.push_str(&format!(
      " scale({}) translate({} {})",
      fit, -small.x, -small.y
    ));
  }
  let mut g = Group::new().set("transform", transform);

  let outline = editor.perimeter();
  if outline.len() >= 2 {
    let mut data = Data::new().move_to((outline[0].x, outline[0].y));
    for p in &outline[1..] {
      data = data.line_to((p.x, p.y));
    }
    g = g.add(
      Path::new()
        .set("d", data.close())
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", 1),
    );
  }

  let mut folds: Vec<(Point, Point)> = sd
    .edges(cursor)
    .into_iter()
    .filter(|e| editor.is_internal(e.quad()))
    .map(|e| (sd.org(e), sd.dest(e)))
    .collect();
  folds.sort_by_key(|&(a, b)| {
    (
      OrderedFloat(a.x),
      OrderedFloat(a.y),
      OrderedFloat(b.x),
      OrderedFloat(b.y),
    )
  });
  for (a, b) in folds {
    g = g.add(
      line(a, b)
        .set("stroke", "black")
        .set("stroke-width", 1)
        .set("stroke-dasharray", "4 4"),
    );
  }

  g = g.add(
    line(sd.org(cursor), sd.dest(cursor))
      .set("stroke", "red")
      .set("stroke-width", 1)
      .set("marker-end", "url(#Triangle)"),
  );

  doc.add(g)
}

/// Every reachable edge as a thin blue stroke on landscape A4, in
/// millimetres. The triangulation driver converts this to PDF.
pub fn subdivision_lines(sd: &Subdivision, start: EdgeRef) -> Document {
  let mut doc = Document::new()
    .set("width", "297mm")
    .set("height", "210mm")
    .set("viewBox", (0, 0, 297, 210));
  for e in sd.edges(start) {
    doc = doc.add(
      line(sd.org(e), sd.dest(e))
        .set("stroke", "#00f")
        .set("stroke-width", 0.1),
    );
  }
  doc
}

fn arrowhead() -> Marker {
  Marker::new()
    .set("id", "Triangle")
    .set("viewBox", (0, 0, 10, 10))
    .set("refX", 1)
    .set("refY", 5)
    .set("markerWidth", 6)
    .set("markerHeight", 6)
    .set("orient", "auto")
    .add(Path::new().set("d", "M 0 0 L 10 5 L 0 10 z"))
}

fn line(a: Point, b: Point) -> Line {
  Line::new()
    .set("x1", a.x)
    .set("y1", a.y)
    .set("x2", b.x)
    .set("y2", b.y)
}

fn fit_scale(extent: Point) -> f64 {
  let sx = if extent.x > 0.0 {
    (PAGE_W - 2.0 * MARGIN) / extent.x
  } else {
    1.0
  };
  let sy = if extent.y > 0.0 {
    (PAGE_H - 2.0 * MARGIN) / extent.y
  } else {
    1.0
  };
  sx.min(sy)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_net_still_has_frame_and_marker() {
    let ed = Editor::new();
    let out = net(&ed).to_string();
    assert!(out.contains("marker"));
    assert!(out.contains("rect"));
    assert!(!out.contains("<g"));
  }

  #[test]
  fn net_draws_outline_folds_and_cursor() {
    let mut ed = Editor::new();
    ed.run("34").unwrap();
    let out = net(&ed).to_string();
    assert!(out.contains("stroke-dasharray"));
    assert!(out.contains("marker-end"));
    assert!(out.contains("stroke=\"red\""));
  }

  #[test]
  fn maximize_adds_fit_transform() {
    let mut ed = Editor::new();
    ed.run("3m").unwrap();
    let out = net(&ed).to_string();
    assert!(out.contains("scale("));
  }

  #[test]
  fn subdivision_lines_one_per_edge() {
    let mut sd = Subdivision::new();
    let e = sd
      .triangle(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(0.0, 10.0),
      )
      .unwrap();
    let out = subdivision_lines(&sd, e).to_string();
    assert_eq!(out.matches("<line").count(), 3);
  }
}
