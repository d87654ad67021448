use std::collections::HashSet;
use std::f64::consts::{PI, TAU};

use crate::data::{EdgeRef, Point, QuadId, Subdivision};
use crate::Error;

/// Side length of the regular polygons attached by the digit
/// commands. Tabs are built on a 4-unit base and rescaled by
/// `attach`, so they always span one net edge.
pub const SIDE: f64 = 100.0;

const TAB_BASE: f64 = 4.0;
const TAB_MAX_ANGLE: f64 = PI / 4.0;

/// The polygon-net editor. One instance owns the subdivision and all
/// side tables; commands are dispatched one byte at a time and undo
/// replays the accepted history from a zero state.
///
/// The cursor is stored in travelling orientation: 'r' Syms it along
/// with toggling `reversed`, so the perimeter edge under the cursor
/// stays the same while its attach side flips. `attach` always glues
/// onto the right-hand side of the stored cursor.
pub struct Editor {
  sd: Subdivision,
  cursor: Option<EdgeRef>,
  reversed: bool,
  maximize: bool,
  internal: HashSet<QuadId>,
  tab_edge: HashSet<QuadId>,
  history: Vec<u8>,
}

impl Default for Editor {
  fn default() -> Editor {
    Editor::new()
  }
}

impl Editor {
  pub fn new() -> Editor {
    Editor {
      sd: Subdivision::new(),
      cursor: None,
      reversed: false,
      maximize: false,
      internal: HashSet::new(),
      tab_edge: HashSet::new(),
      history: Vec::new(),
    }
  }

  pub fn reset(&mut self) {
    *self = Editor::new();
  }

  //////////////////////////////////////////////////////////////////
  // Read-only views (used by the renderer and tests)

  pub fn subdivision(&self) -> &Subdivision {
    &self.sd
  }

  pub fn cursor(&self) -> Option<EdgeRef> {
    self.cursor
  }

  pub fn reversed(&self) -> bool {
    self.reversed
  }

  pub fn maximized(&self) -> bool {
    self.maximize
  }

  pub fn is_internal(&self, q: QuadId) -> bool {
    self.internal.contains(&q)
  }

  pub fn is_tab(&self, q: QuadId) -> bool {
    self.tab_edge.contains(&q)
  }

  pub fn history(&self) -> &[u8] {
    &self.history
  }

  /// The corners of the outer boundary, starting at the cursor's
  /// origin. Empty when the net is empty.
  pub fn perimeter(&self) -> Vec<Point> {
    let Some(cursor) = self.cursor else {
      return Vec::new();
    };
    let cap = 2 * self.sd.edges(cursor).len();
    let mut pts = vec![self.sd.org(cursor)];
    let mut e = self.step(cursor);
    let mut steps = 0;
    while e != cursor && steps < cap {
      pts.push(self.sd.org(e));
      e = self.step(e);
      steps += 1;
    }
    pts
  }

  pub fn render(&self) -> svg::Document {
    crate::render::svg::net(self)
  }

  //////////////////////////////////////////////////////////////////
  // Command interpreter

  /// Dispatches every byte of `cmds` in order, stopping at the first
  /// rejection. Bytes of a multi-byte UTF-8 sequence simply fail the
  /// match one at a time.
  pub fn run(&mut self, cmds: &str) -> Result<(), Error> {
    for cmd in cmds.bytes() {
      self.dispatch(cmd)?;
    }
    Ok(())
  }

  pub fn dispatch(&mut self, cmd: u8) -> Result<(), Error> {
    match cmd {
      b'3'..=b'9' => {
        let n = (cmd - b'0') as usize;
        let e = self.sd.ngon(n, SIDE)?;
        self.attach_and_move(e);
      }
      b'f' => {
        if let Some(c) = self.cursor {
          self.cursor = Some(self.forward_skip_tabs(c));
        }
      }
      b'b' => {
        if let Some(c) = self.cursor {
          self.cursor = Some(self.backward_skip_tabs(c));
        }
      }
      b'r' => {
        self.reversed = !self.reversed;
        if let Some(c) = self.cursor {
          self.cursor = Some(c.sym());
        }
      }
      b'm' => {
        self.maximize = !self.maximize;
      }
      b's' => {
        let doc = self.render();
        svg::save("hello.svg", &doc).map_err(|_| Error::RenderFailure)?;
        return Ok(());
      }
      b't' => {
        if self.cursor_attachable() {
          let e = self.tab()?;
          self.attach_and_move(e);
        }
      }
      b'v' => {
        if self.cursor_attachable() {
          if let Some(seam) = self.cursor {
            if let Some(e) = self.angle_aware_tab(seam)? {
              self.attach_and_move(e);
            }
          }
        }
      }
      b'u' => return self.undo(),
      b'z' => {
        self.reset();
        return Ok(());
      }
      _ => return Err(Error::UnknownCommand(cmd)),
    }
    self.history.push(cmd);
    Ok(())
  }

  /// Replays the whole history minus its last entry from a zero
  /// state. Quadratic over a session, which is fine for the short
  /// interactive sessions this serves.
  fn undo(&mut self) -> Result<(), Error> {
    let mut history = std::mem::take(&mut self.history);
    history.pop();
    self.reset();
    for cmd in history {
      // Replaying accepted commands cannot fail unless the
      // subdivision is corrupted.
      self.dispatch(cmd).map_err(|_| Error::InvariantViolation)?;
    }
    Ok(())
  }

  fn cursor_attachable(&self) -> bool {
    match self.cursor {
      None => true,
      Some(c) => !self.tab_edge.contains(&c.quad()),
    }
  }

  //////////////////////////////////////////////////////////////////
  // Perimeter navigation

  /// One step along the boundary in the cursor's travelling
  /// direction. The stored cursor keeps the boundary face on its
  /// right when `reversed` is false and on its left after 'r' Syms
  /// it, hence the switch between the right- and left-face orbits.
  fn step(&self, e: EdgeRef) -> EdgeRef {
    if self.reversed {
      self.sd.lnext(e)
    } else {
      self.sd.rprev(e)
    }
  }

  fn step_back(&self, e: EdgeRef) -> EdgeRef {
    if self.reversed {
      self.sd.lprev(e)
    } else {
      self.sd.rnext(e)
    }
  }

  fn forward_skip_tabs(&self, start: EdgeRef) -> EdgeRef {
    let mut e = self.step(start);
    while self.tab_edge.contains(&e.quad()) && e != start {
      e = self.step(e);
    }
    e
  }

  fn backward_skip_tabs(&self, start: EdgeRef) -> EdgeRef {
    let mut e = self.step_back(start);
    while self.tab_edge.contains(&e.quad()) && e != start {
      e = self.step_back(e);
    }
    e
  }

  //////////////////////////////////////////////////////////////////
  // Attachment

  /// Glues `e1`'s polygon along the cursor and advances the cursor
  /// to the next boundary edge. With no cursor yet, `e1` becomes the
  /// net.
  fn attach_and_move(&mut self, e1: EdgeRef) {
    let cursor = match self.cursor {
      None => {
        self.cursor = Some(e1);
        return;
      }
      Some(c) => c,
    };
    self.internal.insert(cursor.quad());
    let mut next = self.forward_skip_tabs(cursor);
    self.attach(cursor, e1);
    if next == cursor {
      // The whole boundary was tabs; continue on the fresh polygon.
      next = if self.reversed {
        self.sd.onext(cursor)
      } else {
        self.sd.oprev(cursor)
      };
    }
    self.cursor = Some(next);
  }

  /// Transforms `e2`'s polygon so its first edge coincides with `e1`
  /// reversed, then splices the two boundaries together and deletes
  /// the doubled edge. Zero-length edges make the rotation angle
  /// meaningless, so those abort silently.
  fn attach(&mut self, e1: EdgeRef, e2: EdgeRef) {
    let l1 = self.sd.edge_length(e1);
    let l2 = self.sd.edge_length(e2);
    if l1 == 0.0 || l2 == 0.0 {
      return;
    }
    let org = self.sd.org(e2);
    self.sd.translate(e2, -org);
    self.sd.scale(e2, l1 / l2);
    let rad = self.sd.edge_radians(e1) - self.sd.edge_radians(e2) + PI;
    self.sd.rotate(e2, rad);
    let dest = self.sd.dest(e1);
    self.sd.translate(e2, dest);

    let before = self.sd.oprev(e1);
    self.sd.splice(before, e2.sym());
    let after = self.sd.oprev(e2);
    self.sd.splice(e1.sym(), after);
    self.sd.delete_edge(e2);
  }

  //////////////////////////////////////////////////////////////////
  // Tabs

  /// Marks every edge of the polygon at `seam` except the seam
  /// itself, so navigation skips them.
  fn mark_tab(&mut self, seam: EdgeRef) {
    let mut e = self.sd.lnext(seam);
    while e != seam {
      self.tab_edge.insert(e.quad());
      e = self.sd.lnext(e);
    }
  }

  /// The fixed trapezoid tab: base 4, unit height, 45-degree
  /// shoulders.
  fn tab(&mut self) -> Result<EdgeRef, Error> {
    let e = self.sd.polygon(&[
      Point::new(0.0, 0.0),
      Point::new(TAB_BASE, 0.0),
      Point::new(3.0, 1.0),
      Point::new(1.0, 1.0),
    ])?;
    self.mark_tab(e);
    Ok(e)
  }

  /// A tab whose shoulder angles respect the room left at the seam's
  /// endpoints. Returns None when an endpoint has no room at all.
  fn angle_aware_tab(&mut self, seam: EdgeRef) -> Result<Option<EdgeRef>, Error> {
    // The attach transform maps the tab base reversed onto the seam:
    // local (0,0) lands on Dest(seam), local (4,0) on Org(seam).
    let alpha = TAB_MAX_ANGLE.min(self.slack_at_dest(seam));
    let beta = TAB_MAX_ANGLE.min(self.slack_at_org(seam));
    if alpha <= 0.0 || beta <= 0.0 {
      return Ok(None);
    }
    let e = self.sd.polygon(&tab_profile(alpha, beta))?;
    self.mark_tab(e);
    Ok(Some(e))
  }

  /// Free angle on the attach side at Dest(seam), measured between
  /// the seam's reverse and the following boundary edge.
  fn slack_at_dest(&self, seam: EdgeRef) -> f64 {
    let mut next = self.sd.rprev(seam);
    while self.tab_edge.contains(&next.quad()) && next != seam {
      next = self.sd.rprev(next);
    }
    let span = norm_angle(self.sd.edge_radians(next) - self.sd.edge_radians(seam.sym()));
    span - PI
  }

  /// Free angle on the attach side at Org(seam), measured between
  /// the seam and the preceding boundary edge reversed.
  fn slack_at_org(&self, seam: EdgeRef) -> f64 {
    let mut prev = self.sd.rnext(seam);
    while self.tab_edge.contains(&prev.quad()) && prev != seam {
      prev = self.sd.rnext(prev);
    }
    let span = norm_angle(self.sd.edge_radians(seam) - self.sd.edge_radians(prev.sym()));
    span - PI
  }
}

fn norm_angle(rad: f64) -> f64 {
  let r = rad % TAU;
  if r < 0.0 {
    r + TAU
  } else {
    r
  }
}

/// Corner list of a tab with base (0,0)-(4,0) and shoulder angles
/// `alpha` at the (0,0) end, `beta` at the (4,0) end. Triangular
/// when the natural apex stays below unit height, trapezoidal
/// (clipped at unit height) otherwise.
fn tab_profile(alpha: f64, beta: f64) -> Vec<Point> {
  let gamma = PI - alpha - beta;
  let shoulder = TAB_BASE * beta.sin() / gamma.sin();
  let apex_y = shoulder * alpha.sin();
  if apex_y < 1.0 {
    vec![
      Point::new(0.0, 0.0),
      Point::new(TAB_BASE, 0.0),
      Point::new(shoulder * alpha.cos(), apex_y),
    ]
  } else {
    vec![
      Point::new(0.0, 0.0),
      Point::new(TAB_BASE, 0.0),
      Point::new(TAB_BASE - 1.0 / beta.tan(), 1.0),
      Point::new(1.0 / alpha.tan(), 1.0),
    ]
  }
}
