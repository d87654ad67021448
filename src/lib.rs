pub mod algorithms;
pub mod data;
pub mod editor;
mod orientation;
pub mod render;

pub use orientation::{ccw, in_circle, in_circle_det, tri_area, Orientation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// A polygon ring needs at least three corners.
  InsufficientVertices,
  /// The editor rejected a command byte; state is untouched.
  UnknownCommand(u8),
  /// The subdivision no longer satisfies the quad-edge invariants.
  InvariantViolation,
  RenderFailure,
}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::InsufficientVertices => write!(f, "polygons need at least three vertices"),
      Error::UnknownCommand(cmd) => write!(f, "unknown command {:?}", char::from(*cmd)),
      Error::InvariantViolation => write!(f, "subdivision invariant violated"),
      Error::RenderFailure => write!(f, "could not render document"),
    }
  }
}

impl std::error::Error for Error {}
