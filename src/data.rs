mod point;
pub mod subdivision;

pub use point::Point;
pub use subdivision::{EdgeRef, QuadId, Subdivision, VertexId};
