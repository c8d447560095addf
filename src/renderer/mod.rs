//! Globe rendering
//!
//! `draw_list` describes a frame without touching the GPU, `shapes`
//! tessellates it into triangles and `pipeline` draws them with wgpu.

pub mod draw_list;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use draw_list::{Color, DrawList, MarkerKind, PathKind, Primitive, Stroke};
pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
