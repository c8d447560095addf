//! Backend-neutral description of one globe frame
//!
//! `GlobeView` rebuilds a `DrawList` on every mutation; the wgpu backend
//! tessellates it, tests inspect it directly.

use glam::Vec2;

/// Straight RGBA, 0..1
pub type Color = [f32; 4];

/// Colors for globe elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.96, 0.97, 0.98, 1.0];
    /// Radial gradient, highlight to rim
    pub const SPHERE_INNER: Color = [0.365, 0.702, 1.0, 1.0];
    pub const SPHERE_OUTER: Color = [0.118, 0.435, 0.878, 1.0];
    /// Front curve of the accumulator currently written to
    pub const LAT_HOT: Color = [0.290, 0.871, 0.502, 0.95];
    pub const LON_HOT: Color = [0.376, 0.647, 0.980, 0.95];
    pub const CURVE_IDLE: Color = [1.0, 1.0, 1.0, 0.95];
    pub const CURVE_BACK: Color = [0.0, 0.0, 0.0, 0.12];
    pub const PLACEHOLDER: Color = [1.0, 1.0, 1.0, 0.25];
    pub const OUTLINE: Color = [1.0, 1.0, 1.0, 0.4];
    pub const FOUND_MARKER: Color = [1.0, 0.2, 0.2, 1.0];
    pub const TARGET_MARKER: Color = [0.980, 0.800, 0.082, 1.0];
    pub const MARKER_RING: Color = [1.0, 1.0, 1.0, 0.9];
    pub const LABEL: Color = [0.0, 0.0, 0.0, 1.0];
    pub const LABEL_DIM: Color = [0.333, 0.333, 0.333, 1.0];
}

/// Line color and width in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    /// Same stroke with alpha scaled (clamped to 1)
    pub fn with_alpha_scale(mut self, scale: f32) -> Self {
        self.color[3] = (self.color[3] * scale).min(1.0);
        self
    }
}

/// What a polyline depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Parallel,
    Meridian,
    Outline,
    Placeholder,
}

/// Which marker a disc stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Target,
    Found,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Filled disc with a radial gradient from `highlight` outwards
    Disc {
        center: Vec2,
        radius: f32,
        highlight: Vec2,
        inner: Color,
        outer: Color,
    },
    Polyline {
        points: Vec<Vec2>,
        stroke: Stroke,
        closed: bool,
        front: bool,
        kind: PathKind,
    },
    Marker {
        kind: MarkerKind,
        center: Vec2,
        radius: f32,
        fill: Color,
    },
    /// Text is laid out by the host page
    Label {
        anchor: Vec2,
        text: String,
        color: Color,
        bold: bool,
    },
}

/// Ordered primitives for one frame (painter's order)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    /// Square canvas edge in pixels
    pub size: u32,
    pub primitives: Vec<Primitive>,
}

impl DrawList {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            primitives: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Polylines of one kind, in draw order
    pub fn polylines(&self, kind: PathKind) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives
            .iter()
            .filter(move |p| matches!(p, Primitive::Polyline { kind: k, .. } if *k == kind))
    }

    pub fn marker(&self, kind: MarkerKind) -> Option<Vec2> {
        self.primitives.iter().find_map(|p| match p {
            Primitive::Marker {
                kind: k, center, ..
            } if *k == kind => Some(*center),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Index of the sphere disc, if drawn
    pub fn sphere_index(&self) -> Option<usize> {
        self.primitives
            .iter()
            .position(|p| matches!(p, Primitive::Disc { .. }))
    }
}
