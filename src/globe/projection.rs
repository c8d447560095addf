//! Orthographic projection of latitude/longitude onto the screen
//!
//! A point is converted to the unit sphere with its longitude offset by the
//! current spin, tilted about the screen X axis, then scaled by the sphere
//! radius. `depth` is the forward component; `depth >= 0` faces the viewer.

use glam::{Mat3, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_CANVAS_SIZE, MIN_SPHERE_RADIUS, PARALLEL_CENTERING_BIAS_DEG};
use crate::spherical_to_cartesian;

/// Two-axis globe rotation (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationState {
    /// Horizontal spin, unbounded
    pub spin_deg: f32,
    /// Vertical tilt about the screen X axis
    pub tilt_deg: f32,
}

impl RotationState {
    pub const fn new(spin_deg: f32, tilt_deg: f32) -> Self {
        Self { spin_deg, tilt_deg }
    }
}

/// Depth tolerance (pixels) for samples on the limb, e.g. the poles at zero tilt
pub const LIMB_EPSILON: f32 = 1e-3;

/// A projected point in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    /// Forward component scaled by radius (positive toward the viewer)
    pub depth: f32,
}

impl ProjectedPoint {
    /// True on the hemisphere facing the viewer
    #[inline]
    pub fn is_front(&self) -> bool {
        self.depth >= -LIMB_EPSILON
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Square canvas the globe is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Edge length in pixels
    pub size: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(420)
    }
}

impl Viewport {
    pub fn new(size: u32) -> Self {
        Self {
            size: size.max(MIN_CANVAS_SIZE),
        }
    }

    /// Canvas sized from the window height (a third of it, enlarged by 40%)
    pub fn from_window_height(height: f32) -> Self {
        Self::new((height.max(0.0) / 3.0 * 1.4).floor() as u32)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.size as f32 / 2.0)
    }

    /// Sphere radius, leaving a 4px margin for the outline stroke
    #[inline]
    pub fn radius(&self) -> f32 {
        (self.size as f32 / 2.0 - 4.0).max(MIN_SPHERE_RADIUS)
    }
}

/// Project a coordinate under `rotation` onto a sphere of `radius` at `center`.
///
/// `parallel_bias` adds the small fixed longitude offset used only when
/// sampling parallels.
pub fn project(
    lat_deg: f32,
    lon_deg: f32,
    rotation: RotationState,
    center: Vec2,
    radius: f32,
    parallel_bias: bool,
) -> ProjectedPoint {
    let bias = if parallel_bias {
        PARALLEL_CENTERING_BIAS_DEG
    } else {
        0.0
    };
    let phi = lat_deg.to_radians();
    let lambda = (lon_deg + rotation.spin_deg + bias).to_radians();

    let p = Mat3::from_rotation_x(rotation.tilt_deg.to_radians()) * spherical_to_cartesian(phi, lambda);

    ProjectedPoint {
        x: center.x + radius * p.x,
        y: center.y - radius * p.y,
        depth: radius * p.z,
    }
}

/// Project against a viewport's own center and radius
#[inline]
pub fn project_in(
    viewport: &Viewport,
    lat_deg: f32,
    lon_deg: f32,
    rotation: RotationState,
    parallel_bias: bool,
) -> ProjectedPoint {
    project(
        lat_deg,
        lon_deg,
        rotation,
        viewport.center(),
        viewport.radius(),
        parallel_bias,
    )
}
