//! Globe Hunt - steer a latitude/longitude accumulator onto a hidden city
//!
//! Core modules:
//! - `sim`: Deterministic game core (scheduler, platform numbers, scoring, session)
//! - `globe`: Spherical projection, rotation and the globe view model
//! - `renderer`: Draw lists, tessellation and the WebGPU pipeline
//! - `catalog`: The fixed city catalog
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod catalog;
pub mod error;
pub mod globe;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::City;
pub use error::{EffectRejection, OperatorRejection, QuizRejection};
pub use globe::{GlobeView, ProjectedPoint, RotationState};
pub use settings::{ColorPreset, Settings};
pub use sim::GameEngine;
pub use tuning::Tuning;

use glam::Vec3;

/// Geometry constants
pub mod consts {
    /// Samples taken along every parallel and meridian
    pub const CURVE_SAMPLES: usize = 180;
    /// Manual drag tilt limit (degrees)
    pub const MAX_DRAG_TILT_DEG: f32 = 60.0;
    /// Longitude bias applied to parallels only, keeps them visually centred
    pub const PARALLEL_CENTERING_BIAS_DEG: f32 = 1.5;
    /// Smallest canvas edge in pixels
    pub const MIN_CANVAS_SIZE: u32 = 168;
    /// Smallest sphere radius in pixels
    pub const MIN_SPHERE_RADIUS: f32 = 10.0;
}

/// Wrap degrees to [-180, 180). Non-finite input is returned unchanged.
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return deg;
    }
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= 180.0 { -180.0 } else { wrapped }
}

/// Convert latitude/longitude (radians) to a point on the unit sphere.
///
/// +Z faces the viewer, +Y is north, +X is east of the facing meridian.
#[inline]
pub fn spherical_to_cartesian(phi: f32, lambda: f32) -> Vec3 {
    let cos_phi = phi.cos();
    Vec3::new(cos_phi * lambda.sin(), phi.sin(), cos_phi * lambda.cos())
}

/// Convert a unit-sphere point back to (latitude, longitude) in radians
#[inline]
pub fn cartesian_to_spherical(p: Vec3) -> (f32, f32) {
    let p = p.normalize_or_zero();
    (p.y.clamp(-1.0, 1.0).asin(), p.x.atan2(p.z))
}
