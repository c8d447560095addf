//! Parallel and meridian sampling with front/back run splitting
//!
//! Curves are sampled at a fixed resolution and cut into maximal runs that
//! share a visibility, so a front run never connects to a back run.

use glam::Vec2;

use super::projection::{ProjectedPoint, RotationState, project};
use crate::consts::CURVE_SAMPLES;

/// A contiguous stretch of samples on one hemisphere
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub front: bool,
    pub points: Vec<Vec2>,
}

impl Run {
    /// Runs of a single sample cannot be stroked
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.points.len() > 1
    }
}

/// Sample the circle of constant latitude, -180° to 180°
pub fn sample_parallel(
    lat_deg: f32,
    rotation: RotationState,
    center: Vec2,
    radius: f32,
) -> Vec<ProjectedPoint> {
    (0..=CURVE_SAMPLES)
        .map(|i| {
            let lon = (i as f32 / CURVE_SAMPLES as f32) * 360.0 - 180.0;
            project(lat_deg, lon, rotation, center, radius, true)
        })
        .collect()
}

/// Sample the half circle of constant longitude, south pole to north pole
pub fn sample_meridian(
    lon_deg: f32,
    rotation: RotationState,
    center: Vec2,
    radius: f32,
) -> Vec<ProjectedPoint> {
    (0..=CURVE_SAMPLES)
        .map(|i| {
            let lat = (i as f32 / CURVE_SAMPLES as f32) * 180.0 - 90.0;
            project(lat, lon_deg, rotation, center, radius, false)
        })
        .collect()
}

/// Partition samples into maximal runs by the front/back predicate
pub fn split_runs(points: &[ProjectedPoint]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for p in points {
        let front = p.is_front();
        match runs.last_mut() {
            Some(run) if run.front == front => run.points.push(p.pos()),
            _ => runs.push(Run {
                front,
                points: vec![p.pos()],
            }),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn equator_splits_into_front_and_back() {
        let pts = sample_parallel(0.0, RotationState::default(), Vec2::ZERO, 100.0);
        assert_eq!(pts.len(), CURVE_SAMPLES + 1);
        let runs = split_runs(&pts);
        // back (west), front, back (east)
        assert_eq!(runs.len(), 3);
        assert!(!runs[0].front && runs[1].front && !runs[2].front);
        assert!(runs.iter().all(Run::is_drawable));
    }

    #[test]
    fn facing_meridian_is_all_front() {
        let pts = sample_meridian(0.0, RotationState::default(), Vec2::ZERO, 100.0);
        let runs = split_runs(&pts);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].front);
    }

    #[test]
    fn opposite_meridian_has_no_drawable_front() {
        let pts = sample_meridian(180.0, RotationState::default(), Vec2::ZERO, 100.0);
        let runs = split_runs(&pts);
        // Only the poles sit on the limb
        assert!(runs.iter().filter(|r| r.front).all(|r| !r.is_drawable()));
        assert!(runs.iter().any(|r| !r.front && r.is_drawable()));
    }

    #[test]
    fn tilted_pole_parallel_is_fully_visible() {
        // Tilting toward the north pole puts the 80° parallel on the front
        let pts = sample_parallel(80.0, RotationState::new(0.0, 60.0), Vec2::ZERO, 100.0);
        let runs = split_runs(&pts);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].front);
    }

    proptest! {
        #[test]
        fn runs_cover_every_sample_and_alternate(
            lat in -89.0f32..89.0,
            spin in -360.0f32..360.0,
            tilt in -60.0f32..60.0,
        ) {
            let pts = sample_parallel(lat, RotationState::new(spin, tilt), Vec2::ZERO, 50.0);
            let runs = split_runs(&pts);
            let total: usize = runs.iter().map(|r| r.points.len()).sum();
            prop_assert_eq!(total, pts.len());
            for pair in runs.windows(2) {
                prop_assert_ne!(pair[0].front, pair[1].front);
            }
        }
    }
}
