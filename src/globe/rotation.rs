//! Two-axis rotation state for the globe

use super::projection::RotationState;
use crate::consts::MAX_DRAG_TILT_DEG;

/// Owns the globe rotation.
///
/// Manual drags clamp tilt to ±60°. Programmatic sets are taken as given;
/// the game keeps its own centering tilt inside a narrower band.
#[derive(Debug, Clone, Default)]
pub struct RotationController {
    state: RotationState,
}

impl RotationController {
    pub fn new(state: RotationState) -> Self {
        Self { state }
    }

    #[inline]
    pub fn state(&self) -> RotationState {
        self.state
    }

    /// Manual rotation by a delta (pointer drag)
    pub fn rotate(&mut self, d_spin: f32, d_tilt: f32) {
        self.state.spin_deg += d_spin;
        self.state.tilt_deg =
            (self.state.tilt_deg + d_tilt).clamp(-MAX_DRAG_TILT_DEG, MAX_DRAG_TILT_DEG);
    }

    /// Programmatic rotation (no clamp)
    pub fn set_rotation(&mut self, spin_deg: f32, tilt_deg: f32) {
        self.state = RotationState::new(spin_deg, tilt_deg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_clamps_tilt() {
        let mut rc = RotationController::default();
        rc.rotate(10.0, 100.0);
        assert_eq!(rc.state(), RotationState::new(10.0, 60.0));
        rc.rotate(-30.0, -500.0);
        assert_eq!(rc.state(), RotationState::new(-20.0, -60.0));
    }

    #[test]
    fn spin_is_unbounded() {
        let mut rc = RotationController::default();
        for _ in 0..10 {
            rc.rotate(100.0, 0.0);
        }
        assert_eq!(rc.state().spin_deg, 1000.0);
    }

    #[test]
    fn programmatic_set_is_not_clamped() {
        let mut rc = RotationController::default();
        rc.set_rotation(-139.65, 75.0);
        assert_eq!(rc.state().tilt_deg, 75.0);
    }
}
