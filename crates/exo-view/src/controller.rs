//! Smooth camera re-centering on selection changes.

use exo_config::ViewerConfig;
use glam::Vec3;

use crate::rig::CameraRig;

/// Whether the controller is still easing toward its goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Transitioning,
}

/// Tuning for [`CameraController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Fraction of the remaining distance closed per frame, in `(0, 1]`.
    pub damping: f32,
    /// Both eye and target errors must fall below this to settle.
    pub settle_threshold: f32,
    /// Eye offset along +Z from a selected body, in body radii.
    pub standoff_factor: f32,
    /// Eye distance along +Z when nothing is selected.
    pub home_distance: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            damping: 0.1,
            settle_threshold: 0.01,
            standoff_factor: 5.0,
            home_distance: 20.0,
        }
    }
}

impl From<&ViewerConfig> for ControllerSettings {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            damping: config.damping.clamp(f32::EPSILON, 1.0),
            settle_threshold: config.settle_threshold.max(f32::EPSILON),
            standoff_factor: config.standoff_factor,
            home_distance: config.home_distance,
        }
    }
}

/// Eases the camera toward a goal eye/target pair.
///
/// Goals are snapshots: selecting a moving body aims at where it was when
/// selected, not where it goes next. A new goal replaces the old one
/// immediately. While the user is dragging, no easing happens; once they
/// let go, easing resumes only if a goal is still pending.
#[derive(Debug, Clone)]
pub struct CameraController {
    settings: ControllerSettings,
    desired_eye: Vec3,
    desired_target: Vec3,
    state: TransitionState,
    manipulating: bool,
}

impl CameraController {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            desired_eye: Vec3::new(0.0, 0.0, settings.home_distance),
            desired_target: Vec3::ZERO,
            settings,
            state: TransitionState::Idle,
            manipulating: false,
        }
    }

    /// Aim at `position`, backing off by `standoff_factor * radius` along +Z.
    pub fn select_target(&mut self, position: Vec3, radius: f32) {
        self.desired_target = position;
        self.desired_eye = position + Vec3::new(0.0, 0.0, radius * self.settings.standoff_factor);
        self.state = TransitionState::Transitioning;
        tracing::debug!(?position, radius, "Camera transition to selection");
    }

    /// Return to the home view.
    pub fn clear_target(&mut self) {
        self.desired_target = Vec3::ZERO;
        self.desired_eye = Vec3::new(0.0, 0.0, self.settings.home_distance);
        self.state = TransitionState::Transitioning;
        tracing::debug!("Camera transition to home");
    }

    pub fn begin_manipulation(&mut self) {
        self.manipulating = true;
    }

    pub fn end_manipulation(&mut self) {
        self.manipulating = false;
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn desired(&self) -> CameraRig {
        CameraRig::new(self.desired_eye, self.desired_target)
    }

    /// One frame of easing. Returns `true` if the rig moved.
    pub fn update(&mut self, rig: &mut CameraRig) -> bool {
        if self.state == TransitionState::Idle || self.manipulating {
            return false;
        }

        let t = self.settings.damping;
        let previous = *rig;
        rig.eye += (self.desired_eye - rig.eye) * t;
        rig.target += (self.desired_target - rig.target) * t;

        // Far from the origin the per-frame step can round to zero before
        // the error drops below the threshold.
        let stalled = *rig == previous;
        let threshold = self.settings.settle_threshold;
        if stalled
            || (rig.eye.distance(self.desired_eye) < threshold
                && rig.target.distance(self.desired_target) < threshold)
        {
            rig.eye = self.desired_eye;
            rig.target = self.desired_target;
            self.state = TransitionState::Idle;
            tracing::trace!(stalled, "Camera transition settled");
        }
        true
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(ControllerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_idle(controller: &mut CameraController, rig: &mut CameraRig) -> usize {
        let mut frames = 0;
        while controller.state() == TransitionState::Transitioning {
            controller.update(rig);
            frames += 1;
            assert!(frames < 10_000, "controller never settled");
        }
        frames
    }

    #[test]
    fn test_starts_idle_and_does_nothing() {
        let mut controller = CameraController::default();
        let mut rig = CameraRig::home(20.0);
        assert_eq!(controller.state(), TransitionState::Idle);
        assert!(!controller.update(&mut rig));
        assert_eq!(rig, CameraRig::home(20.0));
    }

    #[test]
    fn test_one_frame_closes_ten_percent() {
        let mut controller = CameraController::default();
        let mut rig = CameraRig::home(20.0);
        let position = Vec3::new(7.0, 0.0, 0.0);
        controller.select_target(position, 1.0);

        let desired = controller.desired();
        assert_eq!(desired.target, position);
        assert_eq!(desired.eye, Vec3::new(7.0, 0.0, 5.0));

        let e0 = rig.eye.distance(desired.eye);
        let t0 = rig.target.distance(desired.target);
        controller.update(&mut rig);
        assert!((rig.eye.distance(desired.eye) - 0.9 * e0).abs() < 1e-4);
        assert!((rig.target.distance(desired.target) - 0.9 * t0).abs() < 1e-4);
    }

    #[test]
    fn test_reaches_idle_in_bounded_frames() {
        let mut controller = CameraController::default();
        let mut rig = CameraRig::home(20.0);
        controller.select_target(Vec3::new(25.0, 0.0, -3.0), 2.0);
        let frames = run_until_idle(&mut controller, &mut rig);
        // 0.9^n * E0 < 0.01 with E0 under 40 needs fewer than 80 frames.
        assert!(frames < 80, "took {frames} frames");
        assert!(rig.eye.distance(controller.desired().eye) < 0.01);
        assert!(rig.target.distance(controller.desired().target) < 0.01);
    }

    #[test]
    fn test_last_selection_wins() {
        let mut controller = CameraController::default();
        let mut rig = CameraRig::home(20.0);
        let a = Vec3::new(5.0, 0.0, 0.0);
        let b = Vec3::new(-9.0, 0.0, 4.0);

        controller.select_target(a, 1.0);
        for _ in 0..5 {
            controller.update(&mut rig);
        }
        controller.select_target(b, 0.5);
        run_until_idle(&mut controller, &mut rig);

        assert!(rig.target.distance(b) < 0.01);
        assert!(rig.eye.distance(b + Vec3::new(0.0, 0.0, 2.5)) < 0.01);
    }

    #[test]
    fn test_far_target_settles_exactly() {
        for x in [6.0e4_f32, 2.0e5, -3.5e6] {
            let mut controller = CameraController::default();
            let mut rig = CameraRig::home(20.0);
            let goal = Vec3::new(x, 0.0, 0.0);
            controller.select_target(goal, 1.0);
            let frames = run_until_idle(&mut controller, &mut rig);
            assert!(frames < 1_000, "x={x}: {frames} frames");
            assert_eq!(rig.target, goal);
            assert_eq!(rig.eye, goal + Vec3::new(0.0, 0.0, 5.0));
        }
    }

    #[test]
    fn test_clear_returns_home() {
        let mut controller = CameraController::default();
        let mut rig = CameraRig::new(Vec3::new(4.0, 3.0, 2.0), Vec3::new(4.0, 0.0, 0.0));
        controller.clear_target();
        run_until_idle(&mut controller, &mut rig);
        assert!(rig.eye.distance(Vec3::new(0.0, 0.0, 20.0)) < 0.01);
        assert!(rig.target.length() < 0.01);
    }

    #[test]
    fn test_manipulation_suspends_and_resumes() {
        let mut controller = CameraController::default();
        let mut rig = CameraRig::home(20.0);
        controller.select_target(Vec3::new(5.0, 0.0, 0.0), 1.0);

        controller.begin_manipulation();
        let before = rig;
        assert!(!controller.update(&mut rig));
        assert_eq!(rig, before);
        assert_eq!(controller.state(), TransitionState::Transitioning);

        controller.end_manipulation();
        assert!(controller.update(&mut rig));
        assert_ne!(rig, before);
    }

    #[test]
    fn test_manipulation_end_without_pending_goal_stays_idle() {
        let mut controller = CameraController::default();
        let mut rig = CameraRig::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        controller.begin_manipulation();
        controller.end_manipulation();
        assert!(!controller.update(&mut rig));
        assert_eq!(controller.state(), TransitionState::Idle);
    }

    #[test]
    fn test_settings_from_config() {
        let config = ViewerConfig {
            damping: 2.0,
            ..Default::default()
        };
        let settings = ControllerSettings::from(&config);
        assert_eq!(settings.damping, 1.0);
        assert_eq!(settings.home_distance, 20.0);
    }
}
