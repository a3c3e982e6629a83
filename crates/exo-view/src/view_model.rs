use exo_catalog::PlanetRecord;
use exo_config::ViewerConfig;
use exo_orbit::{CentralBody, OrbitLayout, OrbitingBody, body_rng};
use glam::Vec3;
use rand_chacha::ChaCha8Rng;

use crate::controller::{CameraController, ControllerSettings, TransitionState};
use crate::controls::OrbitControls;
use crate::picking::{Ray, pick_sphere};
use crate::rig::CameraRig;
use crate::selection::Selection;

/// All mutable viewer state, owned by the window loop.
pub struct ViewModel {
    records: Vec<PlanetRecord>,
    bodies: Vec<OrbitingBody>,
    selection: Selection,
    central: CentralBody,
    layout: OrbitLayout,
    rng: ChaCha8Rng,
    time_scale: f32,
    rig: CameraRig,
    controller: CameraController,
    controls: OrbitControls,
}

impl ViewModel {
    pub fn new(config: &ViewerConfig, controls: OrbitControls) -> Self {
        let settings = ControllerSettings::from(config);
        Self {
            records: Vec::new(),
            bodies: Vec::new(),
            selection: Selection::default(),
            central: CentralBody::EARTH,
            layout: OrbitLayout::new(config.orbit_base_radius, config.orbit_spacing),
            rng: body_rng(config.seed),
            time_scale: config.time_scale,
            rig: CameraRig::home(settings.home_distance),
            controller: CameraController::new(settings),
            controls,
        }
    }

    /// Swap in a new working set in one step.
    ///
    /// Bodies are rebuilt with fresh phases and colours. Any selection
    /// refers to the old set, so it is dropped and the camera heads home.
    pub fn replace_records(&mut self, records: Vec<PlanetRecord>) {
        let bodies = self.layout.build_bodies(&records, &mut self.rng);
        self.records = records;
        self.bodies = bodies;
        if self.selection.clear().is_some() {
            self.controller.clear_target();
        }
        tracing::info!(count = self.records.len(), "Viewer working set replaced");
    }

    /// Select body `index`, snapshotting its current position as the camera goal.
    ///
    /// Returns `false` (and changes nothing) if `index` is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(body) = self.bodies.get(index) else {
            return false;
        };
        self.controller
            .select_target(body.position(), body.display_radius);
        let previous = self.selection.select(index);
        tracing::debug!(index, ?previous, name = %self.records[index].name, "Selected planet");
        true
    }

    /// Deselect and send the camera home. Clearing an empty selection also
    /// re-homes the camera.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.controller.clear_target();
    }

    /// Select whatever body `ray` hits first, if any.
    pub fn pick(&mut self, ray: &Ray) -> Option<usize> {
        let hit = pick_sphere(
            ray,
            self.bodies
                .iter()
                .map(|body| (body.position(), body.display_radius)),
        )?;
        self.select(hit);
        Some(hit)
    }

    pub fn begin_manipulation(&mut self) {
        self.controller.begin_manipulation();
    }

    pub fn end_manipulation(&mut self) {
        self.controller.end_manipulation();
    }

    /// Per-frame update: orbits, then manual controls, then camera easing.
    pub fn advance(&mut self, elapsed: f32) {
        let scaled = f64::from(elapsed * self.time_scale);
        for body in &mut self.bodies {
            body.advance(scaled);
        }
        self.controls.update(&mut self.rig);
        self.controller.update(&mut self.rig);
    }

    pub fn records(&self) -> &[PlanetRecord] {
        &self.records
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn central_body(&self) -> &CentralBody {
        &self.central
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_record(&self) -> Option<&PlanetRecord> {
        self.selection.get().and_then(|i| self.records.get(i))
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn camera_eye(&self) -> Vec3 {
        self.rig.eye
    }

    pub fn transition_state(&self) -> TransitionState {
        self.controller.state()
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }
}
