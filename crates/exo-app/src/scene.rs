//! Per-frame scene composition from the view model.

use exo_render::{BodyInstance, Camera};
use exo_view::{CameraRig, ViewModel};
use glam::{Vec2, Vec3};

/// Emissive strength of the selected planet; well above the bloom threshold.
pub const SELECTED_EMISSIVE: f32 = 2.0;

/// A name pinned to a point in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub anchor: Vec3,
}

/// A label projected to the screen, in physical pixels from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenLabel {
    pub text: String,
    pub position: Vec2,
}

/// Render camera for the rig's current pose.
pub fn camera_for(rig: &CameraRig, fov_degrees: f32, viewport: Vec2) -> Camera {
    let mut camera = Camera::new(fov_degrees, 1.0);
    camera.set_aspect_ratio(viewport.x, viewport.y);
    camera.look_at(rig.eye, rig.target);
    camera
}

/// Instances for the central body followed by every planet.
pub fn compose_bodies(view: &ViewModel) -> Vec<BodyInstance> {
    let central = view.central_body();
    let selection = view.selection();

    let mut instances = Vec::with_capacity(view.bodies().len() + 1);
    instances.push(BodyInstance::lit(
        central.position(),
        central.radius,
        central.color,
    ));
    instances.extend(view.bodies().iter().enumerate().map(|(index, body)| {
        let instance = BodyInstance::lit(body.position(), body.display_radius, body.color);
        if selection.is_selected(index) {
            instance.with_emissive(SELECTED_EMISSIVE)
        } else {
            instance
        }
    }));
    instances
}

/// Name labels for the central body and every planet.
pub fn compose_labels(view: &ViewModel) -> Vec<Label> {
    let central = view.central_body();
    let mut labels = Vec::with_capacity(view.bodies().len() + 1);
    labels.push(Label {
        text: central.name.to_string(),
        anchor: central.label_anchor(),
    });
    labels.extend(view.bodies().iter().filter_map(|body| {
        let record = view.records().get(body.record_index)?;
        Some(Label {
            text: record.name.clone(),
            anchor: body.label_anchor(),
        })
    }));
    labels
}

/// Project labels onto the viewport, dropping those behind the camera or off-screen.
pub fn project_labels(camera: &Camera, labels: &[Label], viewport: Vec2) -> Vec<ScreenLabel> {
    labels
        .iter()
        .filter_map(|label| {
            let position = camera.world_to_screen(label.anchor, viewport)?;
            let on_screen = (0.0..=viewport.x).contains(&position.x)
                && (0.0..=viewport.y).contains(&position.y);
            on_screen.then(|| ScreenLabel {
                text: label.text.clone(),
                position,
            })
        })
        .collect()
}
