//! Viewer state: what is selected and where the camera is looking.
//!
//! [`ViewModel`] is the single owner of this state. The window loop is its
//! only writer: input handlers call `select`/`clear_selection`, the frame
//! callback calls `advance`, and the renderer reads the result.

mod controller;
mod controls;
mod picking;
mod rig;
mod selection;
mod view_model;

pub use controller::{CameraController, ControllerSettings, TransitionState};
pub use controls::OrbitControls;
pub use picking::{Ray, pick_sphere};
pub use rig::CameraRig;
pub use selection::Selection;
pub use view_model::ViewModel;
