//! wgpu rendering for the exoplanet viewer.
//!
//! The scene is drawn into an HDR target (instanced spheres for bodies and
//! stars), then bloom and tonemapping resolve it onto the swapchain. UI
//! overlays are drawn by the caller on top of the resolved surface.

pub mod bloom;
pub mod body_pipeline;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod mesh;
pub mod scene_renderer;
pub mod starfield;
pub mod surface;

pub use bloom::{BloomConfig, BloomPipeline};
pub use body_pipeline::{BodyInstance, BodyPipeline, InstanceBatch, SceneLighting, SceneUniform};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use mesh::{MeshBuffer, SphereMesh, SphereVertex, generate_icosphere};
pub use scene_renderer::{HDR_FORMAT, SceneFrame, SceneRenderer};
pub use starfield::{SHELL_DISTANCE, Star, StarfieldGenerator};
pub use surface::{PhysicalSize, SurfaceWrapper};

/// Headless device for tests. `None` when no adapter is available.
#[cfg(test)]
pub(crate) fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}
