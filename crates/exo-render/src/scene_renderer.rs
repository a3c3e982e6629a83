//! Frame composition: HDR scene pass, then bloom resolve onto the swapchain.

use exo_config::RenderConfig;

use crate::bloom::{BloomConfig, BloomPipeline};
use crate::body_pipeline::{BodyInstance, BodyPipeline, InstanceBatch, SceneLighting, SceneUniform};
use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::mesh::{MeshBuffer, generate_icosphere};
use crate::starfield::StarfieldGenerator;

pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Stars are a few pixels across; the bare icosahedron is enough.
const STAR_SUBDIVISIONS: u32 = 0;

/// Everything that changes per frame.
pub struct SceneFrame<'a> {
    pub camera: &'a Camera,
    pub bodies: &'a [BodyInstance],
}

pub struct SceneRenderer {
    body_pipeline: BodyPipeline,
    bloom: BloomPipeline,
    depth: DepthBuffer,
    body_mesh: MeshBuffer,
    star_mesh: MeshBuffer,
    bodies: InstanceBatch,
    stars: InstanceBatch,
    lighting: SceneLighting,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &RenderConfig,
    ) -> Self {
        let body_mesh = MeshBuffer::from_sphere(
            device,
            "body-sphere",
            &generate_icosphere(config.sphere_subdivisions),
        );
        let star_mesh =
            MeshBuffer::from_sphere(device, "star-sphere", &generate_icosphere(STAR_SUBDIVISIONS));

        let mut stars = InstanceBatch::new(device, "star-instances");
        let star_instances =
            StarfieldGenerator::new(config.star_seed, config.star_count).instances();
        stars.upload(device, queue, &star_instances);
        log::info!(
            "Scene renderer ready: {} stars, sphere subdivision {}",
            star_instances.len(),
            config.sphere_subdivisions
        );

        Self {
            body_pipeline: BodyPipeline::new(device, HDR_FORMAT),
            bloom: BloomPipeline::new(
                device,
                HDR_FORMAT,
                surface_format,
                width,
                height,
                BloomConfig::from(config),
            ),
            depth: DepthBuffer::new(device, width, height),
            body_mesh,
            star_mesh,
            bodies: InstanceBatch::new(device, "body-instances"),
            stars,
            lighting: SceneLighting::default(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
        self.bloom.resize(device, width, height);
    }

    /// Record the scene and its post-processing into `encoder`, leaving the
    /// finished image in `surface_view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        frame: &SceneFrame<'_>,
    ) {
        self.body_pipeline
            .write_scene(queue, &SceneUniform::new(frame.camera, &self.lighting));
        self.bodies.upload(device, queue, frame.bodies);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.bloom.hdr_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(self.depth.clearing_attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.body_pipeline
                .draw(&mut pass, &self.star_mesh, &self.stars);
            self.body_pipeline
                .draw(&mut pass, &self.body_mesh, &self.bodies);
        }

        self.bloom.execute(encoder, surface_view);
    }
}
