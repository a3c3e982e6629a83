//! Instanced sphere pipeline for the central body, planets and stars.
//!
//! Every sphere shares one unit mesh; per-instance data places, scales and
//! colours it. Lit instances get ambient plus a single point light; unlit
//! instances (stars) output their colour directly. An emissive strength adds
//! `color * strength` on top, which the bloom pass turns into a glow.
//!
//! Bindings: scene uniform at `@group(0) @binding(0)`.
//! Vertex slot 0 is [`SphereVertex`], slot 1 is [`BodyInstance`].

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::mesh::{MeshBuffer, SphereVertex};

/// One sphere on screen.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    /// Centre in xyz, radius in w.
    pub center_radius: [f32; 4],
    /// Linear RGB in xyz. w unused.
    pub color: [f32; 4],
    /// x: emissive strength, y: lit flag, z: camera-relative flag.
    pub params: [f32; 4],
}

impl BodyInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![2 => Float32x4, 3 => Float32x4, 4 => Float32x4];

    /// A lit sphere with no glow.
    pub fn lit(center: Vec3, radius: f32, color: [f32; 3]) -> Self {
        Self {
            center_radius: center.extend(radius).to_array(),
            color: [color[0], color[1], color[2], 1.0],
            params: [0.0, 1.0, 0.0, 0.0],
        }
    }

    /// A self-lit point that stays at a fixed offset from the camera, so it
    /// never gets closer however far the camera travels.
    pub fn backdrop(offset: Vec3, radius: f32, color: [f32; 3]) -> Self {
        Self {
            center_radius: offset.extend(radius).to_array(),
            color: [color[0], color[1], color[2], 1.0],
            params: [0.0, 0.0, 1.0, 0.0],
        }
    }

    pub fn with_emissive(mut self, strength: f32) -> Self {
        self.params[0] = strength.max(0.0);
        self
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            self.center_radius[0],
            self.center_radius[1],
            self.center_radius[2],
        )
    }

    pub fn radius(&self) -> f32 {
        self.center_radius[3]
    }

    pub fn emissive(&self) -> f32 {
        self.params[0]
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Scene lighting: ambient plus one white point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLighting {
    pub ambient: f32,
    pub light_position: Vec3,
    pub light_color: Vec3,
    pub light_intensity: f32,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            light_position: Vec3::new(10.0, 10.0, 10.0),
            light_color: Vec3::ONE,
            light_intensity: 1.0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Light position in xyz, intensity in w.
    pub light_position: [f32; 4],
    /// Light colour in xyz, ambient in w.
    pub light_color: [f32; 4],
}

impl SceneUniform {
    pub fn new(camera: &Camera, lighting: &SceneLighting) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            light_position: lighting
                .light_position
                .extend(lighting.light_intensity)
                .to_array(),
            light_color: lighting.light_color.extend(lighting.ambient).to_array(),
        }
    }
}

pub const BODY_SHADER_SOURCE: &str = r#"
struct Scene {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
};

@group(0) @binding(0) var<uniform> scene: Scene;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) center_radius: vec4<f32>,
    @location(3) color: vec4<f32>,
    @location(4) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
    @location(3) params: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let center = instance.center_radius.xyz + scene.camera_pos.xyz * instance.params.z;
    let world = center + vertex.position * instance.center_radius.w;
    var out: VertexOutput;
    out.clip_position = scene.view_proj * vec4<f32>(world, 1.0);
    out.world_position = world;
    out.normal = vertex.normal;
    out.color = instance.color.rgb;
    out.params = instance.params;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var color = in.color;
    if in.params.y > 0.5 {
        let n = normalize(in.normal);
        let l = normalize(scene.light_position.xyz - in.world_position);
        let diffuse = max(dot(n, l), 0.0) * scene.light_position.w;
        color = in.color * (scene.light_color.w + diffuse * scene.light_color.rgb);
    }
    let emissive = in.color * in.params.x;
    return vec4<f32>(color + emissive, 1.0);
}
"#;

/// Growable instance buffer for one draw call.
pub struct InstanceBatch {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl InstanceBatch {
    const MIN_CAPACITY: usize = 64;

    pub fn new(device: &wgpu::Device, label: &'static str) -> Self {
        Self {
            label,
            buffer: create_instance_buffer(device, label, Self::MIN_CAPACITY),
            capacity: Self::MIN_CAPACITY,
            count: 0,
        }
    }

    /// Replace the contents, growing the buffer to the next power of two if needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[BodyInstance]) {
        if instances.len() > self.capacity {
            self.capacity = instances.len().next_power_of_two();
            self.buffer = create_instance_buffer(device, self.label, self.capacity);
            log::debug!("Grew {} to {} instances", self.label, self.capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
        self.count = instances.len() as u32;
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn create_instance_buffer(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * std::mem::size_of::<BodyInstance>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub struct BodyPipeline {
    pub pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
}

impl BodyPipeline {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER_SOURCE.into()),
        });

        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("body-scene-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<SceneUniform>() as u64),
                },
                count: None,
            }],
        });

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("body-scene-uniform"),
            size: std::mem::size_of::<SceneUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("body-scene-bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[&scene_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("body-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SphereVertex::layout(), BodyInstance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            scene_buffer,
            scene_bind_group,
        }
    }

    pub fn write_scene(&self, queue: &wgpu::Queue, uniform: &SceneUniform) {
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Draw every instance in `batch` using `mesh`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, mesh: &MeshBuffer, batch: &InstanceBatch) {
        if batch.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        mesh.bind(pass);
        pass.set_vertex_buffer(1, batch.buffer.slice(..));
        pass.draw_indexed(0..mesh.index_count, 0, 0..batch.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_test_device;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<BodyInstance>(), 48);
        let layout = BodyInstance::layout();
        assert_eq!(layout.array_stride, 48);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![2, 3, 4]);
    }

    #[test]
    fn test_scene_uniform_size_is_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 112);
        assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);
    }

    #[test]
    fn test_lit_instance() {
        let body = BodyInstance::lit(Vec3::new(5.0, 0.0, 0.0), 0.5, [0.2, 0.4, 0.6]);
        assert_eq!(body.center(), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(body.radius(), 0.5);
        assert_eq!(body.params, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(body.with_emissive(2.0).emissive(), 2.0);
        assert_eq!(body.with_emissive(-1.0).emissive(), 0.0);
    }

    #[test]
    fn test_backdrop_instance_is_unlit_and_camera_relative() {
        let star = BodyInstance::backdrop(Vec3::X * 600.0, 1.0, [1.0, 1.0, 1.0]);
        assert_eq!(star.params[1], 0.0);
        assert_eq!(star.params[2], 1.0);
    }

    #[test]
    fn test_scene_uniform_packs_lighting() {
        let camera = Camera::default();
        let uniform = SceneUniform::new(&camera, &SceneLighting::default());
        assert_eq!(uniform.camera_pos, [0.0, 0.0, 20.0, 1.0]);
        assert_eq!(uniform.light_position, [10.0, 10.0, 10.0, 1.0]);
        assert_eq!(uniform.light_color, [1.0, 1.0, 1.0, 0.5]);
    }

    #[test]
    fn test_shader_declares_every_instance_location() {
        for location in ["@location(2)", "@location(3)", "@location(4)"] {
            assert!(BODY_SHADER_SOURCE.contains(location));
        }
        assert!(BODY_SHADER_SOURCE.contains("fn vs_main"));
        assert!(BODY_SHADER_SOURCE.contains("fn fs_main"));
    }

    #[test]
    fn test_pipeline_creation_and_batch_growth() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let _pipeline = BodyPipeline::new(&device, wgpu::TextureFormat::Rgba16Float);
        let mut batch = InstanceBatch::new(&device, "test-instances");
        assert!(batch.is_empty());

        let instances = vec![BodyInstance::lit(Vec3::ZERO, 1.0, [0.0, 0.5, 0.0]); 100];
        batch.upload(&device, &queue, &instances);
        assert_eq!(batch.len(), 100);
        assert_eq!(batch.capacity(), 128);

        batch.upload(&device, &queue, &[]);
        assert!(batch.is_empty());
        assert_eq!(batch.capacity(), 128);
    }
}
