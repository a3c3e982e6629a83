//! HDR bloom and tonemapping.
//!
//! The scene renders into an `Rgba16Float` target owned here. Resolving it
//! extracts pixels above the luminance threshold, blurs them down and back up
//! a half-resolution mip chain, tonemaps the scene onto the swapchain and adds
//! the glow on top. Emissive (selected) bodies are pushed well past the
//! threshold so they are the ones that bloom.

use bytemuck::{Pod, Zeroable};
use exo_config::RenderConfig;
use wgpu::util::DeviceExt;

/// Upper bound on mip levels; beyond this the chain is a handful of pixels.
pub const MAX_ITERATIONS: u32 = 8;

const LUMINANCE: [f32; 3] = [0.2126, 0.7152, 0.0722];

#[derive(Clone, Debug, PartialEq)]
pub struct BloomConfig {
    /// Luminance above which pixels glow.
    pub threshold: f32,
    /// Half-width of the smooth ramp around `threshold`.
    pub soft_knee: f32,
    pub intensity: f32,
    /// Mip levels in the blur chain. Zero disables bloom.
    pub iterations: u32,
    /// Scales the blur tap offset.
    pub radius: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for BloomConfig {
    fn from(config: &RenderConfig) -> Self {
        Self {
            threshold: config.bloom_threshold.max(0.0),
            soft_knee: config.bloom_soft_knee.clamp(0.0, 1.0),
            intensity: config.bloom_intensity.max(0.0),
            iterations: config.bloom_iterations.min(MAX_ITERATIONS),
            radius: config.bloom_radius.max(0.0),
        }
    }
}

impl BloomConfig {
    fn params(&self) -> BloomParams {
        BloomParams {
            threshold: self.threshold,
            soft_knee: self.soft_knee,
            intensity: self.intensity,
            radius: self.radius,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub(crate) struct BloomParams {
    pub threshold: f32,
    pub soft_knee: f32,
    pub intensity: f32,
    pub radius: f32,
}

/// Fraction of a pixel's colour that survives extraction. Mirrors
/// `soft_threshold` in [`BLOOM_SHADER_SOURCE`].
pub fn extraction_factor(rgb: [f32; 3], threshold: f32, knee: f32) -> f32 {
    let luminance: f32 = rgb.iter().zip(LUMINANCE).map(|(c, w)| c * w).sum();
    let soft = (luminance - threshold + knee).clamp(0.0, 2.0 * knee);
    let contribution = soft * soft / (4.0 * knee + 0.0001);
    ((luminance - threshold).max(contribution) / luminance.max(0.0001)).max(0.0)
}

/// Sizes of the blur chain, each level half the previous, starting at half
/// the target size.
pub fn mip_sizes(width: u32, height: u32, iterations: u32) -> Vec<(u32, u32)> {
    let mut w = (width / 2).max(1);
    let mut h = (height / 2).max(1);
    let mut sizes = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations.min(MAX_ITERATIONS) {
        sizes.push((w, h));
        w = (w / 2).max(1);
        h = (h / 2).max(1);
    }
    sizes
}

pub const BLOOM_SHADER_SOURCE: &str = r#"
struct BloomParams {
    threshold: f32,
    soft_knee: f32,
    intensity: f32,
    radius: f32,
};

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@group(0) @binding(0) var<uniform> params: BloomParams;
@group(1) @binding(0) var input_tex: texture_2d<f32>;
@group(1) @binding(1) var input_sampler: sampler;

@vertex
fn vs_fullscreen(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

fn soft_threshold(color: vec3<f32>, threshold: f32, knee: f32) -> vec3<f32> {
    let luminance = dot(color, vec3<f32>(0.2126, 0.7152, 0.0722));
    let soft = clamp(luminance - threshold + knee, 0.0, 2.0 * knee);
    let contribution = soft * soft / (4.0 * knee + 0.0001);
    let factor = max(luminance - threshold, contribution) / max(luminance, 0.0001);
    return color * max(factor, 0.0);
}

@fragment
fn fs_extract(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(input_tex, input_sampler, in.uv).rgb;
    return vec4<f32>(soft_threshold(color, params.threshold, params.soft_knee), 1.0);
}

@fragment
fn fs_downsample(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = params.radius / vec2<f32>(textureDimensions(input_tex));
    let a = textureSample(input_tex, input_sampler, in.uv + vec2(-texel.x, -texel.y)).rgb;
    let b = textureSample(input_tex, input_sampler, in.uv + vec2( texel.x, -texel.y)).rgb;
    let c = textureSample(input_tex, input_sampler, in.uv + vec2(-texel.x,  texel.y)).rgb;
    let d = textureSample(input_tex, input_sampler, in.uv + vec2( texel.x,  texel.y)).rgb;
    return vec4<f32>((a + b + c + d) * 0.25, 1.0);
}

@fragment
fn fs_upsample(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(textureSample(input_tex, input_sampler, in.uv).rgb, 1.0);
}

// ACES filmic approximation.
@fragment
fn fs_tonemap(in: VertexOutput) -> @location(0) vec4<f32> {
    let hdr = textureSample(input_tex, input_sampler, in.uv).rgb;
    let mapped = clamp(
        (hdr * (2.51 * hdr + 0.03)) / (hdr * (2.43 * hdr + 0.59) + 0.14),
        vec3<f32>(0.0), vec3<f32>(1.0)
    );
    return vec4<f32>(mapped, 1.0);
}

@fragment
fn fs_composite(in: VertexOutput) -> @location(0) vec4<f32> {
    let glow = textureSample(input_tex, input_sampler, in.uv).rgb;
    return vec4<f32>(glow * params.intensity, 1.0);
}
"#;

/// Owns the HDR scene target, the blur chain and every fullscreen pipeline.
pub struct BloomPipeline {
    config: BloomConfig,
    texture_bgl: wgpu::BindGroupLayout,
    extract_pipeline: wgpu::RenderPipeline,
    downsample_pipeline: wgpu::RenderPipeline,
    upsample_pipeline: wgpu::RenderPipeline,
    tonemap_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    sampler: wgpu::Sampler,
    params_buffer: wgpu::Buffer,
    params_bind_group: wgpu::BindGroup,
    hdr_format: wgpu::TextureFormat,
    hdr: TextureTarget,
    mips: Vec<TextureTarget>,
}

/// A sampled render target and its bind group.
struct TextureTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

impl BloomPipeline {
    pub fn new(
        device: &wgpu::Device,
        hdr_format: wgpu::TextureFormat,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: BloomConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("bloom-shader"),
            source: wgpu::ShaderSource::Wgsl(BLOOM_SHADER_SOURCE.into()),
        });

        let params_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bloom-params-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(16),
                },
                count: None,
            }],
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bloom-texture-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("bloom-layout"),
            bind_group_layouts: &[&params_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });

        let additive = Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        });
        let fullscreen = |entry: &str, format, blend, label: &str| {
            create_fullscreen_pipeline(device, &shader, &layout, entry, format, blend, label)
        };
        let extract_pipeline = fullscreen("fs_extract", hdr_format, None, "bloom-extract");
        let downsample_pipeline = fullscreen("fs_downsample", hdr_format, None, "bloom-downsample");
        let upsample_pipeline = fullscreen("fs_upsample", hdr_format, additive, "bloom-upsample");
        let tonemap_pipeline = fullscreen("fs_tonemap", surface_format, None, "bloom-tonemap");
        let composite_pipeline =
            fullscreen("fs_composite", surface_format, additive, "bloom-composite");

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("bloom-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("bloom-params"),
            contents: bytemuck::bytes_of(&config.params()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let params_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bloom-params-bg"),
            layout: &params_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buffer.as_entire_binding(),
            }],
        });

        let hdr = TextureTarget::new(
            device,
            &texture_bgl,
            &sampler,
            hdr_format,
            (width.max(1), height.max(1)),
            "bloom-hdr",
        );
        let mips = create_mip_chain(
            device,
            &texture_bgl,
            &sampler,
            hdr_format,
            width,
            height,
            config.iterations,
        );

        Self {
            config,
            texture_bgl,
            extract_pipeline,
            downsample_pipeline,
            upsample_pipeline,
            tonemap_pipeline,
            composite_pipeline,
            sampler,
            params_buffer,
            params_bind_group,
            hdr_format,
            hdr,
            mips,
        }
    }

    /// The view the scene pass renders into.
    pub fn hdr_view(&self) -> &wgpu::TextureView {
        &self.hdr.view
    }

    pub fn hdr_format(&self) -> wgpu::TextureFormat {
        self.hdr_format
    }

    pub fn config(&self) -> &BloomConfig {
        &self.config
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.hdr = TextureTarget::new(
            device,
            &self.texture_bgl,
            &self.sampler,
            self.hdr_format,
            (width.max(1), height.max(1)),
            "bloom-hdr",
        );
        self.mips = create_mip_chain(
            device,
            &self.texture_bgl,
            &self.sampler,
            self.hdr_format,
            width,
            height,
            self.config.iterations,
        );
    }

    /// Resolve the HDR target onto `surface_view`: tonemapped scene plus glow.
    pub fn execute(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        if let Some(first) = self.mips.first() {
            self.run_pass(
                encoder,
                &self.extract_pipeline,
                &self.hdr.bind_group,
                &first.view,
                wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                "bloom-extract",
            );
            for pair in self.mips.windows(2) {
                self.run_pass(
                    encoder,
                    &self.downsample_pipeline,
                    &pair[0].bind_group,
                    &pair[1].view,
                    wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    "bloom-downsample",
                );
            }
            for pair in self.mips.windows(2).rev() {
                self.run_pass(
                    encoder,
                    &self.upsample_pipeline,
                    &pair[1].bind_group,
                    &pair[0].view,
                    wgpu::LoadOp::Load,
                    "bloom-upsample",
                );
            }
        }

        self.run_pass(
            encoder,
            &self.tonemap_pipeline,
            &self.hdr.bind_group,
            surface_view,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            "bloom-tonemap",
        );

        if let Some(first) = self.mips.first() {
            self.run_pass(
                encoder,
                &self.composite_pipeline,
                &first.bind_group,
                surface_view,
                wgpu::LoadOp::Load,
                "bloom-composite",
            );
        }
    }

    fn run_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pipeline: &wgpu::RenderPipeline,
        texture_bind_group: &wgpu::BindGroup,
        target_view: &wgpu::TextureView,
        load: wgpu::LoadOp<wgpu::Color>,
        label: &str,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.params_bind_group, &[]);
        pass.set_bind_group(1, texture_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

impl TextureTarget {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        Self {
            _texture: texture,
            view,
            bind_group,
        }
    }
}

fn create_mip_chain(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    iterations: u32,
) -> Vec<TextureTarget> {
    mip_sizes(width, height, iterations)
        .into_iter()
        .enumerate()
        .map(|(i, size)| {
            log::trace!("Bloom mip {i}: {}x{}", size.0, size.1);
            TextureTarget::new(device, layout, sampler, format, size, "bloom-mip")
        })
        .collect()
}

fn create_fullscreen_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    fragment_entry: &str,
    target_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_test_device;

    #[test]
    fn test_config_follows_render_config() {
        let render = RenderConfig {
            bloom_threshold: 0.5,
            bloom_iterations: 3,
            ..Default::default()
        };
        let config = BloomConfig::from(&render);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.iterations, 3);
        assert_eq!(BloomConfig::default().threshold, 0.8);
    }

    #[test]
    fn test_config_clamps_out_of_range_values() {
        let render = RenderConfig {
            bloom_soft_knee: 4.0,
            bloom_iterations: 40,
            bloom_intensity: -1.0,
            ..Default::default()
        };
        let config = BloomConfig::from(&render);
        assert_eq!(config.soft_knee, 1.0);
        assert_eq!(config.iterations, MAX_ITERATIONS);
        assert_eq!(config.intensity, 0.0);
    }

    #[test]
    fn test_emissive_white_blooms_and_dim_grey_does_not() {
        let config = BloomConfig::default();
        // A selected body: colour doubled by its emissive term.
        let emissive = extraction_factor([1.6, 1.4, 1.8], config.threshold, config.soft_knee);
        assert!(emissive > 0.3, "factor {emissive}");

        let dim = extraction_factor([0.05, 0.05, 0.05], config.threshold, config.soft_knee);
        assert_eq!(dim, 0.0);
    }

    #[test]
    fn test_hard_threshold_without_knee() {
        assert_eq!(extraction_factor([0.5, 0.5, 0.5], 1.0, 0.0), 0.0);
        let f = extraction_factor([2.0, 2.0, 2.0], 1.0, 0.0);
        assert!((f - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_black_pixel_factor_is_finite() {
        assert_eq!(extraction_factor([0.0; 3], 0.8, 0.9), 0.0);
    }

    #[test]
    fn test_mip_sizes_halve_each_level() {
        assert_eq!(
            mip_sizes(1920, 1080, 5),
            vec![(960, 540), (480, 270), (240, 135), (120, 67), (60, 33)]
        );
    }

    #[test]
    fn test_mip_sizes_never_reach_zero() {
        let sizes = mip_sizes(3, 1, 4);
        assert_eq!(sizes.len(), 4);
        assert!(sizes.iter().all(|&(w, h)| w >= 1 && h >= 1));
        assert!(mip_sizes(800, 600, 0).is_empty());
    }

    #[test]
    fn test_params_uniform_size() {
        assert_eq!(std::mem::size_of::<BloomParams>(), 16);
    }

    #[test]
    fn test_pipeline_builds_and_resizes() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mut bloom = BloomPipeline::new(
            &device,
            wgpu::TextureFormat::Rgba16Float,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            640,
            360,
            BloomConfig::default(),
        );
        assert_eq!(bloom.mips.len(), 5);
        bloom.resize(&device, 0, 0);
        assert_eq!(bloom.mips.len(), 5);
    }
}
