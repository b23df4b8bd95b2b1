//! Shaders, bind group layouts and render pipelines.

use crate::overlay::OverlayVertex;
use crate::texture::DEPTH_FORMAT;
use crate::vertex::{InstanceData, Vertex};

/// Scene shader: textured spheres and rings lit by a point light at the sun.
pub const SCENE_SHADER_SOURCE: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    position: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
};

struct Material {
    tint: vec4<f32>,
    // x = opacity, y = emissive strength, z = shininess, w = lit (0/1)
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;

@group(1) @binding(0) var t_surface: texture_2d<f32>;
@group(1) @binding(1) var t_night: texture_2d<f32>;
@group(1) @binding(2) var t_specular: texture_2d<f32>;
@group(1) @binding(3) var s_surface: sampler;
@group(1) @binding(4) var<uniform> material: Material;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
    @location(7) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) color: vec4<f32>,
};

fn transform_vertex(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(instance.model_0, instance.model_1, instance.model_2, instance.model_3);
    let world = model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.world_position = world.xyz;
    out.normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = vertex.uv;
    out.color = instance.color;
    return out;
}

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    return transform_vertex(vertex, instance);
}

// Pinned to the far plane so the starfield never clips or hides anything.
@vertex
fn vs_backdrop(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    var out = transform_vertex(vertex, instance);
    out.clip_position = out.clip_position.xyww;
    return out;
}

const INV_PI: f32 = 0.31830988618;
// 0x111111 highlight colour.
const SPECULAR_COLOR: f32 = 0.0667;

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    // All sampling happens up front, in uniform control flow.
    let albedo = textureSample(t_surface, s_surface, in.uv) * material.tint * in.color;
    let specular_mask = textureSample(t_specular, s_surface, in.uv).r;
    let night = textureSample(t_night, s_surface, in.uv).rgb;
    let opacity = albedo.a * material.params.x;

    if (material.params.w < 0.5) {
        return vec4<f32>(albedo.rgb, opacity);
    }

    var n = normalize(in.normal);
    if (!front) {
        n = -n;
    }
    let to_light = camera.light_position.xyz - in.world_position;
    let l = normalize(to_light);
    let v = normalize(camera.position.xyz - in.world_position);
    let radiance = camera.light_color.rgb * camera.light_position.w;
    let n_dot_l = max(dot(n, l), 0.0);

    var color = albedo.rgb * (camera.ambient.rgb + radiance * n_dot_l * INV_PI);

    let shininess = material.params.z;
    if (shininess > 0.0 && n_dot_l > 0.0) {
        let h = normalize(l + v);
        color += radiance * SPECULAR_COLOR * specular_mask * pow(max(dot(n, h), 0.0), shininess);
    }

    color += night * material.params.y;

    return vec4<f32>(color, opacity);
}
"#;

/// Overlay shader: solid quads and font-atlas glyphs in NDC.
pub const OVERLAY_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var t_font: texture_2d<f32>;
@group(0) @binding(1) var s_font: sampler;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_overlay(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.uv;
    out.color = in.color;
    return out;
}

@fragment
fn fs_overlay(in: VertexOutput) -> @location(0) vec4<f32> {
    // Sample unconditionally to keep control flow uniform.
    let coverage = textureSample(t_font, s_font, max(in.uv, vec2<f32>(0.0))).r;
    if (in.uv.x < 0.0) {
        return in.color;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}
"#;

/// Which fixed-function setup a scene draw uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Closed meshes, back faces culled.
    Opaque,
    /// Flat geometry visible from both sides.
    DoubleSided,
    /// Alpha blended, both sides, no depth writes.
    Translucent,
    /// Inside of the star sphere at the far plane.
    Backdrop,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 4] = [
        PipelineKind::Opaque,
        PipelineKind::DoubleSided,
        PipelineKind::Translucent,
        PipelineKind::Backdrop,
    ];

    fn label(self) -> &'static str {
        match self {
            PipelineKind::Opaque => "Opaque Pipeline",
            PipelineKind::DoubleSided => "Double Sided Pipeline",
            PipelineKind::Translucent => "Translucent Pipeline",
            PipelineKind::Backdrop => "Backdrop Pipeline",
        }
    }

    fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            PipelineKind::Opaque => Some(wgpu::Face::Back),
            PipelineKind::DoubleSided | PipelineKind::Translucent => None,
            PipelineKind::Backdrop => Some(wgpu::Face::Front),
        }
    }

    fn depth_write(self) -> bool {
        matches!(self, PipelineKind::Opaque | PipelineKind::DoubleSided)
    }

    fn blend(self) -> Option<wgpu::BlendState> {
        match self {
            PipelineKind::Translucent => Some(wgpu::BlendState::ALPHA_BLENDING),
            _ => Some(wgpu::BlendState::REPLACE),
        }
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Group 0: camera and light uniform.
pub fn create_camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Camera Bind Group Layout"),
        entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
    })
}

/// Group 1: surface, night and specular maps, a sampler and the material uniform.
pub fn create_material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
        entries: &[
            texture_entry(0),
            texture_entry(1),
            texture_entry(2),
            sampler_entry(3),
            uniform_entry(4, wgpu::ShaderStages::FRAGMENT),
        ],
    })
}

/// Font atlas and sampler for the overlay pass.
pub fn create_overlay_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Overlay Bind Group Layout"),
        entries: &[texture_entry(0), sampler_entry(1)],
    })
}

/// Build the scene pipeline for one `kind`.
pub fn create_scene_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    shader: &wgpu::ShaderModule,
    camera_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[camera_layout, material_layout],
        push_constant_ranges: &[],
    });

    let vertex_entry = match kind {
        PipelineKind::Backdrop => "vs_backdrop",
        _ => "vs_main",
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(kind.label()),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vertex_entry),
            buffers: &[Vertex::layout(), InstanceData::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: config.format,
                blend: kind.blend(),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: kind.cull_mode(),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: kind.depth_write(),
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Alpha-blended screen-space pipeline, no depth.
pub fn create_overlay_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    overlay_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Overlay Shader"),
        source: wgpu::ShaderSource::Wgsl(OVERLAY_SHADER_SOURCE.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Overlay Pipeline Layout"),
        bind_group_layouts: &[overlay_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Overlay Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_overlay"),
            buffers: &[OverlayVertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_overlay"),
            targets: &[Some(wgpu::ColorTargetState {
                format: config.format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_solid_kinds_write_depth() {
        assert!(PipelineKind::Opaque.depth_write());
        assert!(PipelineKind::DoubleSided.depth_write());
        assert!(!PipelineKind::Translucent.depth_write());
        assert!(!PipelineKind::Backdrop.depth_write());
    }

    #[test]
    fn backdrop_shows_its_inside() {
        assert_eq!(PipelineKind::Backdrop.cull_mode(), Some(wgpu::Face::Front));
        assert_eq!(PipelineKind::Translucent.cull_mode(), None);
    }

    #[test]
    fn shaders_expose_entry_points() {
        for entry in ["fn vs_main", "fn vs_backdrop", "fn fs_main"] {
            assert!(SCENE_SHADER_SOURCE.contains(entry));
        }
        assert!(OVERLAY_SHADER_SOURCE.contains("fn fs_overlay"));
    }
}
