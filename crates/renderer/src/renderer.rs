//! Main renderer managing wgpu state and rendering.

use crate::{
    camera::{Camera, CameraUniform, Lighting},
    font::generate_font_atlas,
    mesh::Mesh,
    overlay::OverlayTextBuilder,
    pipeline::{
        create_camera_bind_group_layout, create_material_bind_group_layout, create_overlay_bind_group_layout,
        create_overlay_pipeline, create_scene_pipeline, PipelineKind, SCENE_SHADER_SOURCE,
    },
    texture::Texture,
    vertex::InstanceData,
};
use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Instances the buffer starts with; it grows on demand.
const INITIAL_MAX_INSTANCES: u32 = 4096;

/// Material shader uniform (must match `Material` in the scene shader).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MaterialUniform {
    pub tint: [f32; 4],
    /// x = opacity, y = emissive, z = shininess, w = lit flag
    pub params: [f32; 4],
}

/// Surface parameters for one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub tint: [f32; 4],
    pub opacity: f32,
    /// Strength of the night (emissive) map.
    pub emissive: f32,
    /// Specular exponent; 0 disables highlights.
    pub shininess: f32,
    pub lit: bool,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            tint: [1.0; 4],
            opacity: 1.0,
            emissive: 0.0,
            shininess: 0.0,
            lit: true,
        }
    }
}

impl MaterialParams {
    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            tint: self.tint,
            params: [
                self.opacity,
                self.emissive,
                self.shininess,
                if self.lit { 1.0 } else { 0.0 },
            ],
        }
    }
}

/// Textures bound by a material. Missing maps are replaced with black.
pub struct MaterialTextures<'a> {
    pub surface: &'a Texture,
    pub night: Option<&'a Texture>,
    pub specular: Option<&'a Texture>,
}

/// A ready-to-bind material (group 1).
pub struct Material {
    pub bind_group: wgpu::BindGroup,
    _uniform_buffer: wgpu::Buffer,
}

/// One instanced draw within the scene pass.
pub struct DrawBatch<'a> {
    pub kind: PipelineKind,
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub instances: &'a [InstanceData],
}

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    scene_pipelines: HashMap<PipelineKind, wgpu::RenderPipeline>,

    camera_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    camera_uniform: CameraUniform,

    material_bind_group_layout: wgpu::BindGroupLayout,
    white_texture: Texture,
    black_texture: Texture,

    depth_texture: Texture,

    instance_buffer: wgpu::Buffer,
    max_instances: u32,

    overlay_pipeline: wgpu::RenderPipeline,
    overlay_bind_group: wgpu::BindGroup,

    /// Background behind the starfield.
    pub clear_color: wgpu::Color,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        let info = adapter.get_info();
        log::info!("Using GPU: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Camera + light uniform
        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group_layout = create_camera_bind_group_layout(&device);
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let material_bind_group_layout = create_material_bind_group_layout(&device);
        let white_texture = Texture::solid(&device, &queue, [1.0; 4], true, "White Texture");
        let black_texture = Texture::solid(&device, &queue, [0.0, 0.0, 0.0, 1.0], false, "Black Texture");

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER_SOURCE.into()),
        });
        let scene_pipelines = PipelineKind::ALL
            .into_iter()
            .map(|kind| {
                let pipeline = create_scene_pipeline(
                    &device,
                    &config,
                    &scene_shader,
                    &camera_bind_group_layout,
                    &material_bind_group_layout,
                    kind,
                );
                (kind, pipeline)
            })
            .collect();

        let depth_texture = Texture::create_depth_texture(&device, config.width, config.height, "Depth Texture");

        let max_instances = INITIAL_MAX_INSTANCES;
        let instance_buffer = create_instance_buffer(&device, max_instances);

        // --- Overlay (text) pipeline ---
        let overlay_bind_group_layout = create_overlay_bind_group_layout(&device);
        let overlay_pipeline = create_overlay_pipeline(&device, &config, &overlay_bind_group_layout);

        let (font_pixels, font_w, font_h) = generate_font_atlas();
        let font_texture = device.create_texture_with_data(
            &queue,
            &wgpu::TextureDescriptor {
                label: Some("Font Atlas"),
                size: wgpu::Extent3d {
                    width: font_w,
                    height: font_h,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::R8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &font_pixels,
        );
        let font_view = font_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let font_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let overlay_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &overlay_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&font_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&font_sampler),
                },
            ],
        });

        log::info!(
            "Renderer ready: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            scene_pipelines,
            camera_bind_group,
            camera_buffer,
            camera_uniform,
            material_bind_group_layout,
            white_texture,
            black_texture,
            depth_texture,
            instance_buffer,
            max_instances,
            overlay_pipeline,
            overlay_bind_group,
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Handle window resize. Zero-sized (minimised) windows are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.reconfigure();
        }
    }

    /// Reconfigure the surface at the current size (after `Lost`/`Outdated`).
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            Texture::create_depth_texture(&self.device, self.config.width, self.config.height, "Depth Texture");
    }

    /// Update camera and light uniform.
    pub fn update_camera(&mut self, camera: &Camera, lighting: &Lighting) {
        self.camera_uniform.update(camera, lighting);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[self.camera_uniform]));
    }

    /// Load a texture from disk, substituting a flat colour on failure.
    pub fn load_texture(&self, path: &Path, fallback: [f32; 4], srgb: bool) -> Texture {
        Texture::load_or_solid(&self.device, &self.queue, path, fallback, srgb)
    }

    /// Flat-colour texture.
    pub fn solid_texture(&self, color: [f32; 4], label: &str) -> Texture {
        Texture::solid(&self.device, &self.queue, color, true, label)
    }

    /// 1x1 white, used where a material has no surface map.
    pub fn white_texture(&self) -> &Texture {
        &self.white_texture
    }

    pub fn create_sphere(&self, segments: u32) -> Mesh {
        Mesh::sphere(&self.device, segments, (segments / 2).max(2))
    }

    pub fn create_annulus(&self, inner: f32, outer: f32, segments: u32) -> Mesh {
        Mesh::annulus(&self.device, inner, outer, segments)
    }

    /// Build a material bind group.
    pub fn create_material(&self, textures: MaterialTextures<'_>, params: &MaterialParams, label: &str) -> Material {
        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[params.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let night = textures.night.unwrap_or(&self.black_texture);
        let specular = textures.specular.unwrap_or(&self.black_texture);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.material_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&textures.surface.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&night.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&textures.surface.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        Material {
            bind_group,
            _uniform_buffer: uniform_buffer,
        }
    }

    /// Begin a new frame, returns the surface texture and a command encoder.
    pub fn begin_frame(&mut self) -> Result<(wgpu::SurfaceTexture, wgpu::CommandEncoder), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Ok((output, encoder))
    }

    fn ensure_instance_capacity(&mut self, needed: u32) {
        if needed <= self.max_instances {
            return;
        }
        let grown = needed.next_power_of_two();
        log::debug!("Growing instance buffer {} -> {}", self.max_instances, grown);
        self.instance_buffer = create_instance_buffer(&self.device, grown);
        self.max_instances = grown;
    }

    /// Clear the frame and draw every batch in order within one pass.
    pub fn render_scene(&mut self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, batches: &[DrawBatch<'_>]) {
        let total: usize = batches.iter().map(|b| b.instances.len()).sum();
        self.ensure_instance_capacity(total as u32);

        // Each batch gets its own region of the instance buffer.
        let mut ranges = Vec::with_capacity(batches.len());
        let mut offset = 0u32;
        for batch in batches {
            let count = batch.instances.len() as u32;
            if count > 0 {
                let byte_offset = offset as u64 * std::mem::size_of::<InstanceData>() as u64;
                self.queue
                    .write_buffer(&self.instance_buffer, byte_offset, bytemuck::cast_slice(batch.instances));
            }
            ranges.push(offset..offset + count);
            offset += count;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        let mut current_kind = None;
        for (batch, range) in batches.iter().zip(ranges) {
            if range.is_empty() {
                continue;
            }
            if current_kind != Some(batch.kind) {
                if let Some(pipeline) = self.scene_pipelines.get(&batch.kind) {
                    render_pass.set_pipeline(pipeline);
                }
                current_kind = Some(batch.kind);
            }
            render_pass.set_bind_group(1, &batch.material.bind_group, &[]);
            render_pass.set_vertex_buffer(0, batch.mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(batch.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..batch.mesh.num_indices, 0, range);
        }
    }

    /// Render screen-space text overlay. Call as the very last pass before end_frame.
    pub fn render_overlay(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, overlay: &OverlayTextBuilder) {
        if overlay.is_empty() {
            return;
        }

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Vertex Buffer"),
            contents: bytemuck::cast_slice(&overlay.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Index Buffer"),
            contents: bytemuck::cast_slice(&overlay.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.overlay_pipeline);
        render_pass.set_bind_group(0, &self.overlay_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..overlay.indices.len() as u32, 0, 0..1);
    }

    /// End frame and present.
    pub fn end_frame(&self, output: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

fn create_instance_buffer(device: &wgpu::Device, max_instances: u32) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Instance Buffer"),
        size: (std::mem::size_of::<InstanceData>() * max_instances as usize) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
