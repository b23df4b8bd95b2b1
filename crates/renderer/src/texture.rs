//! Texture loading and GPU upload.

use std::path::Path;

use image::RgbaImage;
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Errors that can occur while reading a texture file.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read texture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode texture: {0}")]
    Decode(#[from] image::ImageError),

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
}

/// Read and decode an image file into RGBA8, shrinking it to fit within
/// `max_dimension` on both axes.
pub fn decode_rgba(path: &Path, max_dimension: u32) -> Result<RgbaImage, TextureError> {
    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroSize { width, height });
    }
    let (fit_w, fit_h) = fit_within(width, height, max_dimension);
    if (fit_w, fit_h) == (width, height) {
        return Ok(image);
    }
    log::debug!("Downscaling {} from {}x{} to {}x{}", path.display(), width, height, fit_w, fit_h);
    Ok(image::imageops::resize(&image, fit_w, fit_h, image::imageops::FilterType::Triangle))
}

/// Largest size with the same aspect ratio that fits in `max` on both axes.
fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max {
        return (width, height);
    }
    let scale = max as f64 / longest as f64;
    (
        ((width as f64 * scale).round() as u32).clamp(1, max),
        ((height as f64 * scale).round() as u32).clamp(1, max),
    )
}

/// Convert a linear 0..1 colour to RGBA8.
pub fn color_to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// A GPU texture with its default view and sampler.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: (u32, u32),
}

impl Texture {
    /// Upload RGBA8 pixels. Colour maps are sRGB; data maps such as
    /// specular masks should pass `srgb = false`.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
        srgb: bool,
        label: &str,
    ) -> Self {
        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            pixels,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Spheres wrap horizontally; poles and ring edges clamp.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { texture, view, sampler, size: (width, height) }
    }

    /// Load an image file from disk.
    pub fn from_path(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path, srgb: bool) -> Result<Self, TextureError> {
        let max = device.limits().max_texture_dimension_2d;
        let image = decode_rgba(path, max)?;
        let (width, height) = image.dimensions();
        let label = path.file_name().and_then(|n| n.to_str()).unwrap_or("texture");
        Ok(Self::from_rgba(device, queue, image.as_raw(), width, height, srgb, label))
    }

    /// A 1x1 texture of a single colour.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, color: [f32; 4], srgb: bool, label: &str) -> Self {
        Self::from_rgba(device, queue, &color_to_rgba8(color), 1, 1, srgb, label)
    }

    /// Load `path`, or fall back to a 1x1 `fallback` colour if anything goes
    /// wrong. Never fails.
    pub fn load_or_solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        fallback: [f32; 4],
        srgb: bool,
    ) -> Self {
        match Self::from_path(device, queue, path, srgb) {
            Ok(texture) => {
                log::debug!("Loaded texture {} ({}x{})", path.display(), texture.size.0, texture.size.1);
                texture
            }
            Err(e) => {
                log::warn!("Texture {} unavailable ({}), using flat colour", path.display(), e);
                Self::solid(device, queue, fallback, srgb, "Fallback Texture")
            }
        }
    }

    /// Create a depth texture matching the surface size.
    pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self { texture, view, sampler, size: (size.width, size.height) }
    }
}
