//! ECS components for the solar system scene.

use engine_core::Entity;

/// A named sphere that orbits something and rotates about its own axis.
/// The name lives in [`engine_core::Name`], the display radius in the
/// transform scale and the rotation period in its [`engine_core::Spin`] rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CelestialBody;

/// Circular orbit in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Body being orbited. `None` orbits the origin.
    pub parent: Option<Entity>,
    pub distance: f32,
    pub speed_factor: f32,
    /// Radians, unwrapped.
    pub angle: f32,
}

/// Which kind of shell an [`Overlay`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Atmosphere,
    Clouds,
    Rings,
}

/// A shell that rides on another body. Position is copied from the owner
/// every frame; rotation comes from the overlay's own `Spin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub owner: Entity,
    pub kind: OverlayKind,
}

/// Static orbit path marker. The radius is baked into its annulus mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitGuide;

/// The central star.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sun;

/// The starfield sphere around everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Backdrop;

/// Geometry used to draw an entity. Spheres are unit spheres scaled by the
/// transform; annuli are built at their final size in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    Sphere { segments: u32 },
    Annulus { inner: f32, outer: f32, segments: u32 },
}

/// How a surface is shaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Texture or tint only; ignores lights.
    Unlit,
    /// Point light from the sun plus ambient.
    Lit,
    /// Inside of a huge unlit sphere, drawn behind everything.
    Backdrop,
    /// Blended, double sided, no depth writes.
    Translucent { opacity: f32, lit: bool },
}

impl MaterialKind {
    pub fn is_translucent(&self) -> bool {
        matches!(self, MaterialKind::Translucent { .. })
    }
}

/// Everything the renderer needs to draw an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub shape: MeshShape,
    pub material: MaterialKind,
    /// Surface texture file name. `None` draws the flat tint.
    pub texture: Option<&'static str>,
    /// Emissive map shown on the unlit side.
    pub night_texture: Option<&'static str>,
    /// Greyscale mask scaling specular highlights.
    pub specular_texture: Option<&'static str>,
    /// Flat colour, also the stand-in for a texture that fails to load.
    pub tint: [f32; 4],
    pub emissive: f32,
    pub shininess: f32,
}

impl Appearance {
    pub fn textured(shape: MeshShape, material: MaterialKind, texture: &'static str, tint: [f32; 4]) -> Self {
        Self {
            shape,
            material,
            texture: Some(texture),
            night_texture: None,
            specular_texture: None,
            tint,
            emissive: 0.0,
            shininess: 0.0,
        }
    }

    pub fn flat(shape: MeshShape, material: MaterialKind, tint: [f32; 4]) -> Self {
        Self {
            shape,
            material,
            texture: None,
            night_texture: None,
            specular_texture: None,
            tint,
            emissive: 0.0,
            shininess: 0.0,
        }
    }
}
