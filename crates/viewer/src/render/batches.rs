//! GPU resources for the scene: one instanced batch per distinct appearance.

use std::collections::HashMap;
use std::path::Path;

use engine_core::Transform;
use glam::Vec3;
use hecs::{Entity, World};
use renderer::{
    DrawBatch, InstanceData, Material, MaterialParams, MaterialTextures, Mesh, PipelineKind, Renderer, Texture,
};
use solar_system::{Appearance, MaterialKind, MeshShape};

const WHITE: [f32; 4] = [1.0; 4];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Pipeline an appearance is drawn with.
pub fn pipeline_kind(appearance: &Appearance) -> PipelineKind {
    match (appearance.material, appearance.shape) {
        (MaterialKind::Backdrop, _) => PipelineKind::Backdrop,
        (MaterialKind::Translucent { .. }, _) => PipelineKind::Translucent,
        (MaterialKind::Lit, MeshShape::Sphere { .. }) => PipelineKind::Opaque,
        // Flat rings are seen from both sides; the sun is seen from inside when flown into.
        (MaterialKind::Lit, MeshShape::Annulus { .. }) | (MaterialKind::Unlit, _) => PipelineKind::DoubleSided,
    }
}

/// Shader parameters. Textured surfaces are not tinted; the tint stands in
/// for the texture only when there is none.
pub fn material_params(appearance: &Appearance) -> MaterialParams {
    let (opacity, lit) = match appearance.material {
        MaterialKind::Unlit | MaterialKind::Backdrop => (1.0, false),
        MaterialKind::Lit => (1.0, true),
        MaterialKind::Translucent { opacity, lit } => (opacity, lit),
    };
    MaterialParams {
        tint: if appearance.texture.is_some() { WHITE } else { appearance.tint },
        opacity,
        emissive: appearance.emissive,
        shininess: appearance.shininess,
        lit,
    }
}

/// Entities sharing an appearance, in first-seen order.
pub fn group_by_appearance(world: &World) -> Vec<(Appearance, Vec<Entity>)> {
    let mut groups: Vec<(Appearance, Vec<Entity>)> = Vec::new();
    for (entity, appearance) in world.query::<&Appearance>().iter() {
        match groups.iter_mut().find(|(look, _)| look == appearance) {
            Some((_, members)) => members.push(entity),
            None => groups.push((*appearance, vec![entity])),
        }
    }
    groups
}

/// Backdrop first, then opaque batches as given, then translucent ones far
/// to near. `batches` holds each batch's pipeline and its farthest member's
/// distance from the camera.
pub fn draw_order(batches: &[(PipelineKind, f32)]) -> Vec<usize> {
    let of_kind = |pred: fn(PipelineKind) -> bool| {
        batches
            .iter()
            .enumerate()
            .filter(move |(_, (kind, _))| pred(*kind))
            .map(|(i, _)| i)
    };
    let mut order: Vec<usize> = of_kind(|k| k == PipelineKind::Backdrop).collect();
    order.extend(of_kind(|k| matches!(k, PipelineKind::Opaque | PipelineKind::DoubleSided)));

    let mut translucent: Vec<usize> = of_kind(|k| k == PipelineKind::Translucent).collect();
    translucent.sort_by(|&a, &b| batches[b].1.total_cmp(&batches[a].1));
    order.extend(translucent);
    order
}

struct Batch {
    kind: PipelineKind,
    mesh: usize,
    material: Material,
    entities: Vec<Entity>,
}

/// Per-frame instance data, in draw order.
pub struct FrameInstances {
    draws: Vec<(usize, Vec<InstanceData>)>,
}

/// Meshes, textures and materials for everything with an `Appearance`.
pub struct GpuScene {
    meshes: Vec<(MeshShape, Mesh)>,
    batches: Vec<Batch>,
    _textures: HashMap<&'static str, Texture>,
}

impl GpuScene {
    /// Upload meshes and load textures from `texture_dir`. Textures that fail
    /// to load fall back to flat colours.
    pub fn build(renderer: &Renderer, world: &World, texture_dir: &Path) -> Self {
        let groups = group_by_appearance(world);

        let mut textures: HashMap<&'static str, Texture> = HashMap::new();
        let mut load = |name: &'static str, fallback: [f32; 4], srgb: bool| {
            textures
                .entry(name)
                .or_insert_with(|| renderer.load_texture(&texture_dir.join(name), fallback, srgb));
        };
        for (look, _) in &groups {
            if let Some(name) = look.texture {
                load(name, look.tint, true);
            }
            if let Some(name) = look.night_texture {
                load(name, BLACK, true);
            }
            if let Some(name) = look.specular_texture {
                load(name, BLACK, false);
            }
        }

        let mut meshes: Vec<(MeshShape, Mesh)> = Vec::new();
        let mut batches = Vec::with_capacity(groups.len());
        for (look, entities) in groups {
            let mesh = match meshes.iter().position(|(shape, _)| *shape == look.shape) {
                Some(index) => index,
                None => {
                    let mesh = match look.shape {
                        MeshShape::Sphere { segments } => renderer.create_sphere(segments),
                        MeshShape::Annulus { inner, outer, segments } => {
                            renderer.create_annulus(inner, outer, segments)
                        }
                    };
                    meshes.push((look.shape, mesh));
                    meshes.len() - 1
                }
            };

            let surface = look
                .texture
                .and_then(|name| textures.get(name))
                .unwrap_or_else(|| renderer.white_texture());
            let material = renderer.create_material(
                MaterialTextures {
                    surface,
                    night: look.night_texture.and_then(|name| textures.get(name)),
                    specular: look.specular_texture.and_then(|name| textures.get(name)),
                },
                &material_params(&look),
                look.texture.unwrap_or("Flat Material"),
            );

            batches.push(Batch {
                kind: pipeline_kind(&look),
                mesh,
                material,
                entities,
            });
        }

        log::info!(
            "GPU scene: {} batches, {} meshes, {} textures",
            batches.len(),
            meshes.len(),
            textures.len()
        );

        Self {
            meshes,
            batches,
            _textures: textures,
        }
    }

    /// Gather current transforms into instance data, ordered for drawing.
    pub fn frame_instances(&self, world: &World, camera_position: Vec3) -> FrameInstances {
        let mut per_batch: Vec<Vec<InstanceData>> = Vec::with_capacity(self.batches.len());
        let mut sort_keys = Vec::with_capacity(self.batches.len());

        for batch in &self.batches {
            let mut instances = Vec::with_capacity(batch.entities.len());
            let mut farthest = 0.0f32;
            for &entity in &batch.entities {
                if let Ok(transform) = world.get::<&Transform>(entity) {
                    farthest = farthest.max(transform.position.distance(camera_position));
                    instances.push(InstanceData::new(transform.to_matrix(), WHITE));
                }
            }
            per_batch.push(instances);
            sort_keys.push((batch.kind, farthest));
        }

        let order = draw_order(&sort_keys);
        let mut slots: Vec<Option<Vec<InstanceData>>> = per_batch.into_iter().map(Some).collect();
        let draws = order
            .into_iter()
            .filter_map(|index| slots[index].take().map(|instances| (index, instances)))
            .collect();
        FrameInstances { draws }
    }

    /// Borrowed draw calls for `Renderer::render_scene`.
    pub fn draw_batches<'a>(&'a self, frame: &'a FrameInstances) -> Vec<DrawBatch<'a>> {
        frame
            .draws
            .iter()
            .map(|(index, instances)| {
                let batch = &self.batches[*index];
                DrawBatch {
                    kind: batch.kind,
                    mesh: &self.meshes[batch.mesh].1,
                    material: &batch.material,
                    instances,
                }
            })
            .collect()
    }
}
