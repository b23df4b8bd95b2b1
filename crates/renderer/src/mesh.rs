//! Mesh data structures and primitive generation.

use crate::vertex::Vertex;
use glam::Vec3;
use std::f32::consts::{PI, TAU};
use wgpu::util::DeviceExt;

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }

    /// Unit-radius UV sphere.
    pub fn sphere(device: &wgpu::Device, segments: u32, rings: u32) -> Self {
        MeshData::sphere(segments, rings).upload(device)
    }

    /// Flat ring in the XZ plane facing +Y.
    pub fn annulus(device: &wgpu::Device, inner: f32, outer: f32, segments: u32) -> Self {
        MeshData::annulus(inner, outer, segments).upload(device)
    }
}

/// Mesh data before GPU upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit UV sphere, counter-clockwise from outside. `u` runs west to
    /// east around +Y and `v` runs from the north pole (0) to the south (1),
    /// matching equirectangular planet maps.
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut data = Self::new();

        for ring in 0..=rings {
            let phi = PI * ring as f32 / rings as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for segment in 0..=segments {
                let theta = TAU * segment as f32 / segments as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();
                let position = Vec3::new(-cos_theta * sin_phi, cos_phi, sin_theta * sin_phi);
                let uv = [segment as f32 / segments as f32, ring as f32 / rings as f32];
                data.vertices.push(Vertex::new(position.into(), position.into(), uv));
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;
                data.indices.extend_from_slice(&[current, next, current + 1]);
                data.indices.extend_from_slice(&[current + 1, next, next + 1]);
            }
        }

        data
    }

    /// Flat annulus between `inner` and `outer` in the XZ plane, facing +Y.
    /// `u` runs across the band from inner to outer edge, `v` around it.
    pub fn annulus(inner: f32, outer: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut data = Self::new();
        let normal = [0.0, 1.0, 0.0];

        for segment in 0..=segments {
            let t = segment as f32 / segments as f32;
            let (sin_a, cos_a) = (t * TAU).sin_cos();
            data.vertices.push(Vertex::new([cos_a * inner, 0.0, sin_a * inner], normal, [0.0, t]));
            data.vertices.push(Vertex::new([cos_a * outer, 0.0, sin_a * outer], normal, [1.0, t]));
        }

        for segment in 0..segments {
            let i = segment * 2;
            // i = inner, i+1 = outer, i+2/i+3 = next angle.
            data.indices.extend_from_slice(&[i, i + 2, i + 1]);
            data.indices.extend_from_slice(&[i + 1, i + 2, i + 3]);
        }

        data
    }

    pub fn upload(&self, device: &wgpu::Device) -> Mesh {
        Mesh::new(device, &self.vertices, &self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_normal(data: &MeshData, tri: usize) -> (Vec3, Vec3) {
        let p = |i: usize| Vec3::from(data.vertices[data.indices[tri * 3 + i] as usize].position);
        let (a, b, c) = (p(0), p(1), p(2));
        ((b - a).cross(c - a), (a + b + c) / 3.0)
    }

    #[test]
    fn sphere_vertices_are_on_unit_sphere() {
        let data = MeshData::sphere(16, 8);
        assert_eq!(data.vertices.len(), 17 * 9);
        assert_eq!(data.indices.len(), 16 * 8 * 6);
        for v in &data.vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_faces_point_outward() {
        let data = MeshData::sphere(16, 8);
        for tri in 0..data.indices.len() / 3 {
            let (normal, centre) = triangle_normal(&data, tri);
            // Pole triangles are degenerate.
            if normal.length_squared() > 1e-10 {
                assert!(normal.dot(centre) > 0.0, "triangle {tri} faces inward");
            }
        }
    }

    #[test]
    fn annulus_spans_band_and_faces_up() {
        let data = MeshData::annulus(33.95, 34.05, 128);
        for v in &data.vertices {
            let r = Vec3::from(v.position).length();
            assert!(r > 33.9 && r < 34.1);
            assert_eq!(v.position[1], 0.0);
        }
        for tri in 0..data.indices.len() / 3 {
            let (normal, _) = triangle_normal(&data, tri);
            assert!(normal.y > 0.0);
        }
    }
}
