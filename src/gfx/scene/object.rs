use std::ops::Range;

use wgpu::Device;

use super::vertex::Vertex3D;
use crate::gfx::{geometry::GeometryData, resources::material::MaterialId};

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
    /// Material this mesh is drawn with when it belongs to a loaded model
    pub material: Option<MaterialId>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;

        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
            material: None,
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();
        Self::new(vertices, indices)
    }

    /// Builds a mesh from flat OBJ attribute arrays.
    ///
    /// Missing normals are computed from the faces; missing texture
    /// coordinates become zero. OBJ v points up, so it is flipped.
    pub fn from_flat_arrays(
        positions: &[f32],
        normals: &[f32],
        tex_coords: &[f32],
        indices: Vec<u32>,
    ) -> Self {
        let computed;
        let normals = if !normals.is_empty() && normals.len() == positions.len() {
            normals
        } else {
            computed = Self::calculate_face_normals(positions, &indices);
            computed.as_slice()
        };

        let vertices = (0..positions.len() / 3)
            .map(|i| {
                let tex_coords = match tex_coords.get(i * 2..i * 2 + 2) {
                    Some(&[u, v]) => [u, 1.0 - v],
                    _ => [0.0, 0.0],
                };
                Vertex3D {
                    position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                    normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
                    tex_coords,
                }
            })
            .collect();

        Self::new(vertices, indices)
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    // Smooth vertex normals for OBJ files that ship without them
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; positions.len()];
        let mut counts = vec![0; vertex_count];

        let vertex = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

        for triangle in indices.chunks_exact(3) {
            let i0 = triangle[0] as usize;
            let i1 = triangle[1] as usize;
            let i2 = triangle[2] as usize;

            let v0 = vertex(i0);
            let v1 = vertex(i1);
            let v2 = vertex(i2);

            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

            let face_normal = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];

            for &vertex_idx in &[i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal[0];
                normals[vertex_idx * 3 + 1] += face_normal[1];
                normals[vertex_idx * 3 + 2] += face_normal[2];
                counts[vertex_idx] += 1;
            }
        }

        for i in 0..vertex_count {
            if counts[i] == 0 {
                continue;
            }
            let length = (normals[i * 3].powi(2)
                + normals[i * 3 + 1].powi(2)
                + normals[i * 3 + 2].powi(2))
            .sqrt();
            if length > 0.0 {
                normals[i * 3] /= length;
                normals[i * 3 + 1] /= length;
                normals[i * 3 + 2] /= length;
            }
        }

        normals
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    pub fn init_gpu_resources(&mut self, device: &Device, label: &str) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }
}

/// A named group of meshes, one per OBJ material group
pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
}

impl Object {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
        }
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        for (i, mesh) in self.meshes.iter_mut().enumerate() {
            mesh.init_gpu_resources(device, &format!("{} #{i}", self.name));
        }
        log::debug!("Uploaded {} ({} meshes)", self.name, self.meshes.len());
    }

    pub fn triangle_count(&self) -> u32 {
        self.meshes.iter().map(|m| m.index_count / 3).sum()
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return;
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;

    #[test]
    fn test_face_normals_follow_winding() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = Mesh::calculate_face_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unreferenced_vertex_keeps_zero_normal() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 5.0, 5.0, 5.0];
        let normals = Mesh::calculate_face_normals(&positions, &[0, 1, 2]);
        assert_eq!(&normals[9..], &[0.0_f32, 0.0, 0.0]);
    }

    #[test]
    fn test_flat_arrays_flip_v_and_fill_normals() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let tex_coords = [0.0, 0.0, 1.0, 0.25, 0.0, 1.0];
        let mesh = Mesh::from_flat_arrays(&positions, &[], &tex_coords, vec![0, 1, 2]);

        assert_eq!(mesh.vertices()[1].tex_coords, [1.0, 0.75]);
        assert_eq!(mesh.vertices()[2].tex_coords, [0.0, 0.0]);
        assert_eq!(mesh.vertices()[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.index_count(), 3);
        assert!(!mesh.is_uploaded());
    }

    #[test]
    fn test_object_triangle_count() {
        let object = Object::new(
            "boxes",
            vec![
                Mesh::from_geometry(&generate_box(0.2)),
                Mesh::from_geometry(&generate_box(0.2)).with_material(3),
            ],
        );
        assert_eq!(object.triangle_count(), 24);
        assert_eq!(object.meshes[1].material, Some(3));
    }
}
