//! # Procedural Geometry Generation
//!
//! Generates the box and pyramid primitives most of the scene is built from,
//! so only the detailed models come from files.
//!
//! ## Usage
//!
//! ```rust
//! use chadd_scene::gfx::geometry::{generate_box, generate_pyramid};
//!
//! let cube = generate_box(0.2);
//! let pyramid = generate_pyramid(0.2);
//! assert_eq!(cube.triangle_count(), 12);
//! assert_eq!(pyramid.triangle_count(), 6);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Half extent shared by the primitive box and pyramid
pub const PRIMITIVE_HALF_EXTENT: f32 = 0.2;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves the attribute arrays into renderer vertices.
    ///
    /// Generated UVs have v pointing up; the renderer samples images top-down,
    /// so v is flipped here.
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = (0..self.vertices.len())
            .map(|i| {
                let [u, v] = self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]);
                Vertex3D {
                    position: self.vertices[i],
                    normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                    tex_coords: [u, 1.0 - v],
                }
            })
            .collect();

        (vertices, self.indices.clone())
    }
}
