//! # Primitive Shape Generation
//!
//! Boxes and square pyramids with flat per-face normals and texture
//! coordinates. Both are centred on the origin and wound counter-clockwise
//! when seen from outside.

use cgmath::{InnerSpace, Vector3};

use super::GeometryData;

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Appends one quad facing `normal`; `u × v` must equal `normal`.
fn push_quad(
    data: &mut GeometryData,
    centre: Vector3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
    normal: Vector3<f32>,
) {
    let base = data.vertices.len() as u32;
    let corners = [centre - u - v, centre + u - v, centre + u + v, centre - u + v];

    for (corner, uv) in corners.iter().zip(QUAD_UVS) {
        data.vertices.push((*corner).into());
        data.normals.push(normal.into());
        data.tex_coords.push(uv);
    }

    data.indices
        .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
}

/// Generate an axis-aligned cube spanning `-half_extent..half_extent`.
pub fn generate_box(half_extent: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let h = half_extent;

    // (normal, u, v) with u × v = normal
    let faces = [
        (Vector3::unit_x(), -Vector3::unit_z(), Vector3::unit_y()),
        (-Vector3::unit_x(), Vector3::unit_z(), Vector3::unit_y()),
        (Vector3::unit_y(), Vector3::unit_x(), -Vector3::unit_z()),
        (-Vector3::unit_y(), Vector3::unit_x(), Vector3::unit_z()),
        (Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y()),
        (-Vector3::unit_z(), -Vector3::unit_x(), Vector3::unit_y()),
    ];

    for (normal, u, v) in faces {
        push_quad(&mut data, normal * h, u * h, v * h, normal);
    }

    data
}

/// Generate a square pyramid: base at `y = -half_extent`, apex at `y = half_extent`.
pub fn generate_pyramid(half_extent: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let h = half_extent;
    let down = -Vector3::unit_y();

    push_quad(
        &mut data,
        down * h,
        Vector3::unit_x() * h,
        Vector3::unit_z() * h,
        down,
    );

    let apex = Vector3::unit_y() * h;
    let sides = [
        Vector3::unit_z(),
        Vector3::unit_x(),
        -Vector3::unit_z(),
        -Vector3::unit_x(),
    ];

    for out in sides {
        let along = Vector3::unit_y().cross(out);
        let a = (out - along + down) * h;
        let b = (out + along + down) * h;
        let normal = (b - a).cross(apex - a).normalize();

        let base = data.vertices.len() as u32;
        for (p, uv) in [(a, [0.0, 0.0]), (b, [1.0, 0.0]), (apex, [0.5, 1.0])] {
            data.vertices.push(p.into());
            data.normals.push(normal.into());
            data.tex_coords.push(uv);
        }
        data.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(p: [f32; 3]) -> Vector3<f32> {
        Vector3::new(p[0], p[1], p[2])
    }

    /// Every triangle of a convex, origin-centred shape must face away from
    /// the origin and agree with its stored normals.
    fn assert_outward(data: &GeometryData) {
        for tri in data.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| v(data.vertices[i as usize]));
            let face = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0, "inward triangle {tri:?}");

            for &i in tri {
                let n = v(data.normals[i as usize]);
                assert!(face.normalize().dot(n) > 0.99, "normal mismatch at {i}");
            }
        }
    }

    #[test]
    fn test_box_counts_and_extent() {
        let data = generate_box(0.2);
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);
        assert_eq!(data.tex_coords.len(), 24);
        for p in &data.vertices {
            for c in p {
                assert!((c.abs() - 0.2).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_box_is_wound_outward() {
        assert_outward(&generate_box(0.2));
    }

    #[test]
    fn test_pyramid_counts_and_apex() {
        let data = generate_pyramid(0.2);
        assert_eq!(data.vertex_count(), 16);
        assert_eq!(data.triangle_count(), 6);
        let top = data
            .vertices
            .iter()
            .map(|p| p[1])
            .fold(f32::MIN, f32::max);
        assert!((top - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_pyramid_is_wound_outward() {
        assert_outward(&generate_pyramid(0.2));
    }

    #[test]
    fn test_normals_are_unit_length() {
        for data in [generate_box(1.0), generate_pyramid(1.0)] {
            for n in &data.normals {
                assert!((v(*n).magnitude() - 1.0).abs() < 1e-5);
            }
        }
    }
}
