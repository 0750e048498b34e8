//! Built-in primitive geometry.
//!
//! Vertex/index builders for a unit cube and a UV sphere, for scenes that
//! don't load anything from disk. Tangent frames are axis-aligned per face
//! (cube) or derived from the parameterization (sphere), good enough for
//! normal mapping on these shapes.

use std::f32::consts::PI;

use crate::render::mesh::Vertex;

/// Unit cube centered on the origin: 24 vertices (4 per face, so normals
/// stay flat), 36 indices, CCW winding.
pub fn cube() -> (Vec<Vertex>, Vec<u32>) {
    // (normal, tangent) per face; bitangent = normal × tangent.
    const FACES: [([f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),  // +Z
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0]), // -Z
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),  // +Y
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0]), // -Y
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0]), // +X
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]), // -X
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, (normal, tangent)) in FACES.iter().enumerate() {
        let n = glam::Vec3::from_array(*normal);
        let t = glam::Vec3::from_array(*tangent);
        let b = n.cross(t);

        // Corners in (tangent, bitangent) space on the face plane.
        let corners = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        for ((u, v), uv) in corners.iter().zip(uvs) {
            let position = n * 0.5 + t * *u + b * *v;
            vertices.push(Vertex {
                position: position.to_array(),
                normal: *normal,
                uv,
                tangent: *tangent,
                bitangent: b.to_array(),
                ..Default::default()
            });
        }

        let base = (face * 4) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    (vertices, indices)
}

/// UV sphere of radius 0.5 centered on the origin.
///
/// `segments` divides the equator, `rings` divides pole to pole. 32×16 is a
/// reasonable default.
pub fn sphere(segments: u32, rings: u32) -> (Vec<Vertex>, Vec<u32>) {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..=segments {
            let theta = 2.0 * PI * seg as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            // Tangent points along increasing theta; degenerate at the
            // poles, where ring_radius is 0.
            let tangent = glam::Vec3::new(-theta.sin(), 0.0, theta.cos());
            let normal = glam::Vec3::new(x, y, z);
            let bitangent = normal.cross(tangent);

            vertices.push(Vertex {
                position: [x * 0.5, y * 0.5, z * 0.5],
                normal: normal.to_array(),
                uv: [seg as f32 / segments as f32, ring as f32 / rings as f32],
                tangent: tangent.to_array(),
                bitangent: bitangent.to_array(),
                ..Default::default()
            });
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_expected_counts_and_unit_normals() {
        let (vertices, indices) = cube();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for v in &vertices {
            let n = glam::Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
        }
        assert!(indices.iter().all(|&i| (i as usize) < 24));
    }

    #[test]
    fn sphere_vertices_lie_on_the_radius() {
        let (vertices, indices) = sphere(8, 4);
        for v in &vertices {
            let p = glam::Vec3::from_array(v.position);
            assert!((p.length() - 0.5).abs() < 1e-4);
        }
        let max = vertices.len() as u32;
        assert!(indices.iter().all(|&i| i < max));
    }
}
