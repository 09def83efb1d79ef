//! Procedural ornament meshes
//!
//! Unit-sized solids (half-extent / radius 0.5) centered on the origin;
//! per-instance transforms provide placement and scale.

use std::f32::consts::{PI, TAU};
use crate::math::Vec3;

/// A vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    /// Convert to flat array for WebGL buffer
    /// Layout: position(3) + normal(3) = 6 floats
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.position.x, self.position.y, self.position.z,
            self.normal.x, self.normal.y, self.normal.z,
        ]
    }
}

/// A mesh composed of vertices and triangle indices
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add vertices and return the starting index
    pub fn add_vertices(&mut self, verts: impl IntoIterator<Item = Vertex>) -> u32 {
        let start = self.vertices.len() as u32;
        self.vertices.extend(verts);
        start
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.push(a);
        self.indices.push(b);
        self.indices.push(c);
    }

    /// Add a quad as two triangles (CCW winding)
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    /// Flatten vertex data for upload
    pub fn vertex_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.vertices.len() * 6);
        for v in &self.vertices {
            data.extend_from_slice(&v.to_array());
        }
        data
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Axis-aligned unit cube with flat face normals
pub fn cube() -> Mesh {
    let mut mesh = Mesh::new();
    let h = 0.5;

    // (normal, four CCW corners seen from outside)
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        (
            Vec3::new(0.0, 0.0, 1.0),
            [
                Vec3::new(-h, -h, h),
                Vec3::new(h, -h, h),
                Vec3::new(h, h, h),
                Vec3::new(-h, h, h),
            ],
        ),
        (
            Vec3::new(0.0, 0.0, -1.0),
            [
                Vec3::new(h, -h, -h),
                Vec3::new(-h, -h, -h),
                Vec3::new(-h, h, -h),
                Vec3::new(h, h, -h),
            ],
        ),
        (
            Vec3::new(1.0, 0.0, 0.0),
            [
                Vec3::new(h, -h, h),
                Vec3::new(h, -h, -h),
                Vec3::new(h, h, -h),
                Vec3::new(h, h, h),
            ],
        ),
        (
            Vec3::new(-1.0, 0.0, 0.0),
            [
                Vec3::new(-h, -h, -h),
                Vec3::new(-h, -h, h),
                Vec3::new(-h, h, h),
                Vec3::new(-h, h, -h),
            ],
        ),
        (
            Vec3::new(0.0, 1.0, 0.0),
            [
                Vec3::new(-h, h, h),
                Vec3::new(h, h, h),
                Vec3::new(h, h, -h),
                Vec3::new(-h, h, -h),
            ],
        ),
        (
            Vec3::new(0.0, -1.0, 0.0),
            [
                Vec3::new(-h, -h, -h),
                Vec3::new(h, -h, -h),
                Vec3::new(h, -h, h),
                Vec3::new(-h, -h, h),
            ],
        ),
    ];

    for (normal, corners) in faces {
        let base = mesh.add_vertices(corners.into_iter().map(|p| Vertex::new(p, normal)));
        mesh.add_quad(base, base + 1, base + 2, base + 3);
    }

    mesh
}

/// Latitude/longitude sphere with smooth normals
pub fn uv_sphere(segments: usize, rings: usize) -> Mesh {
    assert!(segments >= 3 && rings >= 2, "sphere needs at least 3x2 subdivisions");

    let mut mesh = Mesh::new();
    let radius = 0.5;

    for ring in 0..=rings {
        let phi = ring as f32 / rings as f32 * PI;
        for segment in 0..=segments {
            let theta = segment as f32 / segments as f32 * TAU;
            let normal = Vec3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            mesh.vertices.push(Vertex::new(normal.scale(radius), normal));
        }
    }

    let stride = (segments + 1) as u32;
    for ring in 0..rings as u32 {
        for segment in 0..segments as u32 {
            let a = ring * stride + segment;
            let b = a + stride;
            mesh.add_quad(a, a + 1, b + 1, b);
        }
    }

    mesh
}

/// Octahedron with flat face normals, the classic faceted light shape
pub fn octahedron() -> Mesh {
    let mut mesh = Mesh::new();
    let r = 0.5;

    let top = Vec3::new(0.0, r, 0.0);
    let bottom = Vec3::new(0.0, -r, 0.0);
    let equator = [
        Vec3::new(r, 0.0, 0.0),
        Vec3::new(0.0, 0.0, r),
        Vec3::new(-r, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -r),
    ];

    for i in 0..4 {
        let a = equator[i];
        let b = equator[(i + 1) % 4];

        let upper_normal = (top - a).cross(&(b - a)).normalize();
        let base = mesh.add_vertices([
            Vertex::new(a, upper_normal),
            Vertex::new(top, upper_normal),
            Vertex::new(b, upper_normal),
        ]);
        mesh.add_triangle(base, base + 1, base + 2);

        let lower_normal = (b - a).cross(&(bottom - a)).normalize();
        let base = mesh.add_vertices([
            Vertex::new(a, lower_normal),
            Vertex::new(b, lower_normal),
            Vertex::new(bottom, lower_normal),
        ]);
        mesh.add_triangle(base, base + 1, base + 2);
    }

    mesh
}
