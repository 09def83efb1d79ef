pub mod primitives;

pub use primitives::{Mesh, Vertex, cube, uv_sphere, octahedron};
