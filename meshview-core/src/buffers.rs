/// Flat buffer layout for renderer handoff
use crate::geometry::Mesh;
use crate::normalize::shade_color;

/// Parallel per-vertex buffers in face order, ready for one-shot upload
/// to whatever consumes the mesh. Pure layout transform; the only
/// geometry involved is the documented shading-normal fallback.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    /// x, y, z per vertex; three vertices per face.
    pub positions: Vec<f32>,
    /// The face's shading normal, broadcast to each of its vertices.
    pub normals: Vec<f32>,
    /// Flat per-face RGB, repeated for each of the three vertices.
    pub colors: Vec<u8>,
}

impl MeshBuffers {
    pub fn build(mesh: &Mesh) -> Self {
        let vertex_count = mesh.face_count() * 3;
        let mut buffers = Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            colors: Vec::with_capacity(vertex_count * 3),
        };

        for face in &mesh.faces {
            let normal = face.shading_normal();
            let color = shade_color(&normal);
            for vertex in &face.vertices {
                buffers.positions.extend_from_slice(&[vertex.x, vertex.y, vertex.z]);
                buffers.normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
                buffers.colors.extend_from_slice(&color);
            }
        }

        buffers
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 9
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
