/// Geometry primitives for model ingestion and rendering
use nalgebra::{Point3, Vector3};

/// One triangle of a mesh: three vertices in counter-clockwise winding
/// (viewed from the normal side) plus a face normal. A zero normal means
/// the source file supplied none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub vertices: [Point3<f32>; 3],
    pub normal: Vector3<f32>,
}

impl Face {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
            normal,
        }
    }

    /// A face without a stored normal.
    pub fn flat(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self::new(v0, v1, v2, Vector3::zeros())
    }

    pub fn has_normal(&self) -> bool {
        self.normal != Vector3::zeros()
    }

    /// Normal derived from the winding order. Degenerate triangles yield
    /// the zero vector rather than NaNs.
    pub fn geometric_normal(&self) -> Vector3<f32> {
        let edge1 = self.vertices[1] - self.vertices[0];
        let edge2 = self.vertices[2] - self.vertices[0];
        let normal = edge1.cross(&edge2);

        if normal.norm_squared() <= f32::EPSILON {
            Vector3::zeros()
        } else {
            normal.normalize()
        }
    }

    /// The normal used for shading: the stored one, or the geometric
    /// fallback when the file supplied none.
    pub fn shading_normal(&self) -> Vector3<f32> {
        if self.has_normal() {
            self.normal
        } else {
            self.geometric_normal()
        }
    }

    pub fn scale(&mut self, factor: f32) {
        for vertex in &mut self.vertices {
            *vertex *= factor;
        }
    }
}

/// A triangle mesh; face order matches the order in the source file.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self { faces: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            faces: Vec::with_capacity(capacity),
        }
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Built-in cube model, shown when no file has been loaded.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let corner = |x: f32, y: f32, z: f32| Point3::new(x * half, y * half, z * half);
        let mut mesh = Self::with_capacity(12);

        let quads: [([f32; 3], [f32; 3], [f32; 3], [f32; 3], Vector3<f32>); 6] = [
            // Front
            ([-1., -1., 1.], [1., -1., 1.], [1., 1., 1.], [-1., 1., 1.], Vector3::z()),
            // Back
            ([1., -1., -1.], [-1., -1., -1.], [-1., 1., -1.], [1., 1., -1.], -Vector3::z()),
            // Top
            ([-1., 1., 1.], [1., 1., 1.], [1., 1., -1.], [-1., 1., -1.], Vector3::y()),
            // Bottom
            ([-1., -1., -1.], [1., -1., -1.], [1., -1., 1.], [-1., -1., 1.], -Vector3::y()),
            // Right
            ([1., -1., 1.], [1., -1., -1.], [1., 1., -1.], [1., 1., 1.], Vector3::x()),
            // Left
            ([-1., -1., -1.], [-1., -1., 1.], [-1., 1., 1.], [-1., 1., -1.], -Vector3::x()),
        ];

        for (a, b, c, d, normal) in quads {
            let a = corner(a[0], a[1], a[2]);
            let b = corner(b[0], b[1], b[2]);
            let c = corner(c[0], c[1], c[2]);
            let d = corner(d[0], d[1], d[2]);
            mesh.add_face(Face::new(a, b, c, normal));
            mesh.add_face(Face::new(a, c, d, normal));
        }

        mesh
    }
}

/// Axis-aligned bounding box over all vertices of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    /// The degenerate all-zero box, used for an empty mesh.
    pub fn zero() -> Self {
        Self {
            min: Point3::origin(),
            max: Point3::origin(),
        }
    }

    pub fn of_mesh(mesh: &Mesh) -> Self {
        let mut vertices = mesh.faces.iter().flat_map(|face| face.vertices.iter());

        let Some(first) = vertices.next() else {
            return Self::zero();
        };

        let mut min = *first;
        let mut max = *first;
        for vertex in vertices {
            min.x = min.x.min(vertex.x);
            min.y = min.y.min(vertex.y);
            min.z = min.z.min(vertex.z);

            max.x = max.x.max(vertex.x);
            max.y = max.y.max(vertex.y);
            max.z = max.z.max(vertex.z);
        }

        Self { min, max }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn geometric_normal_follows_winding() {
        let face = Face::flat(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(face.geometric_normal(), Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn geometric_normal_of_degenerate_face_is_zero() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let face = Face::flat(p, p, p);
        assert_eq!(face.geometric_normal(), Vector3::zeros());
    }

    #[test]
    fn shading_normal_prefers_stored_normal() {
        let face = Face::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Vector3::x(),
        );
        assert_eq!(face.shading_normal(), Vector3::x());
    }

    #[test]
    fn bounding_box_contains_all_vertices() {
        let mut mesh = Mesh::new();
        mesh.add_face(Face::flat(
            Point3::new(-1.0, 2.0, 0.5),
            Point3::new(3.0, -4.0, 1.0),
            Point3::new(0.0, 0.0, -2.0),
        ));
        let bounds = BoundingBox::of_mesh(&mesh);

        for face in &mesh.faces {
            for vertex in &face.vertices {
                assert!(bounds.min.x <= vertex.x && vertex.x <= bounds.max.x);
                assert!(bounds.min.y <= vertex.y && vertex.y <= bounds.max.y);
                assert!(bounds.min.z <= vertex.z && vertex.z <= bounds.max.z);
            }
        }
        assert_eq!(bounds.min, Point3::new(-1.0, -4.0, -2.0));
        assert_eq!(bounds.max, Point3::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn bounding_box_of_empty_mesh_is_zero() {
        assert_eq!(BoundingBox::of_mesh(&Mesh::new()), BoundingBox::zero());
    }

    #[test]
    fn cube_has_twelve_outward_faces() {
        let mesh = Mesh::cube(2.0);
        assert_eq!(mesh.face_count(), 12);

        for face in &mesh.faces {
            // Stored axis normal must agree with the winding-derived one.
            assert_relative_eq!(face.geometric_normal(), face.normal, epsilon = 1e-6);
        }
    }
}
