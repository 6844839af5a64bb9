/// Model rotation state and matrix construction
use nalgebra::{Matrix4, Vector3};

/// Accumulated rotation around the three axes, in radians.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Model matrix for the current rotation, applied in Z, Y, X order.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(self.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.z));
        rz * ry * rx
    }
}
