/// Orbit camera and screen projection
use nalgebra::{Matrix4, Point3, Vector3};

/// Projection mode for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera orbiting a target point, parameterized by distance and two
/// angles (yaw around Y, pitch above the horizon).
pub struct Camera {
    pub target: Point3<f32>,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

/// Keep the pitch shy of the poles so the up vector never degenerates.
const PITCH_LIMIT: f32 = 1.5;

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Point3::origin(),
            distance: 5.0,
            yaw: 0.4,
            pitch: 0.3,
            up: Vector3::y(),
            fov: std::f32::consts::PI / 4.0,
            aspect: width as f32 / height as f32,
            near: 0.1,
            far: 2000.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Eye position derived from the spherical parameters.
    pub fn position(&self) -> Point3<f32> {
        let x = self.distance * self.yaw.sin() * self.pitch.cos();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.yaw.cos() * self.pitch.cos();
        self.target + Vector3::new(x, y, z)
    }

    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).max(self.near * 2.0);
    }

    /// Point the camera at a model of the given extent from a distance
    /// where the whole model is in frame.
    pub fn frame_extent(&mut self, extent: f32) {
        self.distance = (extent * 1.5).max(1.0);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = self.distance;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a model-space point to screen coordinates plus depth.
    /// Returns None for points behind the camera or outside the frustum.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        if clip.w.abs() < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&ndc_x)
            || !(-1.0..=1.0).contains(&ndc_y)
            || !(-1.0..=1.0).contains(&depth)
        {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;
        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
