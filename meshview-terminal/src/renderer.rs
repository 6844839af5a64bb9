/// ASCII rasterizer over the pipeline's flat buffers
use crossterm::{
    style::{Color, Print, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

use meshview_core::{Camera, MeshBuffers};

/// Character luminosity ramp (darkest to lightest).
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Depth-buffered renderer that turns projected triangles into colored
/// terminal characters.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Rasterize every triangle in the flat buffers. The buffers hold
    /// 9 position floats, 9 broadcast normal floats, and 9 color bytes
    /// per triangle, in face order.
    pub fn render_buffers(
        &mut self,
        buffers: &MeshBuffers,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        let light = (camera.position() - camera.target).normalize();

        for triangle in 0..buffers.triangle_count() {
            self.render_triangle(buffers, triangle, model_matrix, camera, &light);
        }
    }

    fn render_triangle(
        &mut self,
        buffers: &MeshBuffers,
        index: usize,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        light: &Vector3<f32>,
    ) {
        let base = index * 9;

        let mut screen = [(0.0f32, 0.0f32, 0.0f32); 3];
        for (corner, coords) in screen.iter_mut().enumerate() {
            let offset = base + corner * 3;
            let position = Point3::new(
                buffers.positions[offset],
                buffers.positions[offset + 1],
                buffers.positions[offset + 2],
            );
            match camera.project_to_screen(
                &position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *coords = projected,
                None => return,
            }
        }

        // The face normal is broadcast per vertex; the first copy is
        // enough. Rotate it with the model so shading tracks the spin.
        let normal = Vector3::new(
            buffers.normals[base],
            buffers.normals[base + 1],
            buffers.normals[base + 2],
        );
        let rotated = model_matrix.transform_vector(&normal);

        // Double-sided headlight shading.
        let brightness = rotated.dot(light).abs().min(1.0);

        let ramp_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let character = LUMINOSITY_RAMP[ramp_index.min(LUMINOSITY_RAMP.len() - 1)];

        let fade = 0.35 + 0.65 * brightness;
        let color = Color::Rgb {
            r: (buffers.colors[base] as f32 * fade) as u8,
            g: (buffers.colors[base + 1] as f32 * fade) as u8,
            b: (buffers.colors[base + 2] as f32 * fade) as u8,
        };

        self.rasterize_triangle(&screen, character, color);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };

                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    let cell = y as usize * self.width + x as usize;
                    if depth < self.depth_buffer[cell] {
                        self.depth_buffer[cell] = depth;
                        self.char_buffer[cell] = character;
                        self.color_buffer[cell] = color;
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(crossterm::cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[cell]))?;
                writer.queue(Print(self.char_buffer[cell]))?;
            }
        }
        writer.queue(crossterm::style::ResetColor)?;
        Ok(())
    }
}

/// Barycentric coordinates of a point in a screen-space triangle; None
/// for degenerate (zero-area) triangles.
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barycentric_weights_sum_to_one_inside() {
        let (w0, w1, w2) =
            barycentric((0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (2.0, 2.0)).unwrap();
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-5);
        assert!(w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0);
    }

    #[test]
    fn barycentric_rejects_degenerate_triangles() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }

    #[test]
    fn cube_buffers_rasterize_some_cells() {
        use meshview_core::Mesh;
        use nalgebra::Matrix4;

        let buffers = MeshBuffers::build(&Mesh::cube(2.0));
        let camera = Camera::new(40, 20);
        let mut renderer = AsciiRenderer::new(40, 20);

        renderer.clear();
        renderer.render_buffers(&buffers, &Matrix4::identity(), &camera);

        let lit = renderer.char_buffer.iter().filter(|&&c| c != ' ').count();
        assert!(lit > 0, "expected the cube to cover at least one cell");
    }
}
