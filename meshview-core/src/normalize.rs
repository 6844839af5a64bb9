/// Bounding-box-driven scale normalization and flat-shading color
use nalgebra::Vector3;
use tracing::debug;

use crate::geometry::{BoundingBox, Mesh};

/// Models spanning more than this many units get scaled down.
pub const SPAN_THRESHOLD: f32 = 200.0;

/// Largest |min| + |max| extent across the three axes.
pub fn max_span(bounds: &BoundingBox) -> f32 {
    let x = bounds.min.x.abs() + bounds.max.x.abs();
    let y = bounds.min.y.abs() + bounds.max.y.abs();
    let z = bounds.min.z.abs() + bounds.max.z.abs();
    x.max(y).max(z)
}

/// Integer factor an oversized mesh gets divided by; 0 when the mesh is
/// already within the threshold.
pub fn downscale_factor(bounds: &BoundingBox) -> u32 {
    let span = max_span(bounds);
    if span > SPAN_THRESHOLD {
        (span / SPAN_THRESHOLD).floor() as u32
    } else {
        0
    }
}

/// Scale an oversized mesh into the threshold's order of magnitude and
/// return the factor applied (0 when nothing changed).
///
/// The factor is quantized to an integer on purpose: the mesh is not
/// rescaled to fit the threshold exactly, only brought into its order of
/// magnitude. A mesh already within the threshold is untouched, so the
/// stage is idempotent.
pub fn normalize_scale(mesh: &mut Mesh) -> u32 {
    let bounds = BoundingBox::of_mesh(mesh);
    let factor = downscale_factor(&bounds);

    if factor != 0 {
        debug!(factor, span = max_span(&bounds), "downscaling oversized model");
        let scale = 1.0 / factor as f32;
        for face in &mut mesh.faces {
            face.scale(scale);
        }
    }

    factor
}

/// Flat display color for a face: the shading normal's Y component
/// mapped into an 8-bit channel, identical across R/G/B. A cheap
/// directional proxy, not lighting.
pub fn shade_color(normal: &Vector3<f32>) -> [u8; 3] {
    let channel = (128.0 + (100.0 * normal.y).round()).clamp(0.0, 255.0) as u8;
    [channel; 3]
}
