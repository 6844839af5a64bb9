/// Load pipeline: path → format dispatch → parse → normalize → buffers
use std::fs;

use tracing::info;

use crate::buffers::MeshBuffers;
use crate::error::LoadError;
use crate::format::{ModelFormat, StlEncoding};
use crate::geometry::{BoundingBox, Mesh};
use crate::normalize;
use crate::obj;
use crate::stl;

/// A fully ingested model, ready for display. Everything here is rebuilt
/// per load; a failed load leaves the caller's current model untouched.
#[derive(Debug, Clone)]
pub struct Model {
    /// Source path, or a descriptive label for built-in meshes.
    pub path: String,
    pub mesh: Mesh,
    pub bounds: BoundingBox,
    pub buffers: MeshBuffers,
}

impl Model {
    /// Normalize a parsed mesh and flatten its render buffers.
    pub fn from_mesh(path: impl Into<String>, mut mesh: Mesh) -> Self {
        normalize::normalize_scale(&mut mesh);
        let bounds = BoundingBox::of_mesh(&mesh);
        let buffers = MeshBuffers::build(&mesh);
        Self {
            path: path.into(),
            mesh,
            bounds,
            buffers,
        }
    }
}

/// Run the whole ingestion pipeline for one file, synchronously on the
/// calling thread. The load either completes or fails before returning.
pub fn load_model(path: &str) -> Result<Model, LoadError> {
    let format = ModelFormat::from_path(path)?;
    let data = fs::read(path)?;

    let mesh = match format {
        ModelFormat::Stl => match StlEncoding::detect(&data)? {
            StlEncoding::Ascii => stl::parse_ascii_stl(&String::from_utf8_lossy(&data))?,
            StlEncoding::Binary => stl::parse_binary_stl(&data)?,
        },
        ModelFormat::Obj => obj::parse_obj(&String::from_utf8_lossy(&data))?,
    };

    let model = Model::from_mesh(path, mesh);
    info!(
        path,
        faces = model.mesh.face_count(),
        "model loaded"
    );
    Ok(model)
}
