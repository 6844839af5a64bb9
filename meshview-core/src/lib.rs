/// Meshview Core Library - model ingestion and normalization pipeline
///
/// Parses triangle-mesh models (ASCII/binary STL and a Wavefront OBJ
/// subset) into a canonical face representation, normalizes scale so
/// arbitrary inputs display consistently, and flattens render buffers
/// for the viewer. Also provides the camera and rotation math the
/// renderer consumes.

pub mod buffers;
pub mod camera;
pub mod error;
pub mod format;
pub mod geometry;
pub mod loader;
pub mod normalize;
pub mod obj;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use buffers::MeshBuffers;
pub use camera::{Camera, ProjectionMode};
pub use error::LoadError;
pub use format::{ModelFormat, StlEncoding};
pub use geometry::{BoundingBox, Face, Mesh};
pub use loader::{load_model, Model};
pub use transform::RotationState;
