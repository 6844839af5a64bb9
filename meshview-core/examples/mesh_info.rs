/// Example: run the load pipeline on a model file and report what it
/// produced, without entering the interactive viewer.
///
/// Usage: cargo run --example mesh_info -- path/to/model.stl

use std::env;
use std::process::ExitCode;

use meshview_core::load_model;

fn main() -> ExitCode {
    tracing_subscriber_init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("Usage: mesh_info <model.stl|model.obj>");
        return ExitCode::FAILURE;
    };

    match load_model(&path) {
        Ok(model) => {
            println!("{}", model.path);
            println!("  faces:     {}", model.mesh.face_count());
            println!(
                "  bounds:    ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
                model.bounds.min.x,
                model.bounds.min.y,
                model.bounds.min.z,
                model.bounds.max.x,
                model.bounds.max.y,
                model.bounds.max.z,
            );
            println!("  triangles: {}", model.buffers.triangle_count());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} ({err})", err.status_label());
            ExitCode::FAILURE
        }
    }
}

fn tracing_subscriber_init() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
