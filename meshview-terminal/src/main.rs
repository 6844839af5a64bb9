/// Meshview Terminal - interactive STL/OBJ viewer
///
/// Usage: meshview-terminal [model.stl|model.obj]
///
/// Controls:
///   - WASD: rotate the model, E/R: roll
///   - Arrow Keys: orbit the camera, +/- or PgUp/PgDn: zoom, P: projection
///   - Drop a file onto the terminal: load it
///   - Q/ESC: quit

use std::env;
use std::io;

use meshview_core::{load_model, Mesh, Model};
use meshview_terminal::TerminalApp;

fn main() -> io::Result<()> {
    init_logging();

    let (model, status) = match env::args().nth(1) {
        Some(path) => match load_model(&path) {
            Ok(model) => {
                let status = model.path.clone();
                (model, status)
            }
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "startup load failed, showing built-in cube");
                let model = Model::from_mesh("built-in cube", Mesh::cube(2.0));
                (model, err.status_label().to_string())
            }
        },
        None => {
            let model = Model::from_mesh("built-in cube (drop a file to load)", Mesh::cube(2.0));
            let status = model.path.clone();
            (model, status)
        }
    };

    let mut app = TerminalApp::new(model, status)?;
    app.run()
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    // Stderr keeps log lines off the alternate screen; redirect it to a
    // file to capture them (RUST_LOG=debug meshview-terminal 2> log).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}
