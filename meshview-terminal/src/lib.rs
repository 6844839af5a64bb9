/// Terminal viewer: raw-mode frame loop over the ASCII rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use meshview_core::normalize::max_span;
use meshview_core::{load_model, Camera, Model, ProjectionMode, RotationState};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Interactive viewer application. Owns the currently displayed model
/// and swaps it only after a fully successful load.
pub struct TerminalApp {
    model: Model,
    status: String,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(model: Model, status: String) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut camera = Camera::new(width as u32, height as u32);
        camera.frame_extent(max_span(&model.bounds));

        Ok(Self {
            model,
            status,
            rotation: RotationState::new(0.3, 0.3, 0.0),
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            event::EnableBracketedPaste,
            cursor::Hide
        )?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            event::DisableBracketedPaste,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event()?;
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            // Terminals deliver a file dropped onto the window as a
            // bracketed paste of its path.
            Event::Paste(pasted) => self.load_dropped(&pasted),
            Event::Resize(width, height) => {
                self.camera.aspect = width as f32 / height as f32;
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            // Model rotation
            KeyCode::Char('w') => self.rotation.rotate(0.1, 0.0, 0.0),
            KeyCode::Char('s') => self.rotation.rotate(-0.1, 0.0, 0.0),
            KeyCode::Char('a') => self.rotation.rotate(0.0, -0.1, 0.0),
            KeyCode::Char('d') => self.rotation.rotate(0.0, 0.1, 0.0),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, 0.1),
            KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -0.1),
            // Camera orbit and zoom
            KeyCode::Left => self.camera.orbit(-0.1, 0.0),
            KeyCode::Right => self.camera.orbit(0.1, 0.0),
            KeyCode::Up => self.camera.orbit(0.0, 0.1),
            KeyCode::Down => self.camera.orbit(0.0, -0.1),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::PageUp => {
                self.camera.zoom(-0.1 * self.camera.distance)
            }
            KeyCode::Char('-') | KeyCode::PageDown => {
                self.camera.zoom(0.1 * self.camera.distance)
            }
            KeyCode::Char('p') => {
                self.camera.mode = match self.camera.mode {
                    ProjectionMode::Perspective => ProjectionMode::Orthographic,
                    ProjectionMode::Orthographic => ProjectionMode::Perspective,
                };
            }
            _ => {}
        }
    }

    /// Load a dropped file synchronously; the frame blocks until the
    /// load completes or fails. Failure keeps the current model on
    /// screen and only changes the status line.
    fn load_dropped(&mut self, pasted: &str) {
        let path = pasted.trim().trim_matches('\'').trim_matches('"');
        if path.is_empty() {
            return;
        }

        match load_model(path) {
            Ok(model) => {
                info!(path, faces = model.mesh.face_count(), "replacing displayed model");
                self.camera.frame_extent(max_span(&model.bounds));
                self.status = model.path.clone();
                self.model = model;
            }
            Err(err) => {
                warn!(path, error = %err, "load failed, keeping current model");
                self.status = err.status_label().to_string();
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let model_matrix = self.rotation.model_matrix();

        self.renderer.clear();
        self.renderer
            .render_buffers(&self.model.buffers, &model_matrix, &self.camera);

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | {} faces | FPS {:.1} | WASD=rotate E/R=roll arrows=orbit +/-=zoom Q=quit",
                self.status,
                self.model.mesh.face_count(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}
