/// Terminal-based ASCII viewer for vmesh primitive batches
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::info;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use thiserror::Error;
use vmesh_core::{Camera, GeometryError, MeshData, RotationState, Transform};

pub mod config;
pub mod obj;
pub mod renderer;

pub use config::{CameraConfig, ConfigError, SceneConfig};
pub use obj::{
    load_mtl, load_obj, parse_mtl, parse_obj, parse_obj_with_materials, MaterialLibrary, ObjError,
};
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// Radians per key press
const ROTATE_STEP: f32 = 0.1;

/// Orbit radius change per key press
const ZOOM_STEP: f32 = 0.25;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: MeshData,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    spin: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: MeshData, camera_config: &CameraConfig) -> Result<Self, AppError> {
        mesh.validate()?;
        let (width, height) = terminal::size()?;
        info!(
            "viewing {} triangles in a {width}x{height} terminal",
            mesh.triangle_count()
        );

        Ok(Self {
            mesh,
            rotation: RotationState::new(0.3, 0.3, 0.0),
            camera: camera_config.camera(width as u32, height as u32 * CELL_ASPECT),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            spin: camera_config.spin,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if self.spin {
                self.rotation.rotate(0.01, 0.015, 0.0);
            }

            self.render()?;

            // Frame timing
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

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.rotation.rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.rotation.rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.rotation.rotate(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.rotation.rotate(0.0, ROTATE_STEP, 0.0),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -ROTATE_STEP),
            KeyCode::Char('j') => self.camera.orbit(-ROTATE_STEP, 0.0),
            KeyCode::Char('l') => self.camera.orbit(ROTATE_STEP, 0.0),
            KeyCode::Char('i') => self.camera.orbit(0.0, -ROTATE_STEP),
            KeyCode::Char('k') => self.camera.orbit(0.0, ROTATE_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom(-ZOOM_STEP),
            KeyCode::Char('-') => self.camera.zoom(ZOOM_STEP),
            KeyCode::Char(' ') => self.spin = !self.spin,
            _ => {}
        }
    }

    fn render(&mut self) -> Result<(), AppError> {
        let model = Transform::rotation_matrix(&self.rotation);

        self.renderer.clear();
        self.renderer.render_mesh(&self.mesh, &model, &self.camera)?;

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "vmesh | {} tris | FPS: {:.1} | WASD/Arrows=Rotate E/R=Roll IJKL=Orbit +/-=Zoom Space=Spin Q=Quit",
                self.mesh.triangle_count(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
