/// vmesh terminal viewer
///
/// Renders the batched spaceship by default, a TOML scene or an OBJ model
/// when given a path.
/// Controls:
///   - WASD / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - I/J/K/L: Orbit the camera
///   - +/-: Zoom
///   - Space: Toggle spin
///   - Q/ESC: Quit
use std::error::Error;
use std::path::Path;

use log::info;
use vmesh_terminal::{load_obj, SceneConfig, TerminalApp};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = std::env::args().nth(1);
    let (mesh, camera) = match path.as_deref().map(Path::new) {
        Some(path) if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("obj")) => {
            (load_obj(path)?, SceneConfig::default().camera)
        }
        Some(path) => {
            let scene = SceneConfig::load_from_file(path)?;
            (scene.build_mesh()?, scene.camera)
        }
        None => {
            let scene = SceneConfig::default();
            (scene.build_mesh()?, scene.camera)
        }
    };
    info!("starting viewer with {} vertices", mesh.vertex_count());

    let mut app = TerminalApp::new(mesh, &camera)?;
    app.run()?;
    Ok(())
}
