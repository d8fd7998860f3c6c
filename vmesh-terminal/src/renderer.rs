/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use vmesh_core::{Camera, GeometryError, Mat44, MeshData, Transform, Vec3};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light travels along the view axis towards the scene
const LIGHT_DIR_VIEW: Vec3 = Vec3::Z;

/// Share of the vertex color visible on unlit faces
const AMBIENT: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

/// ASCII renderer that converts non-indexed meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
    }

    /// Number of cells currently covered by geometry
    pub fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.glyph != ' ').count()
    }

    pub fn render_mesh(
        &mut self,
        mesh: &MeshData,
        model_matrix: &Mat44,
        camera: &Camera,
    ) -> Result<(), GeometryError> {
        mesh.validate()?;
        let view = camera.view_matrix();
        let mvp = Transform::mvp_matrix(model_matrix, &view, &camera.projection_matrix()?);
        let normal_to_view = Transform::normal_matrix(&(view * *model_matrix))?;

        for k in 0..mesh.triangle_count() {
            self.render_triangle(mesh, k, &mvp, &normal_to_view);
        }
        Ok(())
    }

    fn render_triangle(&mut self, mesh: &MeshData, k: usize, mvp: &Mat44, normal_to_view: &Mat44) {
        let base = 3 * k;

        // Project vertices to screen space
        let mut screen = [(0.0, 0.0, 0.0); 3];
        for (corner, slot) in screen.iter_mut().enumerate() {
            match Camera::project(
                mvp,
                mesh.positions[base + corner],
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *slot = projected,
                None => return, // Triangle is clipped
            }
        }

        let normal = mesh.normals[base..base + 3]
            .iter()
            .fold(Vec3::ZERO, |sum, &n| sum + n);
        let normal = normal_to_view.transform_direction(normal).normalize();
        let brightness = normal.dot(LIGHT_DIR_VIEW).max(0.0);

        // Map brightness to character; unlit faces still show as '.'
        let index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let glyph = LUMINOSITY_RAMP[index.clamp(1, LUMINOSITY_RAMP.len() - 1)];
        let color = shade(mesh.colors[base], brightness);

        self.rasterize_triangle(&screen, Cell { glyph, color });
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                if let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.cells[idx] = cell;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.glyph))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Scale an RGB color in `[0, 1]` by lambert brightness over an ambient floor
fn shade(color: Vec3, brightness: f32) -> Color {
    let lit = color * (AMBIENT + (1.0 - AMBIENT) * brightness);
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(lit.x),
        g: channel(lit.y),
        b: channel(lit.z),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
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
    Some((w0, w1, 1.0 - w0 - w1))
}
