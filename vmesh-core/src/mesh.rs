/// Non-indexed triangle mesh stored as one sequence per vertex attribute
use log::warn;

use crate::error::{GeometryError, Result};
use crate::vector::{Vec2, Vec3};

/// Vertices `3k`, `3k + 1` and `3k + 2` form triangle `k`.
///
/// `positions`, `colors` and `normals` always have the same length.
/// `tex_coords` is either empty or matches them as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            tex_coords: Vec::new(),
        }
    }

    /// Number of vertices to draw
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    /// Check the per-attribute length rules
    pub fn validate(&self) -> Result<()> {
        let n = self.positions.len();
        if self.colors.len() != n || self.normals.len() != n {
            return Err(GeometryError::MalformedMesh(format!(
                "{n} positions but {} colors and {} normals",
                self.colors.len(),
                self.normals.len()
            )));
        }
        if !self.tex_coords.is_empty() && self.tex_coords.len() != n {
            return Err(GeometryError::MalformedMesh(format!(
                "{} texture coordinates for {n} vertices",
                self.tex_coords.len()
            )));
        }
        if n % 3 != 0 {
            return Err(GeometryError::MalformedMesh(format!(
                "{n} vertices do not form whole triangles"
            )));
        }
        Ok(())
    }

    /// Triangle corner positions in emission order
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.positions.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Empty when the mesh carries no texture coordinates
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tex_coords)
    }
}

/// Append every attribute of `b` onto `a`, reusing `a`'s storage.
///
/// The result is purely structural: no transform, no deduplication.
/// Joining a textured mesh with an untextured one leaves a partial
/// texture-coordinate stream, which [`MeshData::validate`] reports.
pub fn concatenate(mut a: MeshData, b: &MeshData) -> MeshData {
    a.positions.extend_from_slice(&b.positions);
    a.colors.extend_from_slice(&b.colors);
    a.normals.extend_from_slice(&b.normals);
    a.tex_coords.extend_from_slice(&b.tex_coords);

    if a.has_tex_coords() && a.tex_coords.len() != a.positions.len() {
        warn!(
            "concatenated mesh has {} texture coordinates for {} vertices",
            a.tex_coords.len(),
            a.positions.len()
        );
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32, textured: bool) -> MeshData {
        let positions = vec![
            Vec3::new(offset, 0.0, 0.0),
            Vec3::new(offset + 1.0, 0.0, 0.0),
            Vec3::new(offset, 1.0, 0.0),
        ];
        MeshData {
            colors: vec![Vec3::splat(offset); 3],
            normals: vec![Vec3::Z; 3],
            tex_coords: if textured {
                vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]
            } else {
                Vec::new()
            },
            positions,
        }
    }

    #[test]
    fn test_concatenate_sums_lengths_and_keeps_prefix() {
        let a = triangle(0.0, true);
        let b = triangle(5.0, true);
        let merged = concatenate(a.clone(), &b);

        assert_eq!(merged.positions.len(), a.positions.len() + b.positions.len());
        assert_eq!(merged.colors.len(), 6);
        assert_eq!(merged.normals.len(), 6);
        assert_eq!(merged.tex_coords.len(), 6);
        assert_eq!(merged.positions[..3], a.positions[..]);
        assert_eq!(merged.positions[3..], b.positions[..]);
        assert_eq!(merged.colors[..3], a.colors[..]);
        assert_eq!(merged.tex_coords[..3], a.tex_coords[..]);
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_concatenate_with_empty() {
        let a = triangle(1.0, false);
        assert_eq!(concatenate(MeshData::new(), &a), a);
        assert_eq!(concatenate(a.clone(), &MeshData::new()), a);
    }

    #[test]
    fn test_concatenate_mixed_texturing_is_reported() {
        let merged = concatenate(triangle(0.0, true), &triangle(1.0, false));
        assert_eq!(merged.tex_coords.len(), 3);
        assert_eq!(merged.vertex_count(), 6);
        assert!(matches!(merged.validate(), Err(GeometryError::MalformedMesh(_))));
    }

    #[test]
    fn test_validate_rejects_mismatched_streams() {
        let mut mesh = triangle(0.0, false);
        assert!(mesh.validate().is_ok());

        mesh.normals.pop();
        assert!(mesh.validate().is_err());

        let mut partial = triangle(0.0, false);
        for stream in [&mut partial.positions, &mut partial.colors, &mut partial.normals] {
            stream.pop();
        }
        assert!(partial.validate().is_err());
    }

    #[test]
    fn test_triangles_iterator() {
        let mesh = concatenate(triangle(0.0, false), &triangle(2.0, false));
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris.len(), mesh.triangle_count());
        assert_eq!(tris[1][0], Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_attribute_bytes() {
        let mesh = triangle(0.0, false);
        assert_eq!(mesh.position_bytes().len(), 3 * 3 * 4);
        assert_eq!(mesh.color_bytes().len(), 36);
        assert_eq!(mesh.normal_bytes().len(), 36);
        assert!(mesh.tex_coord_bytes().is_empty());
        assert_eq!(triangle(0.0, true).tex_coord_bytes().len(), 3 * 2 * 4);
    }
}
