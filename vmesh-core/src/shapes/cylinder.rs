/// Unit cylinder along +X with optional end caps
use log::debug;

use super::{apply_pre_transform, check_subdivs, unit_ring};
use crate::error::Result;
use crate::matrix::Mat44;
use crate::mesh::MeshData;
use crate::transform::Transform;
use crate::vector::Vec3;

/// Cylinder of radius 1 from `x = 0` to `x = 1`.
///
/// The side wall has `6 * subdivs` vertices. Each segment's two triangles
/// share one radial normal (through the middle of the segment) carried
/// through the normal matrix of `pre_transform`. When `capped`, each
/// segment adds one fan triangle per end (`12 * subdivs` vertices in
/// total); cap normals are the local `-X` / `+X` axes and are not
/// transformed.
pub fn make_cylinder(
    capped: bool,
    subdivs: usize,
    color: Vec3,
    pre_transform: &Mat44,
) -> Result<MeshData> {
    check_subdivs(subdivs)?;
    let normal_matrix = Transform::normal_matrix(pre_transform)?;

    let ring = unit_ring(subdivs);
    let vertex_count = if capped { 12 * subdivs } else { 6 * subdivs };
    let mut mesh = MeshData::with_capacity(vertex_count);

    for i in 0..subdivs {
        let (prev_y, prev_z) = ring[i];
        let (y, z) = ring[(i + 1) % subdivs];

        let side = [
            Vec3::new(0.0, prev_y, prev_z),
            Vec3::new(0.0, y, z),
            Vec3::new(1.0, prev_y, prev_z),
            Vec3::new(0.0, y, z),
            Vec3::new(1.0, y, z),
            Vec3::new(1.0, prev_y, prev_z),
        ];
        let radial = Vec3::new(0.0, prev_y + y, prev_z + z);
        let normal = normal_matrix.transform_direction(radial).try_normalize()?;
        mesh.positions.extend_from_slice(&side);
        mesh.normals.extend_from_slice(&[normal; 6]);
    }

    if capped {
        let bottom_center = Vec3::ZERO;
        let top_center = Vec3::X;

        for i in 0..subdivs {
            let (prev_y, prev_z) = ring[i];
            let (y, z) = ring[(i + 1) % subdivs];

            mesh.positions.extend_from_slice(&[
                bottom_center,
                Vec3::new(0.0, y, z),
                Vec3::new(0.0, prev_y, prev_z),
            ]);
            mesh.normals.extend_from_slice(&[-Vec3::X; 3]);

            mesh.positions.extend_from_slice(&[
                top_center,
                Vec3::new(1.0, prev_y, prev_z),
                Vec3::new(1.0, y, z),
            ]);
            mesh.normals.extend_from_slice(&[Vec3::X; 3]);
        }
    }

    mesh.colors = vec![color; mesh.positions.len()];
    apply_pre_transform(&mut mesh.positions, pre_transform);

    debug!(
        "cylinder (capped: {capped}, {subdivs} segments): {} vertices",
        mesh.vertex_count()
    );
    Ok(mesh)
}
