/// Flat-shaded axis-aligned box
use log::debug;

use super::{apply_pre_transform, check_dimension};
use crate::error::Result;
use crate::matrix::Mat44;
use crate::mesh::MeshData;
use crate::vector::Vec3;

// Two triangles per face, counter-clockwise seen from outside.
// Corner i has x = width if bit 0 is set, y = height for bit 1, z = depth for bit 2.
const FACES: [[usize; 6]; 6] = [
    [0, 2, 1, 1, 2, 3], // z = 0
    [1, 3, 5, 5, 3, 7], // x = width
    [5, 7, 4, 4, 7, 6], // z = depth
    [4, 6, 0, 0, 6, 2], // x = 0
    [2, 6, 3, 3, 6, 7], // y = height
    [4, 0, 5, 5, 0, 1], // y = 0
];

/// Box spanning `[0, width] × [0, height] × [0, depth]` before `pre_transform`.
///
/// Emits 36 vertices with one normal per face. Normals stay in local space;
/// only positions go through `pre_transform`. No texture coordinates.
pub fn make_box(
    width: f32,
    height: f32,
    depth: f32,
    color: Vec3,
    pre_transform: &Mat44,
) -> Result<MeshData> {
    check_dimension("width", width)?;
    check_dimension("height", height)?;
    check_dimension("depth", depth)?;

    let corners: [Vec3; 8] = std::array::from_fn(|i| {
        Vec3::new(
            if i & 1 != 0 { width } else { 0.0 },
            if i & 2 != 0 { height } else { 0.0 },
            if i & 4 != 0 { depth } else { 0.0 },
        )
    });

    let mut mesh = MeshData::with_capacity(36);
    for face in &FACES {
        let (v0, v1, v2) = (corners[face[0]], corners[face[1]], corners[face[2]]);
        let normal = (v1 - v0).cross(v2 - v0).try_normalize()?;

        for &corner in face {
            mesh.positions.push(corners[corner]);
            mesh.normals.push(normal);
        }
    }
    mesh.colors = vec![color; mesh.positions.len()];

    apply_pre_transform(&mut mesh.positions, pre_transform);

    debug!("box {width}x{height}x{depth}: {} vertices", mesh.vertex_count());
    Ok(mesh)
}
