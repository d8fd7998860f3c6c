/// Cone side surface with a texture-coordinate fan
use log::debug;

use super::{apply_pre_transform, check_subdivs, unit_ring};
use crate::error::Result;
use crate::matrix::Mat44;
use crate::mesh::MeshData;
use crate::transform::Transform;
use crate::vector::{Vec2, Vec3};

/// Height of the apex in local space
pub const CONE_APEX_Y: f32 = 0.2;
/// Height of the unit-radius base ring in local space
pub const CONE_BASE_Y: f32 = -0.2;

/// Cone around +Y split into `subdivs` flat side triangles (`3 * subdivs`
/// vertices).
///
/// Triangle `i` is `(apex, ring[i], ring[i + 1])`. The ring starts at `+X`
/// and runs clockwise seen from above, so each triangle is counter-clockwise
/// seen from outside.
///
/// Side normals go through the normal matrix of `pre_transform` and are
/// renormalized. `capped` is accepted for interface parity with
/// [`make_cylinder`](super::make_cylinder); the base disc is not emitted.
pub fn make_cone(
    capped: bool,
    subdivs: usize,
    color: Vec3,
    pre_transform: &Mat44,
) -> Result<MeshData> {
    check_subdivs(subdivs)?;
    let normal_matrix = Transform::normal_matrix(pre_transform)?;

    let apex = Vec3::new(0.0, CONE_APEX_Y, 0.0);
    let ring = unit_ring(subdivs);

    let mut mesh = MeshData::with_capacity(3 * subdivs);
    mesh.tex_coords.reserve(3 * subdivs);

    for i in 0..subdivs {
        let (x1, s1) = ring[i];
        let (x2, s2) = ring[(i + 1) % subdivs];
        let (z1, z2) = (-s1, -s2);
        let p1 = Vec3::new(x1, CONE_BASE_Y, z1);
        let p2 = Vec3::new(x2, CONE_BASE_Y, z2);

        mesh.positions.extend_from_slice(&[apex, p1, p2]);

        let side = (p1 - apex).cross(p2 - apex);
        let normal = normal_matrix.transform_direction(side).try_normalize()?;
        mesh.normals.extend_from_slice(&[normal; 3]);

        mesh.tex_coords.extend_from_slice(&[
            Vec2::new(0.5, 0.5),
            Vec2::new(x1 * 0.5 + 0.5, z1 * 0.5 + 0.5),
            Vec2::new(x2 * 0.5 + 0.5, z2 * 0.5 + 0.5),
        ]);
    }

    mesh.colors = vec![color; mesh.positions.len()];
    apply_pre_transform(&mut mesh.positions, pre_transform);

    debug!(
        "cone (capped: {capped}, {subdivs} segments): {} vertices",
        mesh.vertex_count()
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_vertex_counts() {
        for n in [3, 4, 16, 64] {
            let mesh = make_cone(true, n, Vec3::splat(1.0), &Mat44::IDENTITY).unwrap();
            assert_eq!(mesh.positions.len(), 3 * n);
            assert_eq!(mesh.normals.len(), 3 * n);
            assert_eq!(mesh.tex_coords.len(), 3 * n);
            assert_eq!(mesh.colors.len(), 3 * n);
            assert!(mesh.validate().is_ok());
        }
        let uncapped = make_cone(false, 5, Vec3::splat(1.0), &Mat44::IDENTITY).unwrap();
        assert_eq!(uncapped.vertex_count(), 15);
    }

    #[test]
    fn test_side_normals_lean_outward_and_up() {
        let mesh = make_cone(false, 32, Vec3::splat(1.0), &Mat44::IDENTITY).unwrap();
        for (k, [apex, b, c]) in mesh.triangles().enumerate() {
            let normal = mesh.normals[3 * k];
            assert_abs_diff_eq!(normal.length(), 1.0, epsilon = 1e-5);
            assert!(normal.y > 0.0);

            let outward = (b + c) * 0.5 - apex;
            let radial = Vec3::new(outward.x, 0.0, outward.z);
            assert!(radial.dot(normal) > 0.0);

            let winding = (b - apex).cross(c - apex);
            assert!(winding.dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_tex_coord_fan() {
        let mesh = make_cone(true, 4, Vec3::splat(1.0), &Mat44::IDENTITY).unwrap();
        for (k, tri) in mesh.tex_coords.chunks_exact(3).enumerate() {
            assert_eq!(tri[0], Vec2::new(0.5, 0.5));
            for (corner, tc) in tri.iter().enumerate().skip(1) {
                let p = mesh.positions[3 * k + corner];
                assert_abs_diff_eq!(*tc, Vec2::new(p.x * 0.5 + 0.5, p.z * 0.5 + 0.5), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_ring_closes_exactly() {
        let mesh = make_cone(true, 7, Vec3::splat(1.0), &Mat44::IDENTITY).unwrap();
        let first_ring_point = mesh.positions[1];
        let last_closing_point = mesh.positions[3 * 6 + 2];
        assert_eq!(first_ring_point, last_closing_point);
    }

    #[test]
    fn test_emission_order() {
        let mesh = make_cone(false, 4, Vec3::splat(1.0), &Mat44::IDENTITY).unwrap();
        let ring = |i: usize| mesh.positions[3 * i + 1];

        assert_eq!(mesh.positions[0], Vec3::new(0.0, CONE_APEX_Y, 0.0));
        assert_eq!(mesh.positions[1], Vec3::new(1.0, CONE_BASE_Y, 0.0));
        assert_abs_diff_eq!(ring(1), Vec3::new(0.0, CONE_BASE_Y, -1.0), epsilon = 1e-6);
        for i in 0..4 {
            // (apex, ring i, ring i + 1)
            assert_eq!(mesh.positions[3 * i], mesh.positions[0]);
            assert_eq!(mesh.positions[3 * i + 2], ring((i + 1) % 4));
        }
    }

    #[test]
    fn test_tiny_uniform_scale_is_accepted() {
        let pre = Transform::scaling(1e-4, 1e-4, 1e-4);
        let mesh = make_cone(false, 8, Vec3::splat(1.0), &pre).unwrap();
        let reference = make_cone(false, 8, Vec3::splat(1.0), &Mat44::IDENTITY).unwrap();
        for (n, expected) in mesh.normals.iter().zip(&reference.normals) {
            assert_abs_diff_eq!(*n, *expected, epsilon = 1e-5);
        }
        assert_abs_diff_eq!(mesh.positions[0], Vec3::new(0.0, 2e-5, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_normals_use_inverse_transpose() {
        let pre = Transform::scaling(1.0, 4.0, 1.0);
        let mesh = make_cone(true, 16, Vec3::splat(1.0), &pre).unwrap();

        for (k, [a, b, c]) in mesh.triangles().enumerate() {
            let normal = mesh.normals[3 * k];
            // Still perpendicular to the transformed surface
            assert_abs_diff_eq!((b - a).dot(normal), 0.0, epsilon = 1e-4);
            assert_abs_diff_eq!((c - a).dot(normal), 0.0, epsilon = 1e-4);
            assert_abs_diff_eq!(normal.length(), 1.0, epsilon = 1e-5);
        }
        assert_abs_diff_eq!(mesh.positions[0], Vec3::new(0.0, 0.8, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_color_is_uniform() {
        let color = Vec3::new(0.9, 0.1, 0.3);
        let mesh = make_cone(true, 5, color, &Mat44::IDENTITY).unwrap();
        assert!(mesh.colors.iter().all(|&c| c == color));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            make_cone(true, 2, Vec3::splat(1.0), &Mat44::IDENTITY),
            Err(GeometryError::InvalidShape { .. })
        ));
        assert!(matches!(
            make_cone(true, 8, Vec3::splat(1.0), &Transform::scaling(1.0, 1.0, 0.0)),
            Err(GeometryError::SingularMatrix { .. })
        ));
    }
}
