/// Procedural primitive generators
///
/// Every generator emits a non-indexed [`MeshData`] in local space and then
/// moves the positions through the caller's pre-transform.
use log::debug;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::matrix::Mat44;
use crate::mesh::{concatenate, MeshData};
use crate::transform::Transform;
use crate::vector::Vec3;

mod cone;
mod cuboid;
mod cylinder;

pub use cone::{make_cone, CONE_APEX_Y, CONE_BASE_Y};
pub use cuboid::make_box;
pub use cylinder::make_cylinder;

/// Fewest angular segments that still enclose any area
pub const MIN_SUBDIVS: usize = 3;

pub(crate) fn check_dimension(parameter: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::InvalidShape {
            parameter,
            value,
            reason: "must be positive and finite",
        })
    }
}

pub(crate) fn check_subdivs(subdivs: usize) -> Result<()> {
    if subdivs >= MIN_SUBDIVS {
        Ok(())
    } else {
        Err(GeometryError::InvalidShape {
            parameter: "subdivs",
            value: subdivs as f32,
            reason: "at least 3 segments are required",
        })
    }
}

/// `(cos, sin)` of `subdivs` evenly spaced angles, starting at zero
pub(crate) fn unit_ring(subdivs: usize) -> Vec<(f32, f32)> {
    (0..subdivs)
        .map(|i| {
            let angle = i as f32 / subdivs as f32 * TAU;
            (angle.cos(), angle.sin())
        })
        .collect()
}

pub(crate) fn apply_pre_transform(positions: &mut [Vec3], pre_transform: &Mat44) {
    for p in positions.iter_mut() {
        *p = pre_transform.transform_point(*p);
    }
}

/// Where a primitive sits in the scene.
///
/// The matrix rotates first (X, then Y, then Z), then translates, then
/// scales the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub scale: Vec3,
    pub translation: Vec3,
    pub rotation_degrees: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            scale: Vec3::splat(1.0),
            translation: Vec3::ZERO,
            rotation_degrees: Vec3::ZERO,
        }
    }
}

impl Placement {
    pub fn matrix(&self) -> Mat44 {
        let r = self.rotation_degrees;
        Transform::scaling(self.scale.x, self.scale.y, self.scale.z)
            * Transform::translation(self.translation)
            * Transform::rotation_z(r.z.to_radians())
            * Transform::rotation_y(r.y.to_radians())
            * Transform::rotation_x(r.x.to_radians())
    }
}

fn default_capped() -> bool {
    true
}

fn default_subdivs() -> usize {
    16
}

fn default_color() -> Vec3 {
    Vec3::splat(1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cone {
        #[serde(default = "default_capped")]
        capped: bool,
        #[serde(default = "default_subdivs")]
        subdivs: usize,
    },
    Cylinder {
        #[serde(default = "default_capped")]
        capped: bool,
        #[serde(default = "default_subdivs")]
        subdivs: usize,
    },
}

/// A primitive together with its color and pre-transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveDesc {
    #[serde(flatten)]
    pub shape: Primitive,
    #[serde(default = "default_color")]
    pub color: Vec3,
    #[serde(default)]
    pub placement: Placement,
}

impl PrimitiveDesc {
    pub fn new(shape: Primitive, color: Vec3, placement: Placement) -> Self {
        Self {
            shape,
            color,
            placement,
        }
    }

    /// Run the matching generator
    pub fn build(&self) -> Result<MeshData> {
        let pre_transform = self.placement.matrix();
        match self.shape {
            Primitive::Box {
                width,
                height,
                depth,
            } => make_box(width, height, depth, self.color, &pre_transform),
            Primitive::Cone { capped, subdivs } => {
                make_cone(capped, subdivs, self.color, &pre_transform)
            }
            Primitive::Cylinder { capped, subdivs } => {
                make_cylinder(capped, subdivs, self.color, &pre_transform)
            }
        }
    }
}

/// Generate every primitive and merge them into one draw batch.
///
/// Texture coordinates survive only when every primitive has them.
pub fn batch(primitives: &[PrimitiveDesc]) -> Result<MeshData> {
    let mut meshes = primitives
        .iter()
        .map(PrimitiveDesc::build)
        .collect::<Result<Vec<_>>>()?;

    if !meshes.iter().all(MeshData::has_tex_coords) {
        for mesh in &mut meshes {
            mesh.tex_coords.clear();
        }
    }

    let merged = meshes.iter().fold(MeshData::new(), |merged, mesh| concatenate(merged, mesh));
    debug!(
        "batched {} primitives into {} vertices",
        primitives.len(),
        merged.vertex_count()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_unit_ring() {
        let ring = unit_ring(4);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], (1.0, 0.0));
        assert_abs_diff_eq!(ring[1].0, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ring[1].1, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_parameter_checks() {
        assert!(check_dimension("width", 0.5).is_ok());
        assert!(check_dimension("width", 0.0).is_err());
        assert!(check_dimension("width", -1.0).is_err());
        assert!(check_dimension("width", f32::INFINITY).is_err());
        assert!(check_subdivs(3).is_ok());
        assert!(matches!(
            check_subdivs(2),
            Err(GeometryError::InvalidShape { parameter: "subdivs", .. })
        ));
    }

    #[test]
    fn test_placement_order() {
        let placement = Placement {
            scale: Vec3::new(2.0, 1.0, 1.0),
            translation: Vec3::new(1.0, 0.0, 0.0),
            rotation_degrees: Vec3::new(0.0, 0.0, 90.0),
        };
        // X rotates onto Y, moves by +X, then X doubles
        let p = placement.matrix().transform_point(Vec3::X);
        assert_abs_diff_eq!(p, Vec3::new(2.0, 1.0, 0.0), epsilon = 1e-5);
        assert_eq!(Placement::default().matrix(), Mat44::IDENTITY);
    }

    #[test]
    fn test_batch_counts_vertices() {
        let primitives = vec![
            PrimitiveDesc::new(
                Primitive::Cylinder {
                    capped: true,
                    subdivs: 8,
                },
                Vec3::new(1.0, 0.0, 0.0),
                Placement::default(),
            ),
            PrimitiveDesc::new(
                Primitive::Box {
                    width: 1.0,
                    height: 2.0,
                    depth: 3.0,
                },
                Vec3::new(0.0, 1.0, 0.0),
                Placement::default(),
            ),
        ];
        let mesh = batch(&primitives).unwrap();
        assert_eq!(mesh.vertex_count(), 12 * 8 + 36);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.colors[0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.colors[12 * 8], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_batch_texture_stream() {
        let cone = PrimitiveDesc::new(
            Primitive::Cone {
                capped: true,
                subdivs: 6,
            },
            Vec3::splat(1.0),
            Placement::default(),
        );
        let cones = batch(&[cone.clone(), cone.clone()]).unwrap();
        assert_eq!(cones.tex_coords.len(), 36);

        let cube = PrimitiveDesc::new(
            Primitive::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Vec3::splat(1.0),
            Placement::default(),
        );
        let mixed = batch(&[cone, cube]).unwrap();
        assert!(!mixed.has_tex_coords());
        assert!(mixed.validate().is_ok());
    }

    #[test]
    fn test_batch_propagates_generator_errors() {
        let primitives = vec![PrimitiveDesc::new(
            Primitive::Cone {
                capped: false,
                subdivs: 1,
            },
            Vec3::splat(1.0),
            Placement::default(),
        )];
        assert!(batch(&primitives).is_err());
        assert!(batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_primitive_desc_from_toml() {
        let desc: PrimitiveDesc = toml::from_str(
            r#"
            kind = "cone"
            subdivs = 12
            color = { x = 0.5, y = 0.25, z = 1.0 }

            [placement]
            translation = { x = 1.0, y = 2.0, z = 3.0 }
            "#,
        )
        .unwrap();

        assert_eq!(
            desc.shape,
            Primitive::Cone {
                capped: true,
                subdivs: 12
            }
        );
        assert_eq!(desc.color, Vec3::new(0.5, 0.25, 1.0));
        assert_eq!(desc.placement.scale, Vec3::splat(1.0));
        assert_eq!(desc.placement.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(desc.build().unwrap().vertex_count(), 36);
    }
}
