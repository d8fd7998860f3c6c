/// Scene configuration loaded from TOML
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vmesh_core::{batch, Camera, GeometryError, MeshData, Placement, Primitive, PrimitiveDesc, Vec3};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Orbit camera settings, angles in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub radius: f32,
    pub near: f32,
    pub far: f32,
    pub phi_degrees: f32,
    pub theta_degrees: f32,
    /// Keep the model turning when no key is pressed
    pub spin: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            radius: 3.0,
            near: 0.1,
            far: 100.0,
            phi_degrees: 0.0,
            theta_degrees: 0.0,
            spin: true,
        }
    }
}

impl CameraConfig {
    /// Build a camera for a `width` x `height` viewport
    pub fn camera(&self, width: u32, height: u32) -> Camera {
        let mut camera = Camera::new(width, height);
        camera.fov = self.fov_degrees.to_radians();
        camera.near = self.near;
        camera.far = self.far;
        camera.radius = 0.0;
        camera.zoom(self.radius);
        camera.orbit(self.phi_degrees.to_radians(), self.theta_degrees.to_radians());
        camera
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub primitives: Vec<PrimitiveDesc>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            primitives: spaceship(),
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!(
            "loaded {} primitives from {}",
            config.primitives.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Generate and batch every primitive in the scene
    pub fn build_mesh(&self) -> Result<MeshData, GeometryError> {
        batch(&self.primitives)
    }
}

/// Body, nose, exhaust, four fins and two side pods
fn spaceship() -> Vec<PrimitiveDesc> {
    const HULL: Vec3 = Vec3::new(0.75, 0.78, 0.85);
    const NOSE: Vec3 = Vec3::new(0.9, 0.25, 0.2);
    const EXHAUST: Vec3 = Vec3::new(1.0, 0.6, 0.1);
    const FIN: Vec3 = Vec3::new(0.3, 0.45, 0.9);

    let cylinder = Primitive::Cylinder {
        capped: true,
        subdivs: 16,
    };
    let cone = Primitive::Cone {
        capped: true,
        subdivs: 16,
    };
    let fin = Primitive::Box {
        width: 4.0,
        height: 2.0,
        depth: 2.0,
    };
    let cone_placement = |translation: Vec3| Placement {
        scale: Vec3::new(0.6, 0.2, 0.2),
        translation,
        rotation_degrees: Vec3::new(0.0, 0.0, 270.0),
    };
    let small = |translation: Vec3| Placement {
        scale: Vec3::splat(0.03),
        translation,
        rotation_degrees: Vec3::ZERO,
    };

    let mut primitives = vec![
        PrimitiveDesc::new(
            cylinder.clone(),
            HULL,
            Placement {
                scale: Vec3::new(0.55, 0.2, 0.2),
                ..Placement::default()
            },
        ),
        PrimitiveDesc::new(cone.clone(), NOSE, cone_placement(Vec3::new(1.115, 0.0, 0.0))),
        PrimitiveDesc::new(cylinder, EXHAUST, small(Vec3::new(-1.0, 0.0, 0.0))),
    ];
    for translation in [
        Vec3::new(-4.0, -6.0, -1.0),
        Vec3::new(-4.0, 4.0, -1.0),
        Vec3::new(-4.0, -1.0, 4.0),
        Vec3::new(-4.0, -1.0, -6.0),
    ] {
        primitives.push(PrimitiveDesc::new(fin.clone(), FIN, small(translation)));
    }
    for y in [0.7, -0.7] {
        primitives.push(PrimitiveDesc::new(
            cone.clone(),
            NOSE,
            cone_placement(Vec3::new(0.2, y, 0.0)),
        ));
    }
    primitives
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_scene_is_spaceship() {
        let config = SceneConfig::default();
        assert_eq!(config.primitives.len(), 9);

        let mesh = config.build_mesh().unwrap();
        // 2 capped cylinders, 3 cones and 4 boxes
        assert_eq!(mesh.vertex_count(), 2 * 192 + 3 * 48 + 4 * 36);
        assert!(mesh.validate().is_ok());
        assert!(!mesh.has_tex_coords());
    }

    #[test]
    fn test_nose_points_along_x() {
        let nose = &SceneConfig::default().primitives[1];
        let mesh = nose.build().unwrap();
        // Apex (0, 0.2, 0) turns onto +X, moves by 1.115 and is scaled by 0.6
        assert_abs_diff_eq!(
            mesh.positions[0],
            Vec3::new(0.6 * 1.315, 0.0, 0.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_parse_scene() {
        let config = SceneConfig::from_toml_str(
            r#"
            [camera]
            fov_degrees = 45.0
            radius = 5.0
            spin = false

            [[primitives]]
            kind = "box"
            width = 1.0
            height = 1.0
            depth = 1.0
            color = { x = 1.0, y = 0.0, z = 0.0 }

            [[primitives]]
            kind = "cylinder"
            capped = false
            subdivs = 8
            [primitives.placement]
            scale = { x = 2.0, y = 1.0, z = 1.0 }
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.fov_degrees, 45.0);
        assert_eq!(config.camera.near, 0.1);
        assert!(!config.camera.spin);
        assert_eq!(config.primitives.len(), 2);
        assert_eq!(config.primitives[1].placement.scale, Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(config.build_mesh().unwrap().vertex_count(), 36 + 48);
    }

    #[test]
    fn test_empty_scene_uses_defaults() {
        let config = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = SceneConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(SceneConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            SceneConfig::from_toml_str("[camera]\nradius = \"far\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SceneConfig::from_toml_str("[[primitives]]\nkind = \"sphere\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SceneConfig::load_from_file("/nonexistent/vmesh/scene.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_camera_from_config() {
        let config = CameraConfig {
            radius: 0.01,
            theta_degrees: 120.0,
            ..CameraConfig::default()
        };
        let camera = config.camera(80, 40);
        assert_abs_diff_eq!(camera.radius, 0.1);
        assert_abs_diff_eq!(camera.theta, std::f32::consts::FRAC_PI_2);
        assert_abs_diff_eq!(camera.aspect, 2.0);
        assert_abs_diff_eq!(camera.fov, 60.0_f32.to_radians());
    }
}
