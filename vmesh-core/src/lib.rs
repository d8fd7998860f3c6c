/// vmesh core - fixed-size transform math and procedural primitive meshes
///
/// This library is stateless: vectors and a row-major 4x4 matrix with
/// transform constructors, a perspective camera, and generators that emit
/// non-indexed triangle meshes ready for batching and upload.

pub mod error;
pub mod matrix;
pub mod mesh;
pub mod projection;
pub mod shapes;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use error::GeometryError;
pub use matrix::Mat44;
pub use mesh::{concatenate, MeshData};
pub use projection::{perspective, Camera};
pub use shapes::{batch, make_box, make_cone, make_cylinder, Placement, Primitive, PrimitiveDesc};
pub use transform::{RotationState, Transform};
pub use vector::{Vec2, Vec3, Vec4};
