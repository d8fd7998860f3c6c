/// Errors raised by the math library and the shape generators
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A generator received a parameter outside its valid range
    #[error("invalid shape parameter `{parameter}` = {value}: {reason}")]
    InvalidShape {
        parameter: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// The matrix has no inverse (determinant is zero or not finite)
    #[error("singular matrix (determinant {determinant})")]
    SingularMatrix { determinant: f32 },

    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,

    #[error("invalid perspective projection: {0}")]
    InvalidProjection(String),

    /// Per-vertex streams of a mesh disagree in length
    #[error("malformed mesh: {0}")]
    MalformedMesh(String),
}

pub type Result<T> = std::result::Result<T, GeometryError>;
