/// Fixed-size float vectors (2, 3 and 4 components)
use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops;

use crate::error::GeometryError;

macro_rules! vec_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $v) -> $v {
                $v { $( $e: ops::$trait::$func(self.$e, rhs.$e), )* }
            }
        }
    };
}

macro_rules! vec_assign_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            #[inline]
            fn $func(&mut self, rhs: $v) {
                $( ops::$trait::$func(&mut self.$e, rhs.$e); )*
            }
        }
    };
}

macro_rules! scalar_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<f32> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: f32) -> $v {
                $v { $( $e: ops::$trait::$func(self.$e, rhs), )* }
            }
        }
    };
}

macro_rules! vec_impl {
    ($v: ident, $n: expr, $($e: ident),*) => {
        #[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
        #[repr(C)]
        pub struct $v {
            $( pub $e: f32, )*
        }

        impl $v {
            pub const ZERO: $v = $v { $( $e: 0.0, )* };

            #[inline]
            pub const fn new($( $e: f32, )*) -> $v {
                $v { $( $e, )* }
            }

            #[inline]
            pub fn splat(value: f32) -> $v {
                $v { $( $e: value, )* }
            }

            #[inline]
            pub fn dot(self, rhs: $v) -> f32 {
                0.0 $( + self.$e * rhs.$e )*
            }

            #[inline]
            pub fn length_squared(self) -> f32 {
                self.dot(self)
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Unit-length copy of `self`; the zero vector maps to itself.
            #[inline]
            pub fn normalize(self) -> $v {
                let length = self.length();
                if length > 0.0 {
                    self * (1.0 / length)
                } else {
                    $v::ZERO
                }
            }

            /// Unit-length copy of `self`, failing on zero or non-finite length.
            pub fn try_normalize(self) -> Result<$v, GeometryError> {
                let length = self.length();
                if length > 0.0 && length.is_finite() {
                    Ok(self * (1.0 / length))
                } else {
                    Err(GeometryError::ZeroLengthVector)
                }
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                true $( && self.$e.is_finite() )*
            }

            #[inline]
            pub fn to_array(self) -> [f32; $n] {
                [$( self.$e, )*]
            }
        }

        impl From<[f32; $n]> for $v {
            fn from(a: [f32; $n]) -> $v {
                let [$( $e, )*] = a;
                $v { $( $e, )* }
            }
        }

        impl ops::Neg for $v {
            type Output = $v;

            #[inline]
            fn neg(self) -> $v {
                $v { $( $e: -self.$e, )* }
            }
        }

        impl ops::Mul<$v> for f32 {
            type Output = $v;

            #[inline]
            fn mul(self, rhs: $v) -> $v {
                $v { $( $e: self * rhs.$e, )* }
            }
        }

        impl AbsDiffEq for $v {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &$v, epsilon: f32) -> bool {
                true $( && self.$e.abs_diff_eq(&other.$e, epsilon) )*
            }
        }

        impl RelativeEq for $v {
            fn default_max_relative() -> f32 {
                f32::default_max_relative()
            }

            fn relative_eq(&self, other: &$v, epsilon: f32, max_relative: f32) -> bool {
                true $( && self.$e.relative_eq(&other.$e, epsilon, max_relative) )*
            }
        }

        vec_op_impl!(Add, add, $v, $($e),*);
        vec_op_impl!(Sub, sub, $v, $($e),*);
        vec_op_impl!(Mul, mul, $v, $($e),*);
        vec_assign_op_impl!(AddAssign, add_assign, $v, $($e),*);
        vec_assign_op_impl!(SubAssign, sub_assign, $v, $($e),*);
        scalar_op_impl!(Mul, mul, $v, $($e),*);
        scalar_op_impl!(Div, div, $v, $($e),*);
    };
}

vec_impl!(Vec2, 2, x, y);
vec_impl!(Vec3, 3, x, y, z);
vec_impl!(Vec4, 4, x, y, z, w);

impl Vec3 {
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    /// Right-handed cross product
    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Homogeneous extension with the given `w`
    #[inline]
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }
}

impl Vec4 {
    /// Drops `w` without dividing by it
    #[inline]
    pub fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Free-function form of [`Vec3::cross`]
#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

/// Free-function form of [`Vec3::dot`]
#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b)
}

/// Free-function form of [`Vec3::normalize`]
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    v.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cross_of_basis_vectors() {
        assert_eq!(cross(Vec3::X, Vec3::Y), Vec3::Z);
        assert_eq!(cross(Vec3::Y, Vec3::Z), Vec3::X);
        assert_eq!(cross(Vec3::Z, Vec3::X), Vec3::Y);
        assert_eq!(cross(Vec3::Y, Vec3::X), -Vec3::Z);
    }

    #[test]
    fn test_cross_is_orthogonal_to_inputs() {
        let a = Vec3::new(1.5, -2.0, 0.25);
        let b = Vec3::new(-0.5, 3.0, 4.0);
        let c = a.cross(b);
        assert_abs_diff_eq!(c.dot(a), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(c.dot(b), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_dot() {
        assert_eq!(dot(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, -5.0, 6.0)), 12.0);
        assert_eq!(Vec4::new(1.0, 2.0, 3.0, 4.0).dot(Vec4::splat(1.0)), 10.0);
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
    }

    #[test]
    fn test_normalize() {
        let n = normalize(Vec3::new(3.0, 0.0, 4.0));
        assert_abs_diff_eq!(n, Vec3::new(0.6, 0.0, 0.8), epsilon = 1e-6);
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector_stays_zero() {
        let n = Vec3::ZERO.normalize();
        assert_eq!(n, Vec3::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn test_try_normalize_rejects_zero_vector() {
        assert!(matches!(
            Vec3::ZERO.try_normalize(),
            Err(GeometryError::ZeroLengthVector)
        ));
        assert!(matches!(
            Vec3::new(f32::NAN, 0.0, 0.0).try_normalize(),
            Err(GeometryError::ZeroLengthVector)
        ));
        assert!(Vec3::new(0.0, 2.0, 0.0).try_normalize().is_ok());
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, 0.5, 0.5);
        assert_eq!(a + b, Vec3::new(1.5, 2.5, 3.5));
        assert_eq!(a - b, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(a * 2.0, 2.0 * a);
        assert_eq!(a / 2.0, Vec3::new(0.5, 1.0, 1.5));
        a += b;
        a -= b * 2.0;
        assert_eq!(a, Vec3::new(0.5, 1.5, 2.5));
    }

    #[test]
    fn test_extend_and_truncate() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.extend(1.0), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(v.extend(0.0).truncate(), v);
        assert_eq!(Vec4::from([1.0, 2.0, 3.0, 4.0]).to_array(), [1.0, 2.0, 3.0, 4.0]);
    }
}
