/// 4x4 float matrix stored in row-major order
///
/// `m[(i, j)]` addresses row `i`, column `j`. Vectors are treated as
/// columns, so `a * b` applies `b` first. Consumers that expect
/// column-major storage convert at their boundary with [`Mat44::to_column_major`].
use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use std::ops::{Index, IndexMut, Mul};

use crate::error::{GeometryError, Result};
use crate::vector::{Vec3, Vec4};

/// [`Mat44::invert`] treats a matrix as singular when `|det|` is at most this
/// fraction of the product of its row lengths (the largest `|det|` those
/// rows could span)
pub const SINGULAR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Mat44 {
    pub v: [f32; 16],
}

impl Mat44 {
    pub const IDENTITY: Mat44 = Mat44 {
        v: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const ZERO: Mat44 = Mat44 { v: [0.0; 16] };

    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let mut m = Self::ZERO;
        for (i, row) in rows.iter().enumerate() {
            m.v[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        m
    }

    pub fn row(&self, i: usize) -> Vec4 {
        Vec4::new(self[(i, 0)], self[(i, 1)], self[(i, 2)], self[(i, 3)])
    }

    pub fn column(&self, j: usize) -> Vec4 {
        Vec4::new(self[(0, j)], self[(1, j)], self[(2, j)], self[(3, j)])
    }

    pub fn transpose(&self) -> Mat44 {
        let mut result = Mat44::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result[(j, i)] = self[(i, j)];
            }
        }
        result
    }

    /// Determinant via 2x2 sub-determinants of the top and bottom row pairs
    pub fn determinant(&self) -> f32 {
        let (s, c) = self.sub_determinants();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Inverse such that `m.invert()? * m` is the identity within rounding.
    ///
    /// Fails with [`GeometryError::SingularMatrix`] when the determinant is
    /// not finite or is negligible next to the row lengths. The test is
    /// relative, so a uniformly tiny but well-conditioned matrix inverts.
    pub fn invert(&self) -> Result<Mat44> {
        let a = |i: usize, j: usize| self[(i, j)];
        let (s, c) = self.sub_determinants();

        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0];
        let negligible = det.abs() <= SINGULAR_EPSILON * self.row_length_product();
        if !det.is_finite() || det == 0.0 || negligible {
            return Err(GeometryError::SingularMatrix { determinant: det });
        }
        let inv_det = 1.0 / det;

        let adjugate = [
            [
                a(1, 1) * c[5] - a(1, 2) * c[4] + a(1, 3) * c[3],
                -a(0, 1) * c[5] + a(0, 2) * c[4] - a(0, 3) * c[3],
                a(3, 1) * s[5] - a(3, 2) * s[4] + a(3, 3) * s[3],
                -a(2, 1) * s[5] + a(2, 2) * s[4] - a(2, 3) * s[3],
            ],
            [
                -a(1, 0) * c[5] + a(1, 2) * c[2] - a(1, 3) * c[1],
                a(0, 0) * c[5] - a(0, 2) * c[2] + a(0, 3) * c[1],
                -a(3, 0) * s[5] + a(3, 2) * s[2] - a(3, 3) * s[1],
                a(2, 0) * s[5] - a(2, 2) * s[2] + a(2, 3) * s[1],
            ],
            [
                a(1, 0) * c[4] - a(1, 1) * c[2] + a(1, 3) * c[0],
                -a(0, 0) * c[4] + a(0, 1) * c[2] - a(0, 3) * c[0],
                a(3, 0) * s[4] - a(3, 1) * s[2] + a(3, 3) * s[0],
                -a(2, 0) * s[4] + a(2, 1) * s[2] - a(2, 3) * s[0],
            ],
            [
                -a(1, 0) * c[3] + a(1, 1) * c[1] - a(1, 2) * c[0],
                a(0, 0) * c[3] - a(0, 1) * c[1] + a(0, 2) * c[0],
                -a(3, 0) * s[3] + a(3, 1) * s[1] - a(3, 2) * s[0],
                a(2, 0) * s[3] - a(2, 1) * s[1] + a(2, 2) * s[0],
            ],
        ];

        let mut result = Mat44::from_rows(adjugate);
        for e in result.v.iter_mut() {
            *e *= inv_det;
        }
        if !result.v.iter().all(|e| e.is_finite()) {
            return Err(GeometryError::SingularMatrix { determinant: det });
        }
        Ok(result)
    }

    // Hadamard bound on |det|
    fn row_length_product(&self) -> f32 {
        self.v
            .chunks_exact(4)
            .map(|row| row.iter().map(|e| e * e).sum::<f32>().sqrt())
            .product()
    }

    // s: rows 0/1, c: rows 2/3
    fn sub_determinants(&self) -> ([f32; 6], [f32; 6]) {
        let a = |i: usize, j: usize| self[(i, j)];
        let s = [
            a(0, 0) * a(1, 1) - a(1, 0) * a(0, 1),
            a(0, 0) * a(1, 2) - a(1, 0) * a(0, 2),
            a(0, 0) * a(1, 3) - a(1, 0) * a(0, 3),
            a(0, 1) * a(1, 2) - a(1, 1) * a(0, 2),
            a(0, 1) * a(1, 3) - a(1, 1) * a(0, 3),
            a(0, 2) * a(1, 3) - a(1, 2) * a(0, 3),
        ];
        let c = [
            a(2, 0) * a(3, 1) - a(3, 0) * a(2, 1),
            a(2, 0) * a(3, 2) - a(3, 0) * a(2, 2),
            a(2, 0) * a(3, 3) - a(3, 0) * a(2, 3),
            a(2, 1) * a(3, 2) - a(3, 1) * a(2, 2),
            a(2, 1) * a(3, 3) - a(3, 1) * a(2, 3),
            a(2, 2) * a(3, 3) - a(3, 2) * a(2, 3),
        ];
        (s, c)
    }

    /// Applies the matrix to a point (w = 1), without perspective division
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * p.extend(1.0)).truncate()
    }

    /// Applies the matrix to a direction (w = 0)
    #[inline]
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        (*self * d.extend(0.0)).truncate()
    }

    /// Elements in column-major order, for upload interfaces that expect it
    pub fn to_column_major(&self) -> [f32; 16] {
        self.transpose().v
    }
}

impl Default for Mat44 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<(usize, usize)> for Mat44 {
    type Output = f32;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        assert!(i < 4 && j < 4, "matrix index ({i}, {j}) out of range");
        &self.v[i * 4 + j]
    }
}

impl IndexMut<(usize, usize)> for Mat44 {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        assert!(i < 4 && j < 4, "matrix index ({i}, {j}) out of range");
        &mut self.v[i * 4 + j]
    }
}

impl Mul<Mat44> for Mat44 {
    type Output = Mat44;

    fn mul(self, rhs: Mat44) -> Mat44 {
        let mut result = Mat44::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result[(i, j)] = (0..4).map(|k| self[(i, k)] * rhs[(k, j)]).sum::<f32>();
            }
        }
        result
    }
}

impl Mul<Vec4> for Mat44 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(rhs),
            self.row(1).dot(rhs),
            self.row(2).dot(rhs),
            self.row(3).dot(rhs),
        )
    }
}

impl AbsDiffEq for Mat44 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Mat44, epsilon: f32) -> bool {
        self.v.iter().zip(other.v.iter()).all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat44 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Mat44, epsilon: f32, max_relative: f32) -> bool {
        self.v
            .iter()
            .zip(other.v.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

/// Free-function form of [`Mat44::transpose`]
pub fn transpose(m: &Mat44) -> Mat44 {
    m.transpose()
}

/// Free-function form of [`Mat44::invert`]
pub fn invert(m: &Mat44) -> Result<Mat44> {
    m.invert()
}
