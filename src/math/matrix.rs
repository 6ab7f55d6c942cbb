use crate::math::{Quaternion, Vector3};
use nalgebra as na;
use std::fmt;
use std::ops::{AddAssign, Mul, MulAssign};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A 3x3 row-major matrix, used as an inertia tensor or rotation matrix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix3 {
    pub data: [[f32; 3]; 3],
}

/// A 3x4 homogeneous transform matrix holding a rotation and a translation.
/// The implicit fourth row is (0, 0, 0, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix4 {
    pub data: [[f32; 4]; 3],
}

// === Matrix3 Implementation ===

impl Matrix3 {
    /// Creates a new 3x3 matrix from a 2D array
    #[inline]
    pub fn new(data: [[f32; 3]; 3]) -> Self {
        Self { data }
    }

    /// Creates a new 3x3 identity matrix
    #[inline]
    pub fn identity() -> Self {
        Self {
            data: [
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a new 3x3 zero matrix
    #[inline]
    pub fn zero() -> Self {
        Self {
            data: [
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
            ],
        }
    }

    /// Creates a new 3x3 diagonal matrix
    #[inline]
    pub fn from_diagonal(diagonal: Vector3) -> Self {
        Self {
            data: [
                [diagonal.x, 0.0, 0.0],
                [0.0, diagonal.y, 0.0],
                [0.0, 0.0, diagonal.z],
            ],
        }
    }

    /// Creates a matrix from three vectors arranged as its columns
    pub fn from_components(one: Vector3, two: Vector3, three: Vector3) -> Self {
        Self {
            data: [
                [one.x, two.x, three.x],
                [one.y, two.y, three.y],
                [one.z, two.z, three.z],
            ],
        }
    }

    /// Creates the rotation matrix corresponding to the given quaternion
    pub fn from_orientation(q: &Quaternion) -> Self {
        q.to_rotation_matrix()
    }

    /// Creates the skew-symmetric matrix of the given vector, so that
    /// multiplying by it is equivalent to a cross product with the vector
    pub fn skew_symmetric(vector: Vector3) -> Self {
        Self {
            data: [
                [0.0, -vector.z, vector.y],
                [vector.z, 0.0, -vector.x],
                [-vector.y, vector.x, 0.0],
            ],
        }
    }

    /// Returns the determinant of the matrix
    pub fn determinant(&self) -> f32 {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.data;

        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    }

    /// Returns the inverse of the matrix via the adjugate, or None when the
    /// determinant is exactly zero. Callers are expected to keep their prior
    /// contents for degenerate matrices.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();

        if det == 0.0 {
            return None;
        }

        let [[a, b, c], [d, e, f], [g, h, i]] = self.data;
        let inv_det = 1.0 / det;

        Some(Self {
            data: [
                [
                    (e * i - f * h) * inv_det,
                    (c * h - b * i) * inv_det,
                    (b * f - c * e) * inv_det,
                ],
                [
                    (f * g - d * i) * inv_det,
                    (a * i - c * g) * inv_det,
                    (c * d - a * f) * inv_det,
                ],
                [
                    (d * h - e * g) * inv_det,
                    (b * g - a * h) * inv_det,
                    (a * e - b * d) * inv_det,
                ],
            ],
        })
    }

    /// Returns the transpose of the matrix
    pub fn transpose(&self) -> Self {
        let mut result = Self::zero();
        for i in 0..3 {
            for j in 0..3 {
                result.data[i][j] = self.data[j][i];
            }
        }
        result
    }

    /// Multiplies this matrix by another matrix
    pub fn multiply_matrix(&self, other: &Self) -> Self {
        let mut result = Self::zero();
        for i in 0..3 {
            for j in 0..3 {
                for (k, other_row) in other.data.iter().enumerate() {
                    result.data[i][j] += self.data[i][k] * other_row[j];
                }
            }
        }
        result
    }

    /// Transforms the given vector by this matrix
    #[inline]
    pub fn multiply_vector(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.data[0][0] * v.x + self.data[0][1] * v.y + self.data[0][2] * v.z,
            self.data[1][0] * v.x + self.data[1][1] * v.y + self.data[1][2] * v.z,
            self.data[2][0] * v.x + self.data[2][1] * v.y + self.data[2][2] * v.z,
        )
    }

    /// Transforms the given vector by this matrix
    #[inline]
    pub fn transform(&self, v: Vector3) -> Vector3 {
        self.multiply_vector(v)
    }

    /// Transforms the given vector by the transpose of this matrix
    #[inline]
    pub fn transform_transpose(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.data[0][0] * v.x + self.data[1][0] * v.y + self.data[2][0] * v.z,
            self.data[0][1] * v.x + self.data[1][1] * v.y + self.data[2][1] * v.z,
            self.data[0][2] * v.x + self.data[1][2] * v.y + self.data[2][2] * v.z,
        )
    }

    /// Convert to nalgebra Matrix3
    pub fn to_nalgebra(&self) -> na::Matrix3<f32> {
        na::Matrix3::new(
            self.data[0][0], self.data[0][1], self.data[0][2],
            self.data[1][0], self.data[1][1], self.data[1][2],
            self.data[2][0], self.data[2][1], self.data[2][2],
        )
    }

    /// Convert from nalgebra Matrix3
    pub fn from_nalgebra(m: &na::Matrix3<f32>) -> Self {
        Self {
            data: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
        }
    }
}

impl Mul for Matrix3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply_matrix(&rhs)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: Vector3) -> Self::Output {
        self.multiply_vector(rhs)
    }
}

impl MulAssign<f32> for Matrix3 {
    fn mul_assign(&mut self, rhs: f32) {
        for row in &mut self.data {
            for value in row {
                *value *= rhs;
            }
        }
    }
}

impl AddAssign for Matrix3 {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..3 {
            for j in 0..3 {
                self.data[i][j] += rhs.data[i][j];
            }
        }
    }
}

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.data {
            writeln!(f, "[{}, {}, {}]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

// === Matrix4 Implementation ===

impl Matrix4 {
    /// Creates a new 3x4 matrix from a 2D array
    #[inline]
    pub fn new(data: [[f32; 4]; 3]) -> Self {
        Self { data }
    }

    /// Creates a new identity transform
    #[inline]
    pub fn identity() -> Self {
        Self {
            data: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    /// Creates a transform from an orientation quaternion and a position
    pub fn from_orientation_and_pos(q: &Quaternion, pos: Vector3) -> Self {
        Self {
            data: [
                [
                    1.0 - 2.0 * (q.y * q.y + q.z * q.z),
                    2.0 * (q.x * q.y - q.w * q.z),
                    2.0 * (q.x * q.z + q.w * q.y),
                    pos.x,
                ],
                [
                    2.0 * (q.x * q.y + q.w * q.z),
                    1.0 - 2.0 * (q.x * q.x + q.z * q.z),
                    2.0 * (q.y * q.z - q.w * q.x),
                    pos.y,
                ],
                [
                    2.0 * (q.x * q.z - q.w * q.y),
                    2.0 * (q.y * q.z + q.w * q.x),
                    1.0 - 2.0 * (q.x * q.x + q.y * q.y),
                    pos.z,
                ],
            ],
        }
    }

    /// Returns the determinant of the transform (the rotation block; the
    /// implicit homogeneous row contributes a factor of one)
    pub fn determinant(&self) -> f32 {
        let m = &self.data;

        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns the inverse transform, or None when the determinant is
    /// exactly zero. Callers keep their prior contents for degenerate
    /// matrices.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }
        let inv_det = 1.0 / det;
        let m = &self.data;

        let mut result = Self::identity();

        // Inverse of the rotation block via the adjugate.
        result.data[0][0] = (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det;
        result.data[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det;
        result.data[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det;
        result.data[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det;
        result.data[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det;
        result.data[1][2] = (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det;
        result.data[2][0] = (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det;
        result.data[2][1] = (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det;
        result.data[2][2] = (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det;

        // Translation of the inverse is -R^-1 * t.
        let t = self.translation();
        let inv_t = Vector3::new(
            result.data[0][0] * t.x + result.data[0][1] * t.y + result.data[0][2] * t.z,
            result.data[1][0] * t.x + result.data[1][1] * t.y + result.data[1][2] * t.z,
            result.data[2][0] * t.x + result.data[2][1] * t.y + result.data[2][2] * t.z,
        );
        result.data[0][3] = -inv_t.x;
        result.data[1][3] = -inv_t.y;
        result.data[2][3] = -inv_t.z;

        Some(result)
    }

    /// Transforms the given point by this matrix
    #[inline]
    pub fn transform(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            v.x * self.data[0][0] + v.y * self.data[0][1] + v.z * self.data[0][2] + self.data[0][3],
            v.x * self.data[1][0] + v.y * self.data[1][1] + v.z * self.data[1][2] + self.data[1][3],
            v.x * self.data[2][0] + v.y * self.data[2][1] + v.z * self.data[2][2] + self.data[2][3],
        )
    }

    /// Transforms the given point by the transformational inverse of this
    /// matrix. Valid only while the rotation block is a pure rotation.
    pub fn transform_inverse(&self, v: Vector3) -> Vector3 {
        let tmp = Vector3::new(
            v.x - self.data[0][3],
            v.y - self.data[1][3],
            v.z - self.data[2][3],
        );
        Vector3::new(
            tmp.x * self.data[0][0] + tmp.y * self.data[1][0] + tmp.z * self.data[2][0],
            tmp.x * self.data[0][1] + tmp.y * self.data[1][1] + tmp.z * self.data[2][1],
            tmp.x * self.data[0][2] + tmp.y * self.data[1][2] + tmp.z * self.data[2][2],
        )
    }

    /// Transforms the given direction vector by this matrix, ignoring
    /// translation
    #[inline]
    pub fn transform_direction(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            v.x * self.data[0][0] + v.y * self.data[0][1] + v.z * self.data[0][2],
            v.x * self.data[1][0] + v.y * self.data[1][1] + v.z * self.data[1][2],
            v.x * self.data[2][0] + v.y * self.data[2][1] + v.z * self.data[2][2],
        )
    }

    /// Transforms the given direction vector by the transformational inverse
    /// of this matrix
    #[inline]
    pub fn transform_inverse_direction(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            v.x * self.data[0][0] + v.y * self.data[1][0] + v.z * self.data[2][0],
            v.x * self.data[0][1] + v.y * self.data[1][1] + v.z * self.data[2][1],
            v.x * self.data[0][2] + v.y * self.data[1][2] + v.z * self.data[2][2],
        )
    }

    /// Returns one of the axis vectors (columns) of the matrix; column 3 is
    /// the translation
    #[inline]
    pub fn axis_vector(&self, i: usize) -> Vector3 {
        Vector3::new(self.data[0][i], self.data[1][i], self.data[2][i])
    }

    /// Returns the translation component of the transform
    #[inline]
    pub fn translation(&self) -> Vector3 {
        self.axis_vector(3)
    }

    /// Returns the rotation block as a 3x3 matrix
    pub fn to_matrix3(&self) -> Matrix3 {
        let mut result = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                result.data[i][j] = self.data[i][j];
            }
        }
        result
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    /// Composes two transforms; the result applies `rhs` first, then `self`
    fn mul(self, rhs: Self) -> Self::Output {
        let mut result = Self::identity();
        for i in 0..3 {
            for j in 0..4 {
                let mut sum = 0.0;
                for (k, rhs_row) in rhs.data.iter().enumerate() {
                    sum += self.data[i][k] * rhs_row[j];
                }
                if j == 3 {
                    sum += self.data[i][3];
                }
                result.data[i][j] = sum;
            }
        }
        result
    }
}

impl Mul<Vector3> for Matrix4 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: Vector3) -> Self::Output {
        self.transform(rhs)
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.data {
            writeln!(f, "[{}, {}, {}, {}]", row[0], row[1], row[2], row[3])?;
        }
        Ok(())
    }
}
