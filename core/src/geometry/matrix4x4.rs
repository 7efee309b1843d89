//! 4x4 Matrix

use crate::pbrt::{abs, Float};
use std::ops::{Index, Mul};

/// A row-major 4x4 matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4x4 {
    /// Rows of the matrix.
    pub m: [[Float; 4]; 4],
}

impl Matrix4x4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a matrix from its rows.
    ///
    /// * `m` - Rows of the matrix.
    pub fn new(m: [[Float; 4]; 4]) -> Self {
        Self { m }
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.m[j][i];
            }
        }
        Self { m }
    }

    /// Returns the inverse using Gauss-Jordan elimination with full
    /// pivoting, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let mut indxc = [0_usize; 4];
        let mut indxr = [0_usize; 4];
        let mut ipiv = [0_u8; 4];
        let mut minv = self.m;

        for i in 0..4 {
            let mut irow = 0;
            let mut icol = 0;
            let mut big: Float = 0.0;

            // Choose pivot.
            for j in 0..4 {
                if ipiv[j] == 1 {
                    continue;
                }
                for k in 0..4 {
                    match ipiv[k] {
                        0 => {
                            let a = abs(minv[j][k]);
                            if a >= big {
                                big = a;
                                irow = j;
                                icol = k;
                            }
                        }
                        1 => {}
                        _ => return None,
                    }
                }
            }

            ipiv[icol] += 1;

            // Move the pivot onto the diagonal.
            if irow != icol {
                minv.swap(irow, icol);
            }

            indxr[i] = irow;
            indxc[i] = icol;
            if minv[icol][icol] == 0.0 {
                return None;
            }

            let pivinv = 1.0 / minv[icol][icol];
            minv[icol][icol] = 1.0;
            for v in minv[icol].iter_mut() {
                *v *= pivinv;
            }

            // Zero out the pivot column in the other rows.
            let pivot_row = minv[icol];
            for (j, row) in minv.iter_mut().enumerate() {
                if j != icol {
                    let save = row[icol];
                    row[icol] = 0.0;
                    for k in 0..4 {
                        row[k] -= pivot_row[k] * save;
                    }
                }
            }
        }

        // Undo the column permutation.
        for j in (0..4).rev() {
            if indxr[j] != indxc[j] {
                for row in minv.iter_mut() {
                    row.swap(indxr[j], indxc[j]);
                }
            }
        }

        Some(Self { m: minv })
    }
}

impl Default for Matrix4x4 {
    /// Returns the identity matrix.
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4x4 {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j]
                    + self.m[i][3] * other.m[3][j];
            }
        }
        Self { m }
    }
}

impl Index<usize> for Matrix4x4 {
    type Output = [Float; 4];

    /// Returns a row.
    ///
    /// * `row` - Row index.
    fn index(&self, row: usize) -> &Self::Output {
        &self.m[row]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
