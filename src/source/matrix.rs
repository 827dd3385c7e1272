//! Affine transforms shared by the content walker, the raster and image
//! placement.

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    pub fn identity() -> Self {
        Self::from_array([1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self::from_array([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    pub fn scale(s: f32) -> Self {
        Self::from_array([s, 0.0, 0.0, s, 0.0, 0.0])
    }

    pub fn from_array(m: [f32; 6]) -> Self {
        Self {
            a: m[0],
            b: m[1],
            c: m[2],
            d: m[3],
            e: m[4],
            f: m[5],
        }
    }

    pub fn to_array(self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    pub fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    /// Bounding box `(x0, y0, x1, y1)` of the unit square under this
    /// transform, in bottom-up page space.
    pub fn unit_square_bounds(&self) -> (f32, f32, f32, f32) {
        let corners = [
            (self.e, self.f),
            (self.a + self.e, self.b + self.f),
            (self.c + self.e, self.d + self.f),
            (self.a + self.c + self.e, self.b + self.d + self.f),
        ];
        corners.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_multiply_order() {
        // Scale by 2 then translate by (10, 20).
        let m = Matrix::scale(2.0).multiply(&Matrix::translate(10.0, 20.0));
        assert_eq!(m.to_array(), [2.0, 0.0, 0.0, 2.0, 10.0, 20.0]);

        // Translate then scale moves the origin too.
        let m = Matrix::translate(10.0, 20.0).multiply(&Matrix::scale(2.0));
        assert_eq!(m.to_array(), [2.0, 0.0, 0.0, 2.0, 20.0, 40.0]);
    }

    #[test]
    fn test_unit_square_bounds() {
        let m = Matrix::from_array([100.0, 0.0, 0.0, 50.0, 72.0, 600.0]);
        assert_eq!(m.unit_square_bounds(), (72.0, 600.0, 172.0, 650.0));

        // Vertically flipped placement.
        let m = Matrix::from_array([100.0, 0.0, 0.0, -50.0, 72.0, 650.0]);
        assert_eq!(m.unit_square_bounds(), (72.0, 600.0, 172.0, 650.0));
    }
}
