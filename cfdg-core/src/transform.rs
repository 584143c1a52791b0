//! C4 (geometric half): the 2x3 affine matrix algebra.

/// `[a b; c d]` linear part plus `(tx, ty)` translation, applied to a
/// column vector as `[a c tx; b d ty] * [x y 1]^T` (i.e. `x' = a*x + c*y
/// + tx`, `y' = b*x + d*y + ty`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    #[must_use]
    pub fn translate(x: f64, y: f64) -> Affine {
        Affine { tx: x, ty: y, ..Affine::IDENTITY }
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Affine {
        Affine { a: sx, d: sy, ..Affine::IDENTITY }
    }

    #[must_use]
    pub fn rotate_radians(theta: f64) -> Affine {
        let (s, c) = theta.sin_cos();
        Affine { a: c, b: s, c: -s, d: c, tx: 0.0, ty: 0.0 }
    }

    #[must_use]
    pub fn rotate_degrees(deg: f64) -> Affine {
        Affine::rotate_radians(deg.to_radians())
    }

    /// Shear by `tan` of each angle, in degrees.
    #[must_use]
    pub fn skew_degrees(rx: f64, ry: f64) -> Affine {
        Affine { a: 1.0, b: ry.to_radians().tan(), c: rx.to_radians().tan(), d: 1.0, tx: 0.0, ty: 0.0 }
    }

    /// Reflection about the line through the origin at angle `theta`
    /// (degrees).
    #[must_use]
    pub fn reflect_degrees(theta: f64) -> Affine {
        let rad = 2.0 * theta.to_radians();
        let (s, c) = rad.sin_cos();
        Affine { a: c, b: s, c: s, d: -c, tx: 0.0, ty: 0.0 }
    }

    /// `self` followed by `other`: applying the result to a point is the
    /// same as applying `self` first, then `other` to what comes out.
    /// Callers accumulating a chain of transforms must put whichever one
    /// should apply *first* on the left: `first.compose(&second)`, not
    /// the reverse (spec.md §4.3, §4.4).
    #[must_use]
    pub fn compose(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.tx * other.a + self.ty * other.c + other.tx,
            ty: self.tx * other.b + self.ty * other.d + other.ty,
        }
    }

    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.tx, self.b * x + self.d * y + self.ty)
    }

    /// `max(|sx|, |sy|)` of the linear part, used by the size-gate check
    /// (spec.md §4.5). `sx`/`sy` are the lengths of the transformed unit
    /// basis vectors, not `self.a`/`self.d` directly (which are wrong
    /// under rotation/skew).
    #[must_use]
    pub fn approx_scale(&self) -> (f64, f64) {
        let sx = (self.a * self.a + self.b * self.b).sqrt();
        let sy = (self.c * self.c + self.d * self.d).sqrt();
        (sx, sy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_composes_to_identity() {
        let m = Affine::IDENTITY.compose(&Affine::IDENTITY);
        assert_eq!(m, Affine::IDENTITY);
    }

    #[test]
    fn translate_then_scale_order_matters() {
        let t = Affine::translate(1.0, 0.0);
        let s = Affine::scale(2.0, 2.0);
        // apply t first, then s: (0,0) -> (1,0) -> (2,0)
        let composed = t.compose(&s);
        assert_eq!(composed.apply(0.0, 0.0), (2.0, 0.0));
    }

    #[test]
    fn rotate_90_degrees_maps_x_axis_to_y_axis() {
        let r = Affine::rotate_degrees(90.0);
        let (x, y) = r.apply(1.0, 0.0);
        assert!((x - 0.0).abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn approx_scale_matches_plain_scale() {
        let s = Affine::scale(2.0, 3.0);
        assert_eq!(s.approx_scale(), (2.0, 3.0));
    }
}
