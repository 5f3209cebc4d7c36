use std::ops::{Add, AddAssign, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    /// Component-wise product.
    pub fn mul_elem(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x * other.x, self.y * other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };
    /// Offered on an axis that should wrap to its content.
    pub const UNBOUNDED: Size = Size {
        width: f32::INFINITY,
        height: f32::INFINITY,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn scaled(self, factor: f32) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

/// Per-edge lengths used for margin, padding and extend-outside.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn left_top(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn scaled(self, factor: f32) -> Insets {
        Insets::new(
            self.left * factor,
            self.top * factor,
            self.right * factor,
            self.bottom * factor,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }
}

impl Add for Insets {
    type Output = Insets;
    fn add(self, rhs: Insets) -> Insets {
        Insets::new(
            self.left + rhs.left,
            self.top + rhs.top,
            self.right + rhs.right,
            self.bottom + rhs.bottom,
        )
    }
}

impl Neg for Insets {
    type Output = Insets;
    fn neg(self) -> Insets {
        Insets::new(-self.left, -self.top, -self.right, -self.bottom)
    }
}

/// Edge-based rectangle. Every measured box is one of these.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoxRect {
    pub const ZERO: BoxRect = BoxRect {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// Seed for `union` folds; normalizes to `ZERO` when nothing was merged.
    pub const INVERTED_EXTREMA: BoxRect = BoxRect {
        left: f32::INFINITY,
        top: f32::INFINITY,
        right: f32::NEG_INFINITY,
        bottom: f32::NEG_INFINITY,
    };

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn from_origin_size(origin: Vec2, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn left_top(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn right_bottom(&self) -> Vec2 {
        Vec2::new(self.right, self.bottom)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Makes the rectangle well formed: NaN edges become 0, an unbounded far
    /// edge collapses onto its near edge, and swapped edges are reordered.
    pub fn normalize(self) -> BoxRect {
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        let left = finite_or(self.left, 0.0);
        let top = finite_or(self.top, 0.0);
        let right = finite_or(self.right, left);
        let bottom = finite_or(self.bottom, top);
        BoxRect::new(
            left.min(right),
            top.min(bottom),
            left.max(right),
            top.max(bottom),
        )
    }

    pub fn expand(self, by: Insets) -> BoxRect {
        BoxRect::new(
            self.left - by.left,
            self.top - by.top,
            self.right + by.right,
            self.bottom + by.bottom,
        )
    }

    pub fn translate(self, by: Vec2) -> BoxRect {
        BoxRect::new(
            self.left + by.x,
            self.top + by.y,
            self.right + by.x,
            self.bottom + by.y,
        )
    }

    pub fn union(self, other: BoxRect) -> BoxRect {
        BoxRect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn contains_rect(&self, other: &BoxRect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Corners in clockwise order starting at the left-top.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right, self.top),
            Vec2::new(self.right, self.bottom),
            Vec2::new(self.left, self.bottom),
        ]
    }
}

/// 2-D affine transform, row-vector convention: `p' = p * M`.
///
/// `a.then(b)` (also `a * b`) applies `a` first and `b` second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub m31: f32,
    pub m32: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        m31: 0.0,
        m32: 0.0,
    };

    pub fn translation(by: Vec2) -> Self {
        Matrix {
            m31: by.x,
            m32: by.y,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Matrix {
            m11: sx,
            m22: sy,
            ..Self::IDENTITY
        }
    }

    pub fn uniform_scale(s: f32) -> Self {
        Self::scale(s, s)
    }

    /// Clockwise rotation in screen space (y down), in radians.
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Matrix {
            m11: cos,
            m12: sin,
            m21: -sin,
            m22: cos,
            m31: 0.0,
            m32: 0.0,
        }
    }

    pub fn then(&self, next: &Matrix) -> Matrix {
        let a = self;
        let b = next;
        Matrix {
            m11: a.m11 * b.m11 + a.m12 * b.m21,
            m12: a.m11 * b.m12 + a.m12 * b.m22,
            m21: a.m21 * b.m11 + a.m22 * b.m21,
            m22: a.m21 * b.m12 + a.m22 * b.m22,
            m31: a.m31 * b.m11 + a.m32 * b.m21 + b.m31,
            m32: a.m31 * b.m12 + a.m32 * b.m22 + b.m32,
        }
    }

    pub fn determinant(&self) -> f32 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// `None` when the matrix is singular or holds non-finite values.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() || !self.is_finite() {
            return None;
        }
        let i11 = self.m22 / det;
        let i12 = -self.m12 / det;
        let i21 = -self.m21 / det;
        let i22 = self.m11 / det;
        Some(Matrix {
            m11: i11,
            m12: i12,
            m21: i21,
            m22: i22,
            m31: -(self.m31 * i11 + self.m32 * i21),
            m32: -(self.m31 * i12 + self.m32 * i22),
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn is_finite(&self) -> bool {
        [self.m11, self.m12, self.m21, self.m22, self.m31, self.m32]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn translation_part(&self) -> Vec2 {
        Vec2::new(self.m31, self.m32)
    }

    /// Average linear scale, used for sizes that cannot be skewed (text).
    pub fn mean_scale(&self) -> f32 {
        self.determinant().abs().sqrt()
    }

    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * self.m11 + p.y * self.m21 + self.m31,
            p.x * self.m12 + p.y * self.m22 + self.m32,
        )
    }

    pub fn transform_corners(&self, rect: &BoxRect) -> [Vec2; 4] {
        rect.corners().map(|p| self.transform_point(p))
    }

    pub fn lerp(&self, other: &Matrix, t: f32) -> Matrix {
        let l = |a: f32, b: f32| a + (b - a) * t;
        Matrix {
            m11: l(self.m11, other.m11),
            m12: l(self.m12, other.m12),
            m21: l(self.m21, other.m21),
            m22: l(self.m22, other.m22),
            m31: l(self.m31, other.m31),
            m32: l(self.m32, other.m32),
        }
    }
}

impl Mul for Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Matrix) -> Matrix {
        self.then(&rhs)
    }
}
