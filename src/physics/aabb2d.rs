use crate::physics::math::{Scalar, Vector};

/// Axis-aligned rectangle. The simulated world is `[0, width] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2d {
    pub min: Vector,
    pub max: Vector,
}

impl Aabb2d {
    pub fn new(min: Vector, max: Vector) -> Self {
        Self { min, max }
    }

    pub fn from_size(width: Scalar, height: Scalar) -> Self {
        Self::new(Vector::ZERO, Vector::new(width, height))
    }

    #[inline]
    pub fn center(&self) -> Vector {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vector {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, point: Vector) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Shrinks every edge inward by `margin`. May produce an inverted box.
    pub fn inset(&self, margin: Scalar) -> Self {
        Self::new(
            self.min + Vector::splat(margin),
            self.max - Vector::splat(margin),
        )
    }
}
