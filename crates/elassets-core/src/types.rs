//! Common types used across elassets
//!
//! Vectors and quaternions carry the conversion between the source space of
//! the asset files (left-handed, Z up) and the space every decoder emits
//! (right-handed, Y up).

use serde::{Deserialize, Serialize};

/// 3D vector (position, normal, euler rotation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };
    pub const UP: Self = Self { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert a left-handed Z-up vector into right-handed Y-up space.
    ///
    /// `{x, y, z}` becomes `{x, z, -y}`.
    #[inline]
    pub fn to_y_up(self) -> Self {
        Self {
            x: self.x,
            y: self.z,
            z: -self.y,
        }
    }

    /// Inverse of [`Vec3::to_y_up`].
    #[inline]
    pub fn to_z_up(self) -> Self {
        Self {
            x: self.x,
            y: -self.z,
            z: self.y,
        }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Component-wise minimum
    pub fn min(&self, other: &Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum
    pub fn max(&self, other: &Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Rotation quaternion, stored `x, y, z, w`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Convert a left-handed Z-up rotation into right-handed Y-up space.
    ///
    /// `{x, y, z, w}` becomes `{x, z, -y, -w}`. The axes follow
    /// [`Vec3::to_y_up`]; negating `w` accounts for the handedness flip.
    #[inline]
    pub fn to_y_up(self) -> Self {
        Self {
            x: self.x,
            y: self.z,
            z: -self.y,
            w: -self.w,
        }
    }

    /// Inverse of [`Quat::to_y_up`].
    #[inline]
    pub fn to_z_up(self) -> Self {
        Self {
            x: self.x,
            y: -self.z,
            z: self.y,
            w: -self.w,
        }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Build a box from two source-space corners.
    ///
    /// The corners are converted to Y-up and re-ordered per axis, since the
    /// conversion negates one axis and would otherwise swap min and max.
    pub fn from_z_up_corners(a: Vec3, b: Vec3) -> Self {
        let a = a.to_y_up();
        let b = b.to_y_up();
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(&point);
        self.max = self.max.max(&point);
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::ZERO
    }
}
