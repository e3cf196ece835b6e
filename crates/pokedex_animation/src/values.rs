//! Animatable value types
//!
//! Linear interpolation for the values the motion core produces, and the
//! per-frame transform handed to the presentation tree.

use pokedex_core::Vec2;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for Vec2 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec2::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

/// Visual transform of one element for the current frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementTransform {
    /// Translation in logical pixels
    pub offset: Vec2,
    pub scale: f32,
    /// Rotation in radians
    pub rotation: f32,
    pub opacity: f32,
}

impl ElementTransform {
    pub const IDENTITY: ElementTransform = ElementTransform {
        offset: Vec2::ZERO,
        scale: 1.0,
        rotation: 0.0,
        opacity: 1.0,
    };

    /// Layer another transform on top: offsets and rotations add, scale and
    /// opacity multiply
    pub fn then(&self, other: &ElementTransform) -> ElementTransform {
        ElementTransform {
            offset: self.offset + other.offset,
            scale: self.scale * other.scale,
            rotation: self.rotation + other.rotation,
            opacity: self.opacity * other.opacity,
        }
    }

    pub fn is_identity(&self, epsilon: f32) -> bool {
        self.approx_eq(&Self::IDENTITY, epsilon)
    }
}

impl Default for ElementTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Interpolate for ElementTransform {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        ElementTransform {
            offset: self.offset.lerp(&other.offset, t),
            scale: self.scale.lerp(&other.scale, t),
            rotation: self.rotation.lerp(&other.rotation, t),
            opacity: self.opacity.lerp(&other.opacity, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.offset.approx_eq(&other.offset, epsilon)
            && self.scale.approx_eq(&other.scale, epsilon)
            && self.rotation.approx_eq(&other.rotation, epsilon)
            && self.opacity.approx_eq(&other.opacity, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_interpolation() {
        assert!((0.0_f32.lerp(&1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(&20.0, 0.25) - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_interpolation() {
        let mid = Vec2::ZERO.lerp(&Vec2::new(10.0, 20.0), 0.5);
        assert!(mid.approx_eq(&Vec2::new(5.0, 10.0), 1e-6));
    }

    #[test]
    fn test_transform_layering() {
        let lift = ElementTransform {
            offset: Vec2::new(0.0, -8.0),
            scale: 1.05,
            ..ElementTransform::IDENTITY
        };
        let fade = ElementTransform {
            opacity: 0.5,
            ..ElementTransform::IDENTITY
        };
        let both = lift.then(&fade);
        assert_eq!(both.offset, Vec2::new(0.0, -8.0));
        assert!((both.scale - 1.05).abs() < 1e-6);
        assert!((both.opacity - 0.5).abs() < 1e-6);
        assert!(ElementTransform::default().is_identity(1e-6));
    }
}
