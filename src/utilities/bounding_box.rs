use glam::Vec3;

/// Provides simple axis-aligned bounding box functionality.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Location with the lowest X, Y, and Z coordinates in the axis-aligned bounding box.
    pub min: Vec3,
    /// Location with the highest X, Y, and Z coordinates in the axis-aligned bounding box.
    pub max: Vec3,
}

impl Default for BoundingBox {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Constructs a bounding box from the specified minimum and maximum.
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates an inverted bounding box that any merge will replace.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Creates a bounding box centered on the origin with the given half extents.
    #[inline]
    pub fn from_half_extents(half_extents: Vec3) -> Self {
        Self {
            min: -half_extents,
            max: half_extents,
        }
    }

    /// Creates the smallest possible bounding box that contains a list of points.
    /// An empty list produces an empty box.
    pub fn from_points(points: &[Vec3]) -> Self {
        points
            .iter()
            .fold(Self::empty(), |bounds, point| bounds.including(*point))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Computes a bounding box which contains two other bounding boxes.
    #[inline]
    pub fn create_merged_boxes(a: Self, b: Self) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    #[inline]
    pub fn including(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    #[inline]
    pub fn translated(self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Grows the box by `margin` along every axis in both directions.
    #[inline]
    pub fn expanded(self, margin: f32) -> Self {
        let margin = Vec3::splat(margin);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_and_merge() {
        let bounds = BoundingBox::from_points(&[
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        ]);
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 2.0));

        let merged = BoundingBox::create_merged_boxes(
            bounds,
            BoundingBox::new(Vec3::splat(-5.0), Vec3::ZERO),
        );
        assert_eq!(merged.min, Vec3::new(-5.0, -5.0, -5.0));
        assert_eq!(merged.max, Vec3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn test_translate_and_expand() {
        let bounds = BoundingBox::from_half_extents(Vec3::new(2.0, 1.0, 0.5))
            .translated(Vec3::new(1.0, 0.0, -1.0))
            .expanded(0.25);
        assert_eq!(bounds.min, Vec3::new(-1.25, -1.25, -1.75));
        assert_eq!(bounds.max, Vec3::new(3.25, 1.25, -0.25));
        assert_eq!(bounds.center(), Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(bounds.extents(), Vec3::new(4.5, 2.5, 1.5));
    }
}
