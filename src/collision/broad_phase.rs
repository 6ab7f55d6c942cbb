use crate::math::Vector3;

/// A bounding sphere for coarse collision culling.
///
/// Also the building block for a bounding-volume hierarchy: the enclosing
/// constructor and the growth metric are what a tree-building caller needs
/// to choose insertion points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Centre of the sphere in world space
    pub centre: Vector3,

    /// Radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a bounding sphere with the given centre and radius
    pub fn new(centre: Vector3, radius: f32) -> Self {
        Self { centre, radius }
    }

    /// Creates the minimal sphere enclosing the two given spheres
    pub fn enclosing(one: &BoundingSphere, two: &BoundingSphere) -> Self {
        let centre_offset = two.centre - one.centre;
        let distance_squared = centre_offset.length_squared();
        let radius_diff = two.radius - one.radius;

        // The larger sphere may already contain the smaller one.
        if radius_diff * radius_diff >= distance_squared {
            if one.radius > two.radius {
                *one
            } else {
                *two
            }
        } else {
            let distance = distance_squared.sqrt();
            let radius = (distance + one.radius + two.radius) * 0.5;

            // The new centre sits on the line between the two centres,
            // offset from one's centre in proportion to the radii.
            let mut centre = one.centre;
            if distance > 0.0 {
                centre += centre_offset * ((radius - one.radius) / distance);
            }

            Self { centre, radius }
        }
    }

    /// Tests whether this sphere overlaps the other, comparing squared
    /// distances to avoid the square root
    pub fn overlaps(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.centre - other.centre).length_squared();
        distance_squared < (self.radius + other.radius) * (self.radius + other.radius)
    }

    /// Returns how much this sphere would have to grow to incorporate the
    /// other, proportional to the change in surface area
    pub fn growth(&self, other: &BoundingSphere) -> f32 {
        let new_sphere = Self::enclosing(self, other);
        new_sphere.radius * new_sphere.radius - self.radius * self.radius
    }
}
