use crate::vector::{self, Point};

pub const PADDING: f64 = 2.0;
pub const MIN_RADIUS: f64 = 10.0;
pub const INDICATOR_RADIUS: f64 = 5.0;
/// Gap between the indicator disc and the rim.
pub const INDICATOR_INSET: f64 = 5.0;
pub const DEFAULT_DIAMETER: f64 = 100.0;

/// Fixed layout of one dial, derived from the configured diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub center: Point,
    pub radius: f64,
    pub indicator_radius: f64,
}

impl DialGeometry {
    pub fn new(diameter: f64) -> Self {
        let radius = (diameter * 0.5).max(MIN_RADIUS);
        Self {
            center: Point::new(PADDING + radius, PADDING + radius),
            radius,
            indicator_radius: INDICATOR_RADIUS,
        }
    }

    /// Width and height of the square surface the dial needs.
    pub fn surface_size(&self) -> f64 {
        2.0 * (self.radius + PADDING)
    }

    /// Squared-distance test, no square root needed.
    pub fn contains(&self, point: Point) -> bool {
        let offset = point.offset_from(self.center);
        vector::dot(&offset, &offset) <= self.radius * self.radius
    }

    /// Clockwise angle of `point` around the center, or `None` when the point
    /// sits exactly on the center.
    pub fn angle_at(&self, point: Point) -> Option<f64> {
        vector::normalize(point.offset_from(self.center)).map(vector::angle_from_up)
    }

    pub fn indicator_center(&self, direction: [f64; 2]) -> Point {
        self.center.project(
            direction,
            self.radius - self.indicator_radius - INDICATOR_INSET,
        )
    }

    /// Inner and outer end of a tick mark along `direction`.
    pub fn tick_segment(&self, direction: [f64; 2]) -> (Point, Point) {
        let start = self.center.project(direction, self.radius - self.indicator_radius - 2.0);
        let end = self
            .center
            .project(direction, self.radius - 2.0 * self.indicator_radius);
        (start, end)
    }
}

impl Default for DialGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_DIAMETER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_from_diameter() {
        let g = DialGeometry::new(100.0);
        assert_eq!(g.radius, 50.0);
        assert_eq!(g.center, Point::new(52.0, 52.0));
        assert_eq!(g.surface_size(), 104.0);
    }

    #[test]
    fn test_minimum_radius() {
        let g = DialGeometry::new(4.0);
        assert_eq!(g.radius, MIN_RADIUS);
        assert_eq!(g.center, Point::new(12.0, 12.0));
    }

    #[test]
    fn test_contains() {
        let g = DialGeometry::new(100.0);
        assert!(g.contains(g.center));
        assert!(g.contains(Point::new(52.0, 2.0)));
        assert!(!g.contains(Point::new(52.0, 1.0)));
        assert!(!g.contains(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_angle_at() {
        let g = DialGeometry::new(100.0);
        assert_eq!(g.angle_at(g.center), None);
        let cases = vec![
            (Point::new(52.0, 10.0), 0.0),
            (Point::new(90.0, 52.0), 90.0),
            (Point::new(52.0, 60.0), 180.0),
            (Point::new(40.0, 52.0), 270.0),
        ];

        for (point, expected) in cases {
            let angle = g.angle_at(point).unwrap();
            assert!((angle - expected).abs() < 1e-9, "{angle} != {expected}");
        }
    }

    #[test]
    fn test_indicator_center() {
        let g = DialGeometry::new(100.0);
        let p = g.indicator_center(vector::direction(0.0));
        assert!((p.x - 52.0).abs() < 1e-9);
        assert!((p.y - 12.0).abs() < 1e-9);
    }
}
