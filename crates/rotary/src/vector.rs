//! Small vector helpers used to turn a pointer offset into a dial angle.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Point) -> [f64; 2] {
        [self.x - origin.x, self.y - origin.y]
    }

    /// Moves `distance` along the unit `direction`.
    pub fn project(self, direction: [f64; 2], distance: f64) -> Point {
        Point::new(
            self.x + distance * direction[0],
            self.y + distance * direction[1],
        )
    }
}

/// Dot product over the shorter of the two slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0, |product, (&x, &y)| x.mul_add(y, product))
}

pub fn length(vector: &[f64]) -> f64 {
    dot(vector, vector).sqrt()
}

/// Scales `vector` to unit length. A zero-length (or non-finite) vector has no
/// direction, so `None` is returned instead of a vector of NaNs.
pub fn normalize<const N: usize>(vector: [f64; N]) -> Option<[f64; N]> {
    let len = length(&vector);
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some(vector.map(|component| component / len))
}

/// Unit vector for `degrees` with 0° pointing up and angles growing clockwise
/// (screen coordinates, y down).
pub fn direction(degrees: f64) -> [f64; 2] {
    let radians = degrees.to_radians();
    [radians.sin(), -radians.cos()]
}

/// Clockwise angle between "up" `(0, -1)` and `unit`, in [0, 360).
pub fn angle_from_up(unit: [f64; 2]) -> f64 {
    // atan2(det, dot) against (0, -1) reduces to atan2(x, -y)
    let angle = unit[0].atan2(-unit[1]);
    let angle = if angle >= 0.0 {
        angle
    } else {
        angle + 2.0 * std::f64::consts::PI
    };
    angle.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{a} != {b}");
    }

    #[test]
    fn test_normalize() {
        let unit = normalize([3.0, 4.0]).unwrap();
        assert_close(unit[0], 0.6);
        assert_close(unit[1], 0.8);
        assert_close(length(&unit), 1.0);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize([0.0, 0.0]), None);
        assert_eq!(normalize([f64::NAN, 1.0]), None);
    }

    #[test]
    fn test_dot() {
        assert_eq!(dot(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0]), 14.0);
        assert_eq!(dot(&[], &[4.0, 5.0]), 0.0);
    }

    #[test]
    fn test_length() {
        assert_close(length(&[3.0, 4.0]), 5.0);
        assert_close(length(&[1.0, 2.0, 2.0]), 3.0);
    }

    #[test]
    fn test_angle_from_up() {
        let cases = vec![
            ([0.0, -1.0], 0.0),
            ([1.0, 0.0], 90.0),
            ([0.0, 1.0], 180.0),
            ([-1.0, 0.0], 270.0),
        ];

        for (unit, expected) in cases {
            assert_close(angle_from_up(unit), expected);
        }
    }

    #[test]
    fn test_direction_matches_angle() {
        for degrees in [0.0, 30.0, 135.0, 200.0, 359.0] {
            let dir = direction(degrees);
            assert_close(length(&dir), 1.0);
            assert_close(angle_from_up(dir), degrees);
        }
    }
}
