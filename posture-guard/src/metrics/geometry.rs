use crate::landmarks::Point;

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, (a.z + b.z) / 2.0)
}

/// Distance in the image plane (depth is too noisy to include)
pub fn planar_distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Angle in degrees at `vertex` between the rays towards `a` and `c`
///
/// Computed as the difference of the two ray headings via atan2, then
/// folded into 0-180.
pub fn angle_at(a: Point, vertex: Point, c: Point) -> f64 {
    let radians = (c.y - vertex.y).atan2(c.x - vertex.x) - (a.y - vertex.y).atan2(a.x - vertex.x);
    let mut angle = radians.to_degrees().abs();

    if angle > 180.0 {
        angle = 360.0 - angle;
    }

    angle
}
