use glam::DVec2;

/// Double precision 2D vector used for positions, velocities and directions.
///
/// Addition, difference, scaling and magnitude are the `glam` operators
/// (`a + b`, `a - b`, `v * k`, `v.length()`). The helpers below cover the
/// cases where a plain operator would divide by zero.
pub type Vector2D = DVec2;

/// Lengths at or below this are treated as zero when normalizing.
pub const NORMALIZE_EPSILON: f64 = 1e-12;

/// Unit vector in the direction of `v`, or `None` when `v` is (near) zero
/// or not finite.
pub fn try_normalize(v: Vector2D) -> Option<Vector2D> {
    let len = v.length();
    if !len.is_finite() || len <= NORMALIZE_EPSILON {
        return None;
    }
    Some(v / len)
}

/// Clockwise perpendicular of `r` in screen orientation (y down), normalized.
///
/// For a body below the attractor (`r = (0, +d)`) this points along +x.
pub fn tangent(r: Vector2D) -> Option<Vector2D> {
    try_normalize(Vector2D::new(r.y, -r.x))
}

pub fn is_finite(v: Vector2D) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
