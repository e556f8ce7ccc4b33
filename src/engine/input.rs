use std::collections::HashSet;

use crate::engine::physics::vector::Vector2D;

/// Logical pan directions, independent of which physical key produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub type HeldDirections = HashSet<Direction>;

/// Discrete inputs the simulation reacts to. Held pan directions are not
/// events, they are sampled every frame instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimInput {
    /// Double the time scale.
    WarpIn,
    /// Halve the time scale.
    WarpOut,
    /// Primary pointer button at a screen position in pixels.
    Click(Vector2D),
    /// Vertical wheel delta, positive zooms in.
    Wheel(f64),
    /// Viewport size in pixels.
    Resize(f64, f64),
}

/// Unit-speed camera velocity in screen orientation (y grows downwards).
/// Opposing directions cancel.
pub fn camera_velocity(held: &HeldDirections) -> Vector2D {
    let axis = |neg: Direction, pos: Direction| -> f64 {
        match (held.contains(&neg), held.contains(&pos)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    };

    Vector2D::new(
        axis(Direction::Left, Direction::Right),
        axis(Direction::Up, Direction::Down),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(dirs: &[Direction]) -> HeldDirections {
        dirs.iter().copied().collect()
    }

    #[test]
    fn nothing_held_is_still() {
        assert_eq!(camera_velocity(&HeldDirections::new()), Vector2D::ZERO);
    }

    #[test]
    fn single_directions() {
        assert_eq!(camera_velocity(&held(&[Direction::Left])), Vector2D::new(-1.0, 0.0));
        assert_eq!(camera_velocity(&held(&[Direction::Right])), Vector2D::new(1.0, 0.0));
        assert_eq!(camera_velocity(&held(&[Direction::Up])), Vector2D::new(0.0, -1.0));
        assert_eq!(camera_velocity(&held(&[Direction::Down])), Vector2D::new(0.0, 1.0));
    }

    #[test]
    fn opposing_directions_cancel() {
        let v = camera_velocity(&held(&[Direction::Left, Direction::Right, Direction::Down]));
        assert_eq!(v, Vector2D::new(0.0, 1.0));
        let v = camera_velocity(&held(&[
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ]));
        assert_eq!(v, Vector2D::ZERO);
    }

    #[test]
    fn diagonals_combine() {
        let v = camera_velocity(&held(&[Direction::Up, Direction::Right]));
        assert_eq!(v, Vector2D::new(1.0, -1.0));
    }
}
