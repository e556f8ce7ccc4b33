use std::fmt;

use crate::engine::physics::rigid_body::BodyId;

#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be finite and strictly positive to take part in gravity.
    InvalidMass(f64),
    /// Position or velocity contained NaN or infinity.
    NonFiniteState,
    UnknownBody(BodyId),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass(mass) => {
                write!(f, "body mass must be finite and > 0, got {}", mass)
            }
            PhysicsError::NonFiniteState => write!(f, "body position or velocity is not finite"),
            PhysicsError::UnknownBody(id) => write!(f, "no body with id {}", id.0),
        }
    }
}

impl std::error::Error for PhysicsError {}
