pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod physics;
pub mod state;

pub use camera::*;
pub use config::*;
pub use error::*;
pub use input::*;
pub use physics::*;
pub use state::*;
