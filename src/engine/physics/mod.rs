pub mod gravity;
pub mod physics_world;
pub mod rigid_body;
pub mod spawn;
pub mod vector;

pub use gravity::*;
pub use physics_world::*;
pub use rigid_body::*;
pub use spawn::*;
pub use vector::*;
