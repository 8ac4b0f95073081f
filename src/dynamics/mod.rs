pub mod body;
pub mod state;

pub use body::{RigidBody, SimpleBody};
pub use state::{PhysicalState, Pose, G0};
