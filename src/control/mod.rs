pub mod attitude;
pub mod input;
pub mod pid;
pub mod policy;

pub use attitude::AttitudeDecoder;
pub use input::{Command, KeyState};
pub use pid::Pid;
pub use policy::{HeuristicPolicy, HoverPolicy, Policy, WaypointPolicy};
