// Top-level modules
pub mod errors;
pub mod response;
pub mod sim;
pub mod traits;
pub mod types;

// Re-export message and state types for use in relay-server and tools
pub use types::{
    BlendedPoint, CapturedPoint, JointArray, OperationMode, PoseArray, StateSnapshot, SystemState,
};

// Re-export the SDK boundary
pub use errors::LinkError;
pub use response::{Response, ResponseCollector, ResponseKind};
pub use traits::{Cobot, CobotData, WaitResult};

pub use sim::SimCobot;
