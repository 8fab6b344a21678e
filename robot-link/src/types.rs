// Location: robot-link/src/types.rs
// Purpose: Type definitions shared between the relay server, the CLI tools,
// and implementations of the robot SDK boundary.

use serde::{Deserialize, Serialize};

/// Six joint values, in degrees.
pub type JointArray = [f64; 6];

/// A Cartesian pose: x, y, z in millimetres plus rx, ry, rz in degrees.
pub type PoseArray = [f64; 6];

/// Raw sample returned by the controller's data channel.
///
/// `real_vs_simulation_mode` follows the vendor convention: `1` means the
/// controller runs in simulation, any other value means real hardware.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub jnt_ang: JointArray,
    pub jnt_ref: JointArray,
    pub tcp_ref: PoseArray,
    pub tcp_pos: PoseArray,
    pub is_freedrive_mode: bool,
    pub real_vs_simulation_mode: i32,
}

/// Controller operation mode as exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationMode {
    Real,
    #[serde(rename = "Sim")]
    Simulation,
}

impl OperationMode {
    /// Map the raw mode flag from the data channel (`1` = simulation).
    pub fn from_raw(raw: i32) -> Self {
        if raw == 1 {
            OperationMode::Simulation
        } else {
            OperationMode::Real
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            OperationMode::Simulation => 1,
            OperationMode::Real => 0,
        }
    }
}

/// One immutable state record pushed to WebSocket subscribers.
///
/// The serialized form is a JSON object with exactly these keys:
/// `jnt_ang`, `jnt_ref`, `tcp_ref`, `tcp_pos` (arrays of 6 numbers),
/// `is_freedrive_mode` (bool) and `real_vs_simulation` (`"Sim"`/`"Real"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub jnt_ang: JointArray,
    pub jnt_ref: JointArray,
    pub tcp_ref: PoseArray,
    pub tcp_pos: PoseArray,
    pub is_freedrive_mode: bool,
    pub real_vs_simulation: OperationMode,
}

impl From<&SystemState> for StateSnapshot {
    fn from(state: &SystemState) -> Self {
        Self {
            jnt_ang: state.jnt_ang,
            jnt_ref: state.jnt_ref,
            tcp_ref: state.tcp_ref,
            tcp_pos: state.tcp_pos,
            is_freedrive_mode: state.is_freedrive_mode,
            real_vs_simulation: OperationMode::from_raw(state.real_vs_simulation_mode),
        }
    }
}

/// Recorder output element: one captured joint/TCP pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapturedPoint {
    pub jnt_ang: JointArray,
    pub tcp_pos: PoseArray,
}

/// Replay input element: a joint target plus the blend rate used when the
/// point is queued on the controller's blended-motion queue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedPoint {
    pub jnt_ang: JointArray,
    pub blend_rate: f64,
}
