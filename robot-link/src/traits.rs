//! The robot SDK boundary.
//!
//! The vendor SDK owns trajectory planning, motion interpolation and the
//! wire protocol of the robot link. This crate only pins down the boundary
//! the rest of the workspace programs against: a state channel
//! ([`CobotData`]) and a command channel ([`Cobot`]). The in-process
//! simulator ([`crate::sim::SimCobot`]) implements both; a hardware-backed
//! implementation plugs in behind the same traits.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::LinkError;
use crate::response::ResponseCollector;
use crate::types::{JointArray, OperationMode, SystemState};

/// Outcome of waiting for a motion acknowledgement with a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    Success,
    Timeout,
}

impl WaitResult {
    pub fn is_success(self) -> bool {
        self == WaitResult::Success
    }
}

/// The controller's data channel: one state sample per call.
#[async_trait]
pub trait CobotData: Send + Sync {
    async fn request_data(&self) -> Result<SystemState, LinkError>;
}

/// The controller's command channel.
///
/// Commands report their outcome through the passed [`ResponseCollector`];
/// an `Err` return means the link itself failed, not that the controller
/// rejected the command.
#[async_trait]
pub trait Cobot: Send + Sync {
    async fn set_operation_mode(
        &self,
        rc: &mut ResponseCollector,
        mode: OperationMode,
    ) -> Result<(), LinkError>;

    /// Discrete joint move with on-controller planning.
    async fn move_j(
        &self,
        rc: &mut ResponseCollector,
        joints: JointArray,
        speed: f64,
        acceleration: f64,
    ) -> Result<(), LinkError>;

    /// Streaming servo move: the target is tracked over `t1` seconds.
    async fn move_servo_j(
        &self,
        rc: &mut ResponseCollector,
        joints: JointArray,
        t1: f64,
        t2: f64,
        gain: f64,
        alpha: f64,
    ) -> Result<(), LinkError>;

    /// Joint-speed move, typically used to decelerate to a stop.
    async fn move_speed_j(
        &self,
        rc: &mut ResponseCollector,
        speeds: JointArray,
        t1: f64,
        t2: f64,
        gain: f64,
        alpha: f64,
    ) -> Result<(), LinkError>;

    async fn move_jb2_clear(&self, rc: &mut ResponseCollector) -> Result<(), LinkError>;

    async fn move_jb2_add(
        &self,
        rc: &mut ResponseCollector,
        joints: JointArray,
        speed: f64,
        acceleration: f64,
        blend_rate: f64,
    ) -> Result<(), LinkError>;

    async fn move_jb2_run(&self, rc: &mut ResponseCollector) -> Result<(), LinkError>;

    /// Flush queued commands to the controller.
    async fn flush(&self, rc: &mut ResponseCollector) -> Result<(), LinkError>;

    /// Wait until the controller acknowledges that a motion started, up to
    /// `timeout`.
    async fn wait_for_move_started(
        &self,
        rc: &mut ResponseCollector,
        timeout: Duration,
    ) -> Result<WaitResult, LinkError>;

    async fn wait_for_move_finished(&self, rc: &mut ResponseCollector) -> Result<(), LinkError>;

    async fn enable_waiting_ack(&self, rc: &mut ResponseCollector) -> Result<(), LinkError>;

    async fn disable_waiting_ack(&self, rc: &mut ResponseCollector) -> Result<(), LinkError>;

    async fn set_freedrive_mode(
        &self,
        rc: &mut ResponseCollector,
        enabled: bool,
    ) -> Result<(), LinkError>;
}
