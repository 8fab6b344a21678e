//! In-process controller simulator.
//!
//! Implements both sides of the SDK boundary with linear joint
//! interpolation between move targets. Good enough to drive the relay
//! server, the CLI tools and the test suite without hardware; makes no
//! attempt to model real dynamics.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::errors::LinkError;
use crate::response::{Response, ResponseCollector};
use crate::traits::{Cobot, CobotData, WaitResult};
use crate::types::{JointArray, OperationMode, PoseArray, SystemState};

/// Polling step used while waiting for motion acknowledgements.
const WAIT_POLL: Duration = Duration::from_millis(10);

/// Minimum duration assigned to any simulated motion.
const MIN_MOTION_SECS: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
struct Motion {
    from: JointArray,
    to: JointArray,
    started: Instant,
    duration: Duration,
}

impl Motion {
    fn joints_at(&self, now: Instant) -> JointArray {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let total = self.duration.as_secs_f64();
        if elapsed >= total {
            return self.to;
        }
        let t = elapsed / total;
        let mut joints = [0.0; 6];
        for (i, value) in joints.iter_mut().enumerate() {
            *value = self.from[i] + (self.to[i] - self.from[i]) * t;
        }
        joints
    }

    fn finished_at(&self) -> Instant {
        self.started + self.duration
    }
}

#[derive(Debug, Clone, Copy)]
struct QueuedPoint {
    joints: JointArray,
    speed: f64,
}

#[derive(Debug)]
struct SimState {
    joints: JointArray,
    target: JointArray,
    motion: Option<Motion>,
    blend_queue: Vec<QueuedPoint>,
    freedrive: bool,
    mode: OperationMode,
    waiting_ack: bool,
}

impl SimState {
    /// Current joint angles, folding a finished motion into the resting
    /// position.
    fn current_joints(&mut self, now: Instant) -> JointArray {
        if let Some(motion) = self.motion {
            let joints = motion.joints_at(now);
            if now >= motion.finished_at() {
                self.joints = motion.to;
                self.motion = None;
            }
            joints
        } else {
            self.joints
        }
    }

    fn start_motion(&mut self, to: JointArray, duration: Duration) {
        let now = Instant::now();
        let from = self.current_joints(now);
        self.joints = from;
        self.target = to;
        self.motion = Some(Motion {
            from,
            to,
            started: now,
            duration,
        });
    }
}

/// Simulated cobot behind the [`Cobot`]/[`CobotData`] boundary.
pub struct SimCobot {
    state: Mutex<SimState>,
}

impl Default for SimCobot {
    fn default() -> Self {
        Self::new()
    }
}

impl SimCobot {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                joints: [0.0; 6],
                target: [0.0; 6],
                motion: None,
                blend_queue: Vec::new(),
                freedrive: false,
                mode: OperationMode::Simulation,
                waiting_ack: true,
            }),
        }
    }

    /// Construct a simulator standing in for the controller at
    /// `address:port`. The endpoint is informational only.
    pub fn with_endpoint(address: &str, port: u16) -> Self {
        tracing::info!("Simulated robot link standing in for {}:{}", address, port);
        Self::new()
    }

    fn motion_duration(from: JointArray, to: JointArray, speed: f64) -> Duration {
        let max_delta = from
            .iter()
            .zip(to.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        let speed = speed.max(1.0);
        Duration::from_secs_f64((max_delta / speed).max(MIN_MOTION_SECS))
    }
}

/// Placeholder forward map from joint angles to a tool pose. Not a real
/// kinematic model; just keeps the TCP fields plausible and joint-dependent.
fn tool_pose(joints: JointArray) -> PoseArray {
    [
        400.0 + 2.0 * joints[1],
        3.0 * joints[0],
        300.0 - 2.0 * joints[2],
        joints[3],
        joints[4],
        joints[5],
    ]
}

#[async_trait]
impl CobotData for SimCobot {
    async fn request_data(&self) -> Result<SystemState, LinkError> {
        let mut state = self.state.lock().await;
        let joints = state.current_joints(Instant::now());
        Ok(SystemState {
            jnt_ang: joints,
            jnt_ref: state.target,
            tcp_ref: tool_pose(state.target),
            tcp_pos: tool_pose(joints),
            is_freedrive_mode: state.freedrive,
            real_vs_simulation_mode: state.mode.raw(),
        })
    }
}

#[async_trait]
impl Cobot for SimCobot {
    async fn set_operation_mode(
        &self,
        rc: &mut ResponseCollector,
        mode: OperationMode,
    ) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        state.mode = mode;
        rc.push(Response::ack("set_operation_mode"));
        Ok(())
    }

    async fn move_j(
        &self,
        rc: &mut ResponseCollector,
        joints: JointArray,
        speed: f64,
        _acceleration: f64,
    ) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        let from = state.current_joints(Instant::now());
        let duration = Self::motion_duration(from, joints, speed);
        state.start_motion(joints, duration);
        rc.push(Response::ack("move_j"));
        Ok(())
    }

    async fn move_servo_j(
        &self,
        rc: &mut ResponseCollector,
        joints: JointArray,
        t1: f64,
        _t2: f64,
        _gain: f64,
        _alpha: f64,
    ) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        let duration = Duration::from_secs_f64(t1.max(MIN_MOTION_SECS));
        state.start_motion(joints, duration);
        if state.waiting_ack {
            rc.push(Response::ack("move_servo_j"));
        }
        Ok(())
    }

    async fn move_speed_j(
        &self,
        rc: &mut ResponseCollector,
        speeds: JointArray,
        t1: f64,
        _t2: f64,
        _gain: f64,
        _alpha: f64,
    ) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let from = state.current_joints(now);
        let horizon = t1.max(MIN_MOTION_SECS);
        let mut to = from;
        for (i, target) in to.iter_mut().enumerate() {
            *target += speeds[i] * horizon;
        }
        state.start_motion(to, Duration::from_secs_f64(horizon));
        if state.waiting_ack {
            rc.push(Response::ack("move_speed_j"));
        }
        Ok(())
    }

    async fn move_jb2_clear(&self, rc: &mut ResponseCollector) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        state.blend_queue.clear();
        rc.push(Response::ack("move_jb2_clear"));
        Ok(())
    }

    async fn move_jb2_add(
        &self,
        rc: &mut ResponseCollector,
        joints: JointArray,
        speed: f64,
        _acceleration: f64,
        _blend_rate: f64,
    ) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        state.blend_queue.push(QueuedPoint { joints, speed });
        if state.waiting_ack {
            rc.push(Response::ack("move_jb2_add"));
        }
        Ok(())
    }

    async fn move_jb2_run(&self, rc: &mut ResponseCollector) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        if state.blend_queue.is_empty() {
            rc.push(Response::error("move_jb2_run: blend queue is empty"));
            return Ok(());
        }

        // Collapse the queue into one motion from the current position to
        // the final point, lasting the sum of the per-segment durations.
        let mut from = state.current_joints(Instant::now());
        let mut total = Duration::ZERO;
        let mut last = from;
        for point in &state.blend_queue {
            total += Self::motion_duration(from, point.joints, point.speed);
            from = point.joints;
            last = point.joints;
        }
        state.blend_queue.clear();
        state.start_motion(last, total);
        rc.push(Response::ack("move_jb2_run"));
        Ok(())
    }

    async fn flush(&self, rc: &mut ResponseCollector) -> Result<(), LinkError> {
        rc.push(Response::ack("flush"));
        Ok(())
    }

    async fn wait_for_move_started(
        &self,
        rc: &mut ResponseCollector,
        timeout: Duration,
    ) -> Result<WaitResult, LinkError> {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                if let Some(motion) = state.motion {
                    if now < motion.finished_at() {
                        rc.push(Response::info("move started"));
                        return Ok(WaitResult::Success);
                    }
                    // Finished motion: fold it and keep waiting.
                    state.current_joints(now);
                }
            }
            if Instant::now() >= deadline {
                return Ok(WaitResult::Timeout);
            }
            sleep(WAIT_POLL).await;
        }
    }

    async fn wait_for_move_finished(&self, rc: &mut ResponseCollector) -> Result<(), LinkError> {
        loop {
            let finished_at = {
                let state = self.state.lock().await;
                state.motion.map(|m| m.finished_at())
            };
            match finished_at {
                None => {
                    rc.push(Response::info("move finished"));
                    return Ok(());
                }
                Some(at) => {
                    let now = Instant::now();
                    if now >= at {
                        let mut state = self.state.lock().await;
                        state.current_joints(Instant::now());
                    } else {
                        sleep(at.saturating_duration_since(now)).await;
                    }
                }
            }
        }
    }

    async fn enable_waiting_ack(&self, rc: &mut ResponseCollector) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        state.waiting_ack = true;
        rc.push(Response::ack("enable_waiting_ack"));
        Ok(())
    }

    async fn disable_waiting_ack(&self, _rc: &mut ResponseCollector) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        state.waiting_ack = false;
        Ok(())
    }

    async fn set_freedrive_mode(
        &self,
        rc: &mut ResponseCollector,
        enabled: bool,
    ) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        state.freedrive = enabled;
        rc.push(Response::ack("set_freedrive_mode"));
        Ok(())
    }
}
