//! The recurring motion-sequence recipe.
//!
//! Every scripted workflow issues a discrete move the same way: send the
//! command, fail fast on collected errors, wait for the move-started
//! acknowledgement with a short timeout, wait for completion if it started,
//! then fail fast again. Motion must not proceed past an unacknowledged or
//! errored step.

use std::time::Duration;

use robot_link::{Cobot, JointArray, LinkError, ResponseCollector};

/// Timeout for the move-started acknowledgement.
pub const MOVE_STARTED_TIMEOUT: Duration = Duration::from_millis(500);

/// Issue `move_j` and run the full started/finished wait recipe.
pub async fn move_and_wait(
    robot: &dyn Cobot,
    rc: &mut ResponseCollector,
    joints: JointArray,
    speed: f64,
    acceleration: f64,
) -> Result<(), LinkError> {
    robot.move_j(rc, joints, speed, acceleration).await?;
    rc.ensure_no_errors()?;

    if robot
        .wait_for_move_started(rc, MOVE_STARTED_TIMEOUT)
        .await?
        .is_success()
    {
        robot.wait_for_move_finished(rc).await?;
    }
    rc.ensure_no_errors()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_link::{Response, SimCobot};

    #[tokio::test(start_paused = true)]
    async fn move_and_wait_completes_against_the_simulator() {
        let robot = SimCobot::new();
        let mut rc = ResponseCollector::new();
        let target = [20.0, 0.0, -8.0, 0.0, 0.0, 12.0];

        move_and_wait(&robot, &mut rc, target, 60.0, 80.0)
            .await
            .unwrap();

        let state = robot_link::CobotData::request_data(&robot).await.unwrap();
        assert_eq!(state.jnt_ang, target);
    }

    #[tokio::test(start_paused = true)]
    async fn sequence_aborts_once_an_error_is_collected() {
        let robot = SimCobot::new();
        let mut rc = ResponseCollector::new();
        rc.push(Response::error("previous step rejected"));

        let result = move_and_wait(&robot, &mut rc, [1.0; 6], 60.0, 80.0).await;
        assert!(result.is_err());
    }
}
