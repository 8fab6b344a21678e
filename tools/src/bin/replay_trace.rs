//! Replay a recorded joint trajectory through the controller's blended
//! motion queue.
//!
//! The whole trace is queued up front and executed as one smooth motion.

use anyhow::Result;
use clap::Parser;
use cobot_tools::sequence::MOVE_STARTED_TIMEOUT;
use cobot_tools::{trace, RobotArgs};
use robot_link::{Cobot, OperationMode, ResponseCollector};

#[derive(Parser, Debug)]
#[command(about = "Replay a recorded joint trajectory using blended motion")]
struct Cli {
    #[command(flatten)]
    robot: RobotArgs,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Path to the joint trace JSON file
    #[arg(long)]
    json: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cobot_tools::init_logging(&cli.log_level);

    let robot = cli.robot.connect();
    let mut rc = ResponseCollector::new();

    tracing::warn!("Setting operation mode to Real");
    robot.set_operation_mode(&mut rc, OperationMode::Real).await?;
    rc.ensure_no_errors()?;

    tracing::info!("Loading joint data from: {}", cli.json);
    let points = trace::load_blended(&cli.json)?;
    tracing::info!("Loaded {} trajectory points", points.len());

    tracing::info!("Sending joint data to the blend queue");
    robot.move_jb2_clear(&mut rc).await?;
    for (idx, point) in points.iter().enumerate() {
        tracing::debug!("[Step {}] joints = {:?}", idx + 1, point.jnt_ang);
        robot
            .move_jb2_add(&mut rc, point.jnt_ang, 100.0, 100.0, point.blend_rate)
            .await?;
    }
    robot.flush(&mut rc).await?;

    tracing::info!("Starting blended motion");
    robot.move_jb2_run(&mut rc).await?;
    if robot
        .wait_for_move_started(&mut rc, MOVE_STARTED_TIMEOUT)
        .await?
        .is_success()
    {
        robot.wait_for_move_finished(&mut rc).await?;
    }
    rc.ensure_no_errors()?;

    tracing::info!("Motion completed successfully.");
    Ok(())
}
