//! Interactive joint/TCP recorder.
//!
//! Each press of [Enter] samples the current robot state and stores one
//! captured point; `q` quits and saves the collected points as a
//! timestamped JSON trace under `joint_capture/`.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use cobot_tools::{trace, RobotArgs};
use robot_link::{CapturedPoint, CobotData};

#[derive(Parser, Debug)]
#[command(about = "Interactive joint/TCP data recorder")]
struct Cli {
    #[command(flatten)]
    robot: RobotArgs,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output directory for recorded traces
    #[arg(long, default_value = "joint_capture")]
    output_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cobot_tools::init_logging(&cli.log_level);

    let data_channel = cli.robot.connect();
    let mut collected: Vec<CapturedPoint> = Vec::new();

    tracing::info!("Interactive joint trace recording started.");

    loop {
        print!("Press [Enter] to record the current point. Type 'q' to quit and save: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            break; // EOF
        }
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        let state = data_channel.request_data().await?;
        collected.push(CapturedPoint {
            jnt_ang: state.jnt_ang,
            tcp_pos: state.tcp_pos,
        });
        tracing::info!("Recorded point #{}", collected.len());
    }

    if collected.is_empty() {
        tracing::info!("No data was recorded. Exiting without saving.");
        return Ok(());
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = std::path::Path::new(&cli.output_dir).join(format!("joint_trace_{timestamp}.json"));
    trace::save_captured(&path, &collected)?;
    tracing::info!("Saved {} entries to {}", collected.len(), path.display());

    Ok(())
}
