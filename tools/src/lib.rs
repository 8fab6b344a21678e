//! Shared plumbing for the CLI tools: the recurring motion-sequence recipe,
//! trace file I/O, and common CLI flags.

pub mod sequence;
pub mod trace;

use clap::Args;
use robot_link::SimCobot;

/// Connection flags shared by every tool.
///
/// The endpoint is handed to the robot backend; the simulator backend (the
/// only one shipped here) uses it for labelling only.
#[derive(Args, Debug)]
pub struct RobotArgs {
    /// Robot IP address
    #[arg(long, default_value = "10.0.2.7")]
    pub address: String,

    /// Robot port
    #[arg(long, default_value_t = 5000)]
    pub port: u16,
}

impl RobotArgs {
    pub fn connect(&self) -> SimCobot {
        SimCobot::with_endpoint(&self.address, self.port)
    }
}

/// Initialize console logging for a tool run.
pub fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_lowercase()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
