use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    /// The controller reported one or more errors for a command sequence.
    #[error("Robot error: {0}")]
    Robot(String),

    #[error("Timed out waiting for the robot")]
    Timeout,

    #[error("Robot link disconnected")]
    Disconnected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
