//! WebSocket test client for the state stream.
//!
//! Connects to the relay and prints incoming state frames; useful for
//! verifying that the broadcast endpoint is live.

use anyhow::Result;
use clap::Parser;
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;

#[derive(Parser, Debug)]
#[command(about = "Print frames from the relay's state stream")]
struct Cli {
    /// Relay server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Relay server port
    #[arg(long, default_value_t = 10101)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let url = format!("ws://{}:{}/ws/data_stream", cli.host, cli.port);
    println!("Connecting to {url}");

    let (mut ws_stream, _) = connect_async(url.as_str()).await?;
    while let Some(frame) = ws_stream.next().await {
        let frame = frame?;
        if frame.is_text() {
            println!("Received: {}", frame.to_text()?);
        }
    }

    println!("Stream closed by server");
    Ok(())
}
