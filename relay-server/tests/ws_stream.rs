//! End-to-end WebSocket stream test: real server on an ephemeral port, real
//! WebSocket client, simulator behind the SDK boundary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::StreamExt;
use robot_link::SimCobot;
use tokio_tungstenite::connect_async;

use relay_server::api::{create_router, AppState};
use relay_server::broadcaster::StateBroadcaster;

/// Spawn the relay on 127.0.0.1:0 and return the bound port plus a handle to
/// the broadcaster for assertions.
async fn start_relay(period: Duration) -> Result<(u16, Arc<StateBroadcaster>)> {
    let broadcaster = Arc::new(StateBroadcaster::new(Arc::new(SimCobot::new()), period));
    tokio::spawn(broadcaster.clone().run());

    let state = AppState {
        broadcaster: broadcaster.clone(),
        allowed_origins: vec![],
        cors_disabled: true,
    };
    let router = create_router(state, "static");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok((port, broadcaster))
}

#[tokio::test]
async fn stream_delivers_schema_conformant_frames() -> Result<()> {
    let (port, broadcaster) = start_relay(Duration::from_millis(50)).await?;

    let url = format!("ws://127.0.0.1:{}/ws/data_stream", port);
    let (mut ws_stream, _) = connect_async(url.as_str()).await?;

    // First frame should arrive within a couple of broadcast periods.
    let frame = tokio::time::timeout(Duration::from_secs(2), ws_stream.next())
        .await?
        .expect("stream ended before first frame")?;
    assert!(frame.is_text());

    let value: serde_json::Value = serde_json::from_str(frame.to_text()?)?;
    let obj = value.as_object().unwrap();
    let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "is_freedrive_mode",
            "jnt_ang",
            "jnt_ref",
            "real_vs_simulation",
            "tcp_pos",
            "tcp_ref",
        ]
    );
    assert_eq!(obj["jnt_ang"].as_array().unwrap().len(), 6);
    assert_eq!(obj["real_vs_simulation"], "Sim");

    assert_eq!(broadcaster.subscriber_count().await, 1);

    // Disconnect: the subscriber set drains within a few cycles.
    drop(ws_stream);
    let mut drained = false;
    for _ in 0..50 {
        if broadcaster.subscriber_count().await == 0 {
            drained = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(drained, "subscriber was not removed after disconnect");

    Ok(())
}

#[tokio::test]
async fn two_clients_receive_independent_streams() -> Result<()> {
    let (port, broadcaster) = start_relay(Duration::from_millis(50)).await?;
    let url = format!("ws://127.0.0.1:{}/ws/data_stream", port);

    let (mut ws_a, _) = connect_async(url.as_str()).await?;
    let (mut ws_b, _) = connect_async(url.as_str()).await?;

    let frame_a = tokio::time::timeout(Duration::from_secs(2), ws_a.next())
        .await?
        .expect("client A got no frame")?;
    let frame_b = tokio::time::timeout(Duration::from_secs(2), ws_b.next())
        .await?
        .expect("client B got no frame")?;
    assert!(frame_a.is_text());
    assert!(frame_b.is_text());

    assert_eq!(broadcaster.subscriber_count().await, 2);

    // One client going away must not disturb the other.
    drop(ws_a);
    let frame = tokio::time::timeout(Duration::from_secs(2), ws_b.next())
        .await?
        .expect("surviving client stopped receiving")?;
    assert!(frame.is_text());

    Ok(())
}
