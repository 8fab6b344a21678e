use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use axum::Router;
use robot_link::{CobotData, SimCobot};
use tracing_appender::non_blocking::WorkerGuard;

use crate::api::{create_router, AppState};
use crate::broadcaster::StateBroadcaster;
use crate::config::{Config, RobotMode};
use crate::logging;

pub struct Application {
    pub router: Router,
    pub bind_address: String,
    pub socket_addr: SocketAddr,
    pub broadcaster: Arc<StateBroadcaster>,
    // Keeps the file-logging worker alive for the process lifetime.
    _log_guard: Option<WorkerGuard>,
}

pub async fn setup() -> Result<Application> {
    // Determine config directory
    let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_string_lossy().into_owned()))
            .unwrap_or_else(|| ".".to_string())
    });
    let config_base = format!("{}/config", config_dir);

    // Load configuration, falling back to defaults when no file is present
    let config = match Config::from_file(&config_base) {
        Ok(cfg) => {
            eprintln!("Configuration loaded successfully from {}", config_base);
            cfg
        }
        Err(e) => {
            eprintln!("Failed to load configuration: {}, using defaults", e);
            Config::default()
        }
    };

    let log_guard = logging::init(&config.logging);

    tracing::info!("Starting cobot relay server...");
    if config.logging.enabled {
        tracing::info!(
            "File logging enabled: directory={}, prefix={}, rotation={}",
            config.logging.directory,
            config.logging.file_prefix,
            config.logging.rotation
        );
    }

    // Select the robot backend behind the SDK boundary
    let data_source: Arc<dyn CobotData> = match config.robot.mode {
        RobotMode::Sim => Arc::new(SimCobot::with_endpoint(
            &config.robot.address,
            config.robot.port,
        )),
        RobotMode::Real => bail!(
            "robot.mode = \"real\" requires a hardware-backed robot link; \
             this build only ships the simulator backend"
        ),
    };

    let broadcaster = Arc::new(StateBroadcaster::new(
        data_source,
        Duration::from_millis(config.broadcast.interval_ms),
    ));
    tokio::spawn(broadcaster.clone().run());
    tracing::info!(
        "State broadcaster started: period {}ms, robot {}:{} ({:?})",
        config.broadcast.interval_ms,
        config.robot.address,
        config.robot.port,
        config.robot.mode
    );

    let state = AppState {
        broadcaster: broadcaster.clone(),
        allowed_origins: config.cors.additional_origins.clone(),
        cors_disabled: config.cors.disable,
    };

    // Frontend assets live next to the config directory
    let static_dir = PathBuf::from(&config_dir).join("static");
    let router = create_router(state, static_dir);

    let bind_address = config.server_address();
    let socket_addr: SocketAddr = bind_address
        .parse()
        .with_context(|| format!("Invalid server address: {}", bind_address))?;

    Ok(Application {
        router,
        bind_address,
        socket_addr,
        broadcaster,
        _log_guard: log_guard,
    })
}
