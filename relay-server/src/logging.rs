use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with console output and optional rolling file output.
///
/// Returns the appender worker guard when file logging is enabled; the
/// caller must keep it alive for the lifetime of the process or buffered
/// log lines are lost on shutdown.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    // Default to info level for all modules; can be overridden via RUST_LOG env var
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer());

    if !config.enabled {
        subscriber.init();
        return None;
    }

    use tracing_appender::rolling;

    if let Err(e) = std::fs::create_dir_all(&config.directory) {
        eprintln!("Failed to create log directory {}: {}", config.directory, e);
    }

    cleanup_old_logs(config);

    let file_appender = match config.rotation.as_str() {
        "hourly" => rolling::hourly(&config.directory, &config.file_prefix),
        "never" => rolling::never(&config.directory, &config.file_prefix),
        _ => rolling::daily(&config.directory, &config.file_prefix), // default to daily
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    subscriber
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                // Disable ANSI colors in file output
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

/// Delete the oldest log files once the retention limit is exceeded.
pub fn cleanup_old_logs(config: &LoggingConfig) {
    use std::fs;

    if config.max_files == 0 {
        return;
    }

    let log_dir = std::path::Path::new(&config.directory);
    if !log_dir.exists() {
        return;
    }

    let mut log_files: Vec<_> = match fs::read_dir(log_dir) {
        Ok(entries) => entries
            .filter_map(|entry_res| {
                let entry = entry_res.ok()?;
                let metadata = entry.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }
                let file_name = entry.file_name();
                let name = file_name.to_str()?;
                if !name.starts_with(&config.file_prefix) {
                    return None;
                }
                let modified = metadata.modified().ok()?;
                Some((entry.path(), modified))
            })
            .collect(),
        Err(e) => {
            eprintln!("Failed to read log directory: {}", e);
            return;
        }
    };

    // Newest first; everything past the retention count goes
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in log_files.iter().skip(config.max_files as usize) {
        if let Err(e) = fs::remove_file(path) {
            eprintln!("Failed to delete log file {:?}: {}", path, e);
        }
    }
}
