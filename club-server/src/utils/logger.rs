//! Logging Infrastructure
//!
//! Structured logging for development and production.
//! Features:
//! - Daily rotating application logs (deleted after the retention window)
//! - Audit logs (`audit` target, never deleted)
//! - Security logs (`security` target, never deleted)

use std::fs;
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

const AUDIT_TARGET: &str = "audit";
const SECURITY_TARGET: &str = "security";

/// Clean up application log files older than `retention_days`
///
/// Only `app/app.YYYY-MM-DD` files are considered; audit and security logs
/// are kept forever.
pub fn cleanup_old_logs(log_dir: &Path, retention_days: u64) -> anyhow::Result<usize> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(retention_days as i64);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // tracing-appender names daily files "<prefix>.YYYY-MM-DD"
        let Some(date_part) = name.strip_prefix("app.") else {
            continue;
        };
        if let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

/// File layer writing one log category into its own daily rotating directory
fn file_layer<S>(
    dir: PathBuf,
    prefix: &str,
    json_format: bool,
    filter: fn(&str) -> bool,
) -> anyhow::Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    fs::create_dir_all(&dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, prefix);
    let target_filter =
        tracing_subscriber::filter::filter_fn(move |meta| filter(meta.target()));

    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(appender));

    Ok(if json_format {
        layer.json().with_current_span(true).with_filter(target_filter).boxed()
    } else {
        layer.with_filter(target_filter).boxed()
    })
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"); `RUST_LOG` wins when set
/// * `json_format` - JSON lines for production, pretty for development
/// * `log_dir` - Optional directory for file logging
/// * `retention_days` - How long application logs are kept
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
    retention_days: u64,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init()?;
        return Ok(());
    };

    let log_dir = Path::new(dir);
    let layers = vec![
        console_layer,
        file_layer(log_dir.join("app"), "app", json_format, |t| {
            t != AUDIT_TARGET && t != SECURITY_TARGET
        })?,
        file_layer(log_dir.join(AUDIT_TARGET), AUDIT_TARGET, json_format, |t| {
            t == AUDIT_TARGET
        })?,
        file_layer(
            log_dir.join(SECURITY_TARGET),
            SECURITY_TARGET,
            json_format,
            |t| t == SECURITY_TARGET,
        )?,
    ];

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    tokio::spawn(periodic_cleanup(log_dir.to_path_buf(), retention_days));

    Ok(())
}

/// Periodic cleanup task - runs every hour
async fn periodic_cleanup(log_dir: PathBuf, retention_days: u64) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&log_dir, retention_days) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
        sleep(Duration::from_secs(3600)).await;
    }
}
