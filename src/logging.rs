// src/logging.rs

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::path::PathBuf;
use time::macros::format_description;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Number of trailing log lines shown in the log panel.
pub const LOG_TAIL_LINES: usize = 200;

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "vanguard-rs", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> PathBuf {
    if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn log_path() -> PathBuf {
    get_data_dir().join(LOG_FILE.clone())
}

/// Initializes file-based logging using the tracing subscriber.
///
/// The terminal belongs to the UI, so everything goes to the log file. Lines
/// start with a local `YYYY-MM-DD HH:MM:SS` stamp, which the log panel relies on.
pub fn initialize_logging() -> Result<()> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)?;
    let log_file = std::fs::File::create(log_path())?;

    let file_log_level = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV.clone()))
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));

    let timer = LocalTime::new(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"));

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_timer(timer)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(file_log_level));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

/// Reads the last `max_lines` lines of the log file. A missing file yields no lines.
pub fn read_log_tail(max_lines: usize) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(log_path()) else {
        return Vec::new();
    };
    tail(&content, max_lines)
}

fn tail(content: &str, max_lines: usize) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].iter().map(|l| l.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\nc\n", 2), vec!["b", "c"]);
        assert_eq!(tail("a\n", 5), vec!["a"]);
        assert!(tail("", 5).is_empty());
    }

    #[test]
    fn test_env_names_follow_crate_name() {
        assert_eq!(*LOG_ENV, "VANGUARD_MAIL_LOGLEVEL");
        assert_eq!(*LOG_FILE, "vanguard-mail.log");
    }
}
