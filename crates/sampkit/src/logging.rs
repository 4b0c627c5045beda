use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

const MAX_LOG_SIZE: u64 = 1024 * 1024;

/// Initialize logging for a component.
///
/// `RUST_LOG` wins over the configured level. With `config.file` set, logs
/// also go to `<component>.log` in the log directory.
///
/// Returns a guard that must be kept alive for the duration of the program.
pub fn init_logging(component: &str, config: &LoggingConfig) -> io::Result<Option<WorkerGuard>> {
    let env_filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    if !config.file {
        tracing_subscriber::fmt().with_env_filter(env_filter()).init();
        return Ok(None);
    }

    let log_dir = match &config.directory {
        Some(dir) => dir.clone(),
        None => log_directory()?,
    };
    fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join(format!("{}.log", component));
    truncate_if_needed(&log_path)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(BufWriter::new(file));

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(io::stdout).with_ansi(true))
        .with(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!("Logging to file: {}", log_path.display());

    Ok(Some(guard))
}

fn log_directory() -> io::Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "sampkit")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Failed to find home directory"))?;
    Ok(dirs.data_dir().join("logs"))
}

fn truncate_if_needed(log_path: &Path) -> io::Result<()> {
    if log_path.exists() && fs::metadata(log_path)?.len() > MAX_LOG_SIZE {
        File::create(log_path)?.set_len(0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_oversized_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.log");
        fs::write(&path, vec![b'x'; (MAX_LOG_SIZE + 1) as usize]).unwrap();

        truncate_if_needed(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_keeps_small_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.log");
        fs::write(&path, b"hello").unwrap();

        truncate_if_needed(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 5);
    }
}
