//! Application log.
//!
//! `LogContext` is the backend for the `log` facade: every record is written
//! as one timestamped line to an append-only log file and mirrored to stdout.
//! The context is created once in `main`, owned by the application for its
//! whole lifetime and flushed on shutdown.
//!
//! Line format:
//!
//! ```text
//! 2026-10-19 14:03:11.512 [INFO ] fontpeek::app: Loaded 312 font families
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// Where log lines go.
struct Sinks {
    file: Option<File>,
    stdout: bool,
}

/// Shared state behind the installed logger and the application's handle.
struct Inner {
    level: LevelFilter,
    sinks: Mutex<Sinks>,
}

impl Inner {
    fn write_line(&self, line: &str) {
        let mut sinks = self.sinks.lock();
        if let Some(ref mut file) = sinks.file {
            let _ = file.write_all(line.as_bytes());
        }
        if sinks.stdout {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(line.as_bytes());
        }
    }
}

/// Logger installed into the `log` facade.
struct Bridge(Arc<Inner>);

impl Log for Bridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.0.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.0.write_line(&format_line(record));
    }

    fn flush(&self) {
        let mut sinks = self.0.sinks.lock();
        if let Some(ref mut file) = sinks.file {
            let _ = file.flush();
        }
        let _ = std::io::stdout().flush();
    }
}

/// Owned handle to the application log.
pub struct LogContext {
    inner: Arc<Inner>,
    path: Option<PathBuf>,
}

impl LogContext {
    /// Open (append) the log file at `path` and install the context as the global logger.
    ///
    /// `LevelFilter::Off` installs nothing and creates no file. Failing to
    /// open the file is not fatal: logging continues on stdout only.
    pub fn init(path: &Path, level: LevelFilter) -> anyhow::Result<Self> {
        let context = Self::open(path, level, true);
        if level == LevelFilter::Off {
            return Ok(context);
        }

        log::set_boxed_logger(Box::new(Bridge(Arc::clone(&context.inner))))
            .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;
        log::set_max_level(level);

        context.write_banner();
        Ok(context)
    }

    /// Build a context without installing it (used by tests).
    fn open(path: &Path, level: LevelFilter, stdout: bool) -> Self {
        let file = if level == LevelFilter::Off {
            None
        } else {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                let _ = std::fs::create_dir_all(parent);
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => Some(f),
                Err(e) => {
                    eprintln!("fontpeek: cannot open log file {}: {e}", path.display());
                    None
                }
            }
        };

        let path = file.as_ref().map(|_| path.to_path_buf());
        Self {
            inner: Arc::new(Inner {
                level,
                sinks: Mutex::new(Sinks { file, stdout }),
            }),
            path,
        }
    }

    fn write_banner(&self) {
        self.inner.write_line(&format!(
            "{} [INFO ] fontpeek: session started (level={})\n",
            timestamp(),
            self.inner.level
        ));
    }

    /// Path of the log file, if one is open.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Active level filter.
    pub fn level(&self) -> LevelFilter {
        self.inner.level
    }

    /// Flush buffered output.
    pub fn flush(&self) {
        Bridge(Arc::clone(&self.inner)).flush();
    }
}

impl Drop for LogContext {
    fn drop(&mut self) {
        if self.inner.level != LevelFilter::Off {
            self.inner
                .write_line(&format!("{} [INFO ] fontpeek: session ended\n", timestamp()));
        }
        self.flush();
    }
}

/// Effective level: `--log-level`, then `RUST_LOG` (plain level names only),
/// then the configured level.
pub fn resolve_level(
    cli: Option<LevelFilter>,
    rust_log: Option<&str>,
    config: fontpeek_config::LogLevel,
) -> LevelFilter {
    if let Some(level) = cli {
        return level;
    }
    if let Some(level) = rust_log.and_then(fontpeek_config::LogLevel::from_name) {
        return level.to_level_filter();
    }
    config.to_level_filter()
}

fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.3f")
        .to_string()
}

fn format_line(record: &Record) -> String {
    format!(
        "{} [{:<5}] {}: {}\n",
        timestamp(),
        record.level(),
        record.target(),
        record.args()
    )
}
