//! Command-line interface for fontpeek.
//!
//! Launch options override the values loaded from the configuration file.

use std::path::PathBuf;

use clap::Parser;
use fontpeek_config::Config;

/// fontpeek - preview a sample text in every installed font
#[derive(Parser, Debug)]
#[command(name = "fontpeek")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Text to render in every font
    #[arg(long, value_name = "TEXT")]
    pub sample_text: Option<String>,

    /// Preview size in points (clamped to 6..=96)
    #[arg(long, value_name = "POINTS")]
    pub size: Option<u32>,

    /// Also register every font in this folder at startup
    #[arg(long, value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,

    /// Write the log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeOptions {
    pub sample_text: Option<String>,
    pub size: Option<u32>,
    /// Folder loaded after the system fonts
    pub folder: Option<PathBuf>,
    /// Explicit config file; a missing file is a startup error
    pub config_path: Option<PathBuf>,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
    pub log_file: Option<PathBuf>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            sample_text: cli.sample_text,
            size: cli.size,
            folder: cli.folder,
            config_path: cli.config,
            log_level: cli.log_level.map(|l| l.to_level_filter()),
            log_file: cli.log_file,
        }
    }
}

impl RuntimeOptions {
    /// Override config values with the ones given on the command line.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref text) = self.sample_text {
            config.sample_text = text.clone();
        }
        if let Some(size) = self.size {
            config.font_size = fontpeek_config::config::clamp_font_size(size);
        }
        if let Some(ref path) = self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}

/// Parse the process arguments.
///
/// `--help`, `--version` and usage errors exit here, before anything else starts.
pub fn process_cli() -> RuntimeOptions {
    Cli::parse().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RuntimeOptions {
        let mut argv = vec!["fontpeek"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into()
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(parse(&[]), RuntimeOptions::default());
    }

    #[test]
    fn test_all_arguments() {
        let options = parse(&[
            "--sample-text",
            "Sphinx of black quartz",
            "--size",
            "30",
            "--folder",
            "/fonts",
            "--config",
            "/etc/fontpeek.yaml",
            "--log-level",
            "debug",
            "--log-file",
            "/tmp/fp.log",
        ]);
        assert_eq!(options.sample_text.as_deref(), Some("Sphinx of black quartz"));
        assert_eq!(options.size, Some(30));
        assert_eq!(options.folder, Some(PathBuf::from("/fonts")));
        assert_eq!(options.config_path, Some(PathBuf::from("/etc/fontpeek.yaml")));
        assert_eq!(options.log_level, Some(log::LevelFilter::Debug));
        assert_eq!(options.log_file, Some(PathBuf::from("/tmp/fp.log")));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["fontpeek", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_apply_clamps_size() {
        let mut config = Config::default();
        let options = RuntimeOptions {
            size: Some(500),
            sample_text: Some("abc".to_string()),
            ..RuntimeOptions::default()
        };
        options.apply_to(&mut config);
        assert_eq!(config.font_size, 96);
        assert_eq!(config.sample_text, "abc");
    }
}
