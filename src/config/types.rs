//! Configuration types and CLI options.
//!
//! `Opt` is the `structopt` surface used by the binary. `Config` is the library
//! configuration; it has no CLI dependency and can be built programmatically.

use std::str::FromStr;
use std::time::Duration;

use structopt::StructOpt;
use thiserror::Error;

use crate::config::constants::{
    DEFAULT_CONCURRENCY, DEFAULT_DNS_SERVER, DEFAULT_PORT, MAX_CONCURRENCY,
    TCP_CONNECT_TIMEOUT_MS, TLS_HANDSHAKE_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text report
    Text,
    /// Single JSON document
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Probe every address behind example.com on port 443, resolving via 8.8.8.8
/// cert_audit example.com
///
/// # Custom port and resolver
/// cert_audit --url https://example.com/login --port 8443 --dns 1.1.1.1
/// ```
#[derive(Debug, StructOpt)]
#[structopt(
    name = "cert_audit",
    about = "Lists the distinct TLS certificates served by every address behind a hostname."
)]
pub struct Opt {
    /// Target URL or hostname (positional form)
    #[structopt(name = "TARGET", required_unless = "url")]
    pub target: Option<String>,

    /// Target URL or hostname
    #[structopt(long, conflicts_with = "TARGET")]
    pub url: Option<String>,

    /// TLS port probed on every resolved address
    #[structopt(long, default_value = "443")]
    pub port: u16,

    /// DNS resolver address (ip or ip:port)
    #[structopt(long, default_value = "8.8.8.8")]
    pub dns: String,

    /// Maximum simultaneous handshakes
    #[structopt(long, default_value = "16")]
    pub concurrency: usize,

    /// TCP connect timeout in milliseconds
    #[structopt(long, default_value = "1000")]
    pub connect_timeout_ms: u64,

    /// Overall connect plus handshake deadline in seconds
    #[structopt(long, default_value = "6")]
    pub handshake_timeout_secs: u64,

    /// Optional deadline for the whole run in seconds
    #[structopt(long)]
    pub run_deadline_secs: Option<u64>,

    /// Report format: text|json
    #[structopt(long, default_value = "text")]
    pub format: ReportFormat,

    /// Log level: error|warn|info|debug|trace
    #[structopt(long, default_value = "warn")]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[structopt(long, default_value = "plain")]
    pub log_format: LogFormat,
}

/// Errors raised by [`Config::validate`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No target host or URL was supplied.
    #[error("a target URL or hostname is required")]
    MissingTarget,

    /// Port zero cannot be dialed.
    #[error("port must be between 1 and 65535")]
    InvalidPort,

    /// Concurrency outside `1..=MAX_CONCURRENCY`.
    #[error("concurrency must be between 1 and {max}, got {got}")]
    InvalidConcurrency {
        /// Requested value
        got: usize,
        /// Accepted maximum
        max: usize,
    },

    /// A timeout of zero would fail every probe.
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use cert_audit::Config;
///
/// let config = Config {
///     target: "example.com".to_string(),
///     concurrency: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Target URL or hostname
    pub target: String,

    /// TLS port probed on every address
    pub port: u16,

    /// DNS resolver address (ip or ip:port)
    pub dns_server: String,

    /// Maximum simultaneous handshakes
    pub concurrency: usize,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Overall connect plus handshake deadline
    pub handshake_timeout: Duration,

    /// Optional deadline for the whole run
    pub run_deadline: Option<Duration>,

    /// Report format
    pub format: ReportFormat,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: String::new(),
            port: DEFAULT_PORT,
            dns_server: DEFAULT_DNS_SERVER.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout: Duration::from_millis(TCP_CONNECT_TIMEOUT_MS),
            handshake_timeout: Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            run_deadline: None,
            format: ReportFormat::Text,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the values a run cannot recover from.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::MissingTarget);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::InvalidConcurrency {
                got: self.concurrency,
                max: MAX_CONCURRENCY,
            });
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("connect timeout"));
        }
        if self.handshake_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("handshake timeout"));
        }
        if matches!(self.run_deadline, Some(d) if d.is_zero()) {
            return Err(ConfigError::ZeroTimeout("run deadline"));
        }
        Ok(())
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            target: opt.url.or(opt.target).unwrap_or_default(),
            port: opt.port,
            dns_server: opt.dns,
            concurrency: opt.concurrency,
            connect_timeout: Duration::from_millis(opt.connect_timeout_ms),
            handshake_timeout: Duration::from_secs(opt.handshake_timeout_secs),
            run_deadline: opt.run_deadline_secs.map(Duration::from_secs),
            format: opt.format,
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}
