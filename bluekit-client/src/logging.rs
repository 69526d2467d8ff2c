//! Diagnostics setup for binaries embedding the client
//!
//! The library crates only ever emit `tracing` events; whether a subscriber
//! exists is the embedding application's call, made here once at startup.
//! Level defaults come from the chosen verbosity and can be overridden with
//! an explicit filter in `BLUEKIT_LOG_LEVEL` or `RUST_LOG`.

use std::env;
use std::io;

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// How much diagnostic output the embedding application wants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// No subscriber installed; all events are discarded
    #[default]
    Silent,
    /// Compact single-line output at info and above
    Normal,
    /// Everything down to debug, with source locations
    Verbose,
}

impl Verbosity {
    /// Parse a mode string as found in `BLUEKIT_LOG_MODE`; anything
    /// unrecognized stays silent
    fn parse(raw: &str) -> Self {
        match raw {
            "development" => Verbosity::Normal,
            "debug" => Verbosity::Verbose,
            _ => Verbosity::Silent,
        }
    }

    fn default_directive(self) -> &'static str {
        match self {
            Verbosity::Silent => "off",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Install a global subscriber writing to stderr at `verbosity`.
///
/// Call once, before connecting a client. Silent verbosity installs nothing,
/// which keeps stdout/stderr clean for terminal UIs.
pub fn init(verbosity: Verbosity) -> Result<(), LoggingError> {
    if verbosity == Verbosity::Silent {
        return Ok(());
    }

    let filter = env::var("BLUEKIT_LOG_LEVEL")
        .or_else(|_| env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    let builder = fmt().with_env_filter(filter).with_writer(io::stderr);
    let installed = if verbosity == Verbosity::Verbose {
        builder
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .try_init()
    } else {
        builder.compact().with_target(false).try_init()
    };
    installed.map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))
}

/// Install a subscriber according to `BLUEKIT_LOG_MODE`
/// ("development", "debug", or unset/anything else for silent)
pub fn init_from_env() -> Result<(), LoggingError> {
    let verbosity = env::var("BLUEKIT_LOG_MODE")
        .map(|raw| Verbosity::parse(&raw))
        .unwrap_or_default();
    init(verbosity)
}
