use bluekit_bus::BusError;
use thiserror::Error;

/// Errors raised by the client core
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure, propagated unchanged to the caller
    #[error(transparent)]
    Bus(#[from] BusError),

    /// Typed object layer failure
    #[error(transparent)]
    Api(#[from] bluekit_api::ApiError),

    /// Unsubscribe on a watch-key that has no registered queue
    #[error("no watch registered for {0}")]
    WatchNotFound(String),

    /// Subscribe on a watch-key that already has a registered queue
    #[error("a watch already exists for {0}")]
    AlreadyWatched(String),

    /// Path lookup with an empty pattern
    #[error("search pattern is empty")]
    EmptyPattern,

    /// A signal body did not have the expected (path, interface map) shape
    #[error("undecodable signal body: {0}")]
    SignalDecode(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
