use bluekit_bus::{BusError, ObjectPath};
use thiserror::Error;

/// Errors raised by the typed object layer
#[derive(Error, Debug)]
pub enum ApiError {
    /// The payload used to build an object lacked its primary interface data
    #[error("object at {path} has no data for interface {interface}")]
    MissingInterface { path: ObjectPath, interface: String },

    /// A cached property was requested that the snapshot does not contain
    #[error("property {0} not present in cached snapshot")]
    PropertyNotFound(String),

    /// A remote reply did not have the shape the wrapper expected
    #[error("unexpected reply shape from {method}")]
    UnexpectedReply { method: String },

    /// Transport failure, propagated unchanged
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Result type for typed object operations
pub type Result<T> = std::result::Result<T, ApiError>;
