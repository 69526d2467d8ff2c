use thiserror::Error;

/// Errors surfaced by a bus transport.
///
/// This is the full error vocabulary of the [`BusTransport`] contract: some
/// variants are only ever produced by a concrete connection layer, not by
/// anything in this workspace.
///
/// [`BusTransport`]: crate::transport::BusTransport
#[derive(Error, Debug)]
pub enum BusError {
    /// The underlying bus connection could not be established or was lost.
    /// Only constructed by concrete transport implementations.
    #[error("bus connection failed: {0}")]
    Connection(String),

    /// A remote method call failed
    #[error("method call {method} failed: {message}")]
    MethodCall { method: String, message: String },

    /// A remote property fetch failed
    #[error("property fetch {property} failed: {message}")]
    PropertyFetch { property: String, message: String },

    /// Introspection XML could not be parsed into a node tree
    #[error("failed to parse introspection XML: {0}")]
    IntrospectionXml(#[from] quick_xml::DeError),

    /// A match rule could not be added or removed
    #[error("match rule for {interface}.{signal} failed: {message}")]
    MatchRule {
        interface: String,
        signal: String,
        message: String,
    },

    /// The registered raw-signal queue is gone. Raised by concrete
    /// transports when delivery finds the receiver dropped.
    #[error("signal queue has been closed")]
    SignalQueueClosed,

    /// A reply did not have the expected wire shape. Raised by concrete
    /// transports while translating replies into [`BusValue`]s.
    ///
    /// [`BusValue`]: crate::value::BusValue
    #[error("unexpected reply from {method}")]
    UnexpectedReply { method: String },
}

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, BusError>;
