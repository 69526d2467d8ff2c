//! Transport boundary for the bluekit SDK
//!
//! This crate defines the types that cross the process boundary to the D-Bus
//! daemon and the contract a concrete transport has to satisfy. Nothing in
//! here talks to a real bus: the [`BusTransport`] trait is implemented by a
//! connection layer (or by [`testing::MockBus`] in tests), and the rest of
//! the workspace only ever sees this in-process interface.
//!
//! The main pieces:
//!
//! - [`BusValue`] - dynamically typed values as they arrive off the wire
//! - [`ObjectPath`] - the hierarchical, slash-delimited object identifier
//! - [`RawSignal`] / [`SignalKind`] - asynchronous notifications and the
//!   (interface, signal) pairs used to match them
//! - [`Node`] - the minimal introspection model needed at bootstrap
//! - [`BusTransport`] - the async transport contract

pub mod error;
pub mod introspect;
pub mod path;
pub mod transport;
pub mod types;
pub mod value;

#[cfg(feature = "test-support")]
pub mod testing;

pub use error::{BusError, Result};
pub use introspect::{parse_node, Arg, Interface, Method, Node};
pub use path::ObjectPath;
pub use transport::BusTransport;
pub use types::{
    InterfaceMap, PropertyMap, RawSignal, SignalKind, GET_MANAGED_OBJECTS, INTERFACES_ADDED,
    INTERFACES_REMOVED, INTROSPECT, INTROSPECTABLE, OBJECT_MANAGER, PROPERTIES,
    PROPERTIES_CHANGED, ROOT_PATH,
};
pub use value::BusValue;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BusError, BusTransport, BusValue, InterfaceMap, Node, ObjectPath, PropertyMap, RawSignal,
        Result, SignalKind,
    };
}
