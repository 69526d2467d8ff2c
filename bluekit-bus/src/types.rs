//! Shared bus-level types and well-known D-Bus names

use std::collections::HashMap;

use crate::path::ObjectPath;
use crate::value::BusValue;

/// The ObjectManager interface provided by the bus daemon
pub const OBJECT_MANAGER: &str = "org.freedesktop.DBus.ObjectManager";
/// The Properties interface implemented by anything with properties
pub const PROPERTIES: &str = "org.freedesktop.DBus.Properties";
/// The Introspectable interface implemented by most objects
pub const INTROSPECTABLE: &str = "org.freedesktop.DBus.Introspectable";
/// Object path of the bus root
pub const ROOT_PATH: &str = "/";

/// Qualified name of the bulk snapshot method
pub const GET_MANAGED_OBJECTS: &str = "org.freedesktop.DBus.ObjectManager.GetManagedObjects";
/// Qualified name of the introspection method
pub const INTROSPECT: &str = "org.freedesktop.DBus.Introspectable.Introspect";

/// Signal member emitted when an object gains interfaces (appears)
pub const INTERFACES_ADDED: &str = "InterfacesAdded";
/// Signal member emitted when an object loses interfaces (disappears)
pub const INTERFACES_REMOVED: &str = "InterfacesRemoved";
/// Signal member emitted when cached properties change
pub const PROPERTIES_CHANGED: &str = "PropertiesChanged";

/// Property snapshot for a single interface
pub type PropertyMap = HashMap<String, BusValue>;

/// Full per-object payload: interface name to property snapshot
pub type InterfaceMap = HashMap<String, PropertyMap>;

/// A raw signal as delivered by the transport, before decoding
#[derive(Debug, Clone)]
pub struct RawSignal {
    /// Unique bus name of the emitting peer
    pub sender: String,
    /// Path of the object the signal concerns
    pub path: ObjectPath,
    /// Signal name; may be fully qualified or a bare member
    pub name: String,
    /// Loosely typed signal body
    pub body: Vec<BusValue>,
}

impl RawSignal {
    /// The trailing member of the signal name.
    ///
    /// Signals arrive either fully qualified
    /// ("org.freedesktop.DBus.ObjectManager.InterfacesAdded") or as a bare
    /// member ("InterfacesAdded"); matching always happens on the member.
    pub fn member(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// An (interface, signal) pair identifying one category of notification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalKind {
    pub interface: String,
    pub signal: String,
}

impl SignalKind {
    pub fn new(interface: impl Into<String>, signal: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            signal: signal.into(),
        }
    }

    /// Trailing member of the signal name
    pub fn member(&self) -> &str {
        self.signal.rsplit('.').next().unwrap_or(&self.signal)
    }

    pub fn interfaces_added() -> Self {
        Self::new(OBJECT_MANAGER, INTERFACES_ADDED)
    }

    pub fn interfaces_removed() -> Self {
        Self::new(OBJECT_MANAGER, INTERFACES_REMOVED)
    }

    pub fn properties_changed() -> Self {
        Self::new(PROPERTIES, PROPERTIES_CHANGED)
    }
}
