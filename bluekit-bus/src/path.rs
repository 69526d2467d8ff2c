//! Hierarchical object paths
//!
//! Paths are opaque, slash-delimited identifiers. There is no total order
//! worth relying on, but prefix relationships encode containment: an adapter
//! path is a prefix of its devices' paths, a device path is a prefix of its
//! GATT services, and so on.

use std::fmt;

/// A D-Bus style object path, immutable once constructed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this path starts with `prefix`
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Number of slash-separated components, counting the empty leading one.
    ///
    /// `/org/bluez/hci0` has four components; this is how adapter-level paths
    /// are recognized during fan-out.
    pub fn component_count(&self) -> usize {
        self.0.split('/').count()
    }

    /// Build the conventional device path under an adapter from a
    /// colon-delimited address: `/org/bluez/hci0` + `AA:BB:CC:DD:EE:FF`
    /// becomes `/org/bluez/hci0/dev_AA_BB_CC_DD_EE_FF`.
    pub fn child_for_address(parent: &ObjectPath, address: &str) -> ObjectPath {
        let element = address.replace(':', "_");
        ObjectPath(format!(
            "{}/dev_{}",
            parent.as_str().trim_end_matches('/'),
            element
        ))
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for ObjectPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl AsRef<str> for ObjectPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_count() {
        assert_eq!(ObjectPath::from("/org/bluez/hci0").component_count(), 4);
        assert_eq!(
            ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66/service0026")
                .component_count(),
            6
        );
    }

    #[test]
    fn test_prefix_containment() {
        let device = ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66");
        assert!(device.has_prefix("/org/bluez/hci0"));
        assert!(!device.has_prefix("/org/bluez/hci1"));
    }

    #[test]
    fn test_child_for_address() {
        let adapter = ObjectPath::from("/org/bluez/hci0");
        let device = ObjectPath::child_for_address(&adapter, "11:22:33:44:55:66");
        assert_eq!(device.as_str(), "/org/bluez/hci0/dev_11_22_33_44_55_66");
    }
}
