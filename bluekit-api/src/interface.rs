//! The BlueZ schema interfaces this crate models

use std::fmt;

/// The BlueZ interfaces with a typed local representation
///
/// Exactly one of these is the primary, type-determining interface for every
/// cached object: the one whose constructor built it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BluezInterface {
    /// org.bluez.Adapter1 - a local bluetooth controller
    Adapter,
    /// org.bluez.Device1 - a remote device seen by an adapter
    Device,
    /// org.bluez.AgentManager1 - pairing agent registration
    AgentManager,
    /// org.bluez.MediaTransport1 - an audio transport
    MediaTransport,
    /// org.bluez.GattService1 - a GATT service on a device
    GattService,
    /// org.bluez.GattCharacteristic1 - a characteristic under a service
    GattCharacteristic,
    /// org.bluez.GattDescriptor1 - a descriptor under a characteristic
    GattDescriptor,
}

impl BluezInterface {
    /// Every interface with a registered constructor
    pub const ALL: [BluezInterface; 7] = [
        BluezInterface::Adapter,
        BluezInterface::Device,
        BluezInterface::AgentManager,
        BluezInterface::MediaTransport,
        BluezInterface::GattService,
        BluezInterface::GattCharacteristic,
        BluezInterface::GattDescriptor,
    ];

    /// The dotted remote interface name
    pub fn name(&self) -> &'static str {
        match self {
            BluezInterface::Adapter => "org.bluez.Adapter1",
            BluezInterface::Device => "org.bluez.Device1",
            BluezInterface::AgentManager => "org.bluez.AgentManager1",
            BluezInterface::MediaTransport => "org.bluez.MediaTransport1",
            BluezInterface::GattService => "org.bluez.GattService1",
            BluezInterface::GattCharacteristic => "org.bluez.GattCharacteristic1",
            BluezInterface::GattDescriptor => "org.bluez.GattDescriptor1",
        }
    }

    /// Parse a dotted remote interface name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.name() == name)
    }
}

impl fmt::Display for BluezInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for iface in BluezInterface::ALL {
            assert_eq!(BluezInterface::from_name(iface.name()), Some(iface));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(BluezInterface::from_name("org.bluez.Battery1"), None);
        assert_eq!(BluezInterface::from_name(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(BluezInterface::Adapter.to_string(), "org.bluez.Adapter1");
    }
}
