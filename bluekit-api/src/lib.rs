//! Typed BlueZ object layer
//!
//! Turns the loosely typed per-object payloads coming off the bus into
//! strongly typed local representations. Every remote object is cached as a
//! [`BluezObject`]: a closed sum over the concrete variants, each of which
//! embeds the common [`BaseObject`] entity model and adds its own remote
//! operations (StartDiscovery on adapters, Connect on devices, ReadValue on
//! characteristics, and so on).
//!
//! Which variant gets built is decided by the [`registry`] module: a
//! process-wide table from remote interface name to constructor, populated
//! once behind an initialization barrier.

pub mod adapter;
pub mod agent_manager;
pub mod base;
pub mod consts;
pub mod device;
pub mod error;
pub mod gatt;
pub mod interface;
pub mod media_transport;
pub mod object;
pub mod registry;

pub use adapter::Adapter;
pub use agent_manager::AgentManager;
pub use base::BaseObject;
pub use consts::{BLUEZ_DEST, BLUEZ_ROOT_PATH};
pub use device::Device;
pub use error::{ApiError, Result};
pub use gatt::{GattCharacteristic, GattDescriptor, GattService};
pub use interface::BluezInterface;
pub use media_transport::MediaTransport;
pub use object::BluezObject;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Adapter, ApiError, BaseObject, BluezInterface, BluezObject, Device, GattCharacteristic,
        GattDescriptor, GattService, Result, BLUEZ_DEST, BLUEZ_ROOT_PATH,
    };
}
