//! Client-side mirror of the BlueZ object space
//!
//! The pieces fit together like this: a [`BluezClient`] bootstraps against
//! the service (introspect the root, pull the bulk managed-object snapshot),
//! mirrors everything into an [`ObjectRegistry`] of typed snapshots, and
//! spawns a dispatch task that consumes the transport's raw-signal queue.
//! Each signal replaces the affected object in the registry and fans a
//! [`ChangeEvent`] out to the subscriptions held in the [`WatchTable`].
//!
//! Subscriptions are keyed by exact path or `prefix*` pattern and receive
//! events on a bounded [`WatchStream`]; transport-level signal matches are
//! reference-counted so overlapping subscriptions share them.

pub mod client;
pub mod error;
pub mod event;
pub mod logging;
pub mod registry;
pub mod watch;

mod dispatch;

pub use client::BluezClient;
pub use error::{ClientError, Result};
pub use event::{ChangeEvent, WatchStream};
pub use registry::ObjectRegistry;
pub use watch::{WatchKey, WatchTable};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{BluezClient, ChangeEvent, ClientError, Result, WatchKey, WatchStream};
    pub use bluekit_api::prelude::*;
    pub use bluekit_bus::{BusTransport, ObjectPath, SignalKind};
}
