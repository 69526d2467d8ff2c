//! The transport contract
//!
//! Everything the object layer needs from a concrete bus connection, kept
//! thin on purpose: introspection and bulk state for bootstrap, method and
//! property calls for the typed wrappers, and coarse signal matching. Match
//! rules are interface+signal scoped, not path scoped - the bus does not
//! filter by path on the wire, so path scoping happens locally in the
//! dispatch layer.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::introspect::Node;
use crate::path::ObjectPath;
use crate::types::{InterfaceMap, RawSignal};
use crate::value::BusValue;

/// Async contract a concrete bus connection has to satisfy
#[async_trait]
pub trait BusTransport: Send + Sync {
    /// Fetch and parse the introspection document for one object
    async fn introspect(&self, destination: &str, path: &ObjectPath) -> Result<Node>;

    /// Fetch the full managed-object snapshot below `path`
    async fn managed_objects(
        &self,
        destination: &str,
        path: &ObjectPath,
    ) -> Result<HashMap<ObjectPath, InterfaceMap>>;

    /// Fetch a single remote property; `qualified_name` is
    /// "interface.Property"
    async fn get_property(
        &self,
        destination: &str,
        path: &ObjectPath,
        qualified_name: &str,
    ) -> Result<BusValue>;

    /// Call a remote method and return its reply
    async fn call_method(
        &self,
        destination: &str,
        path: &ObjectPath,
        method: &str,
        args: Vec<BusValue>,
    ) -> Result<BusValue>;

    /// Call a remote method without expecting a reply
    async fn call_method_no_reply(
        &self,
        destination: &str,
        path: &ObjectPath,
        method: &str,
        args: Vec<BusValue>,
    ) -> Result<()>;

    /// Register the single queue all matched raw signals are delivered to.
    /// The transport owns closing this queue.
    fn register_signal_queue(&self, queue: mpsc::Sender<RawSignal>);

    /// Begin delivery of one signal kind
    async fn add_match(&self, interface: &str, signal: &str) -> Result<()>;

    /// Stop delivery of one signal kind
    async fn remove_match(&self, interface: &str, signal: &str) -> Result<()>;
}
