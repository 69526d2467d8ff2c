use std::ops::Deref;
use std::sync::Arc;

use bluekit_bus::{BusTransport, InterfaceMap, ObjectPath};

use crate::base::BaseObject;
use crate::error::Result;
use crate::interface::BluezInterface;

/// The pairing agent manager (org.bluez.AgentManager1)
#[derive(Clone, Debug)]
pub struct AgentManager {
    base: BaseObject,
}

impl AgentManager {
    pub(crate) fn new(
        bus: Arc<dyn BusTransport>,
        path: ObjectPath,
        data: &InterfaceMap,
    ) -> Result<Self> {
        Ok(Self {
            base: BaseObject::new(bus, path, BluezInterface::AgentManager, data)?,
        })
    }
}

impl Deref for AgentManager {
    type Target = BaseObject;

    fn deref(&self) -> &BaseObject {
        &self.base
    }
}
