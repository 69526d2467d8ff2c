use std::ops::Deref;
use std::sync::Arc;

use bluekit_bus::{BusTransport, InterfaceMap, ObjectPath};

use crate::base::BaseObject;
use crate::error::Result;
use crate::interface::BluezInterface;

/// An audio transport (org.bluez.MediaTransport1)
#[derive(Clone, Debug)]
pub struct MediaTransport {
    base: BaseObject,
}

impl MediaTransport {
    pub(crate) fn new(
        bus: Arc<dyn BusTransport>,
        path: ObjectPath,
        data: &InterfaceMap,
    ) -> Result<Self> {
        Ok(Self {
            base: BaseObject::new(bus, path, BluezInterface::MediaTransport, data)?,
        })
    }
}

impl Deref for MediaTransport {
    type Target = BaseObject;

    fn deref(&self) -> &BaseObject {
        &self.base
    }
}
