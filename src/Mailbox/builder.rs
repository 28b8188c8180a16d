use std::io;

use super::courier::Courier;
use super::effects::{ItemTable, Revision, BASE_OFFSET};
use super::layout::{DeviceMap, Mailbox};
use super::poller::Poller;
use crate::Core::{RegisterInterface, SharedRegion, SharedRegisters};

pub struct MailboxBuilder {
    base_offset: u32,
    revision: Revision,
    map: DeviceMap,
    region_name: String,
}

impl Default for MailboxBuilder {
    fn default() -> Self {
        Self {
            base_offset: BASE_OFFSET,
            revision: Revision::default(),
            map: DeviceMap::shared(),
            region_name: "ap_mailbox".to_string(), // /dev/shm/ap_mailbox
        }
    }
}

impl MailboxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_offset(mut self, base_offset: u32) -> Self {
        self.base_offset = base_offset;
        self
    }

    pub fn with_revision(mut self, revision: Revision) -> Self {
        self.revision = revision;
        self
    }

    pub fn with_device_map(mut self, map: DeviceMap) -> Self {
        self.map = map;
        self
    }

    pub fn with_region_name(mut self, name: impl Into<String>) -> Self {
        self.region_name = name.into();
        self
    }

    pub fn item_table(&self) -> ItemTable {
        ItemTable::new(self.base_offset, self.revision)
    }

    /// Build a poller over `regs`, resetting the mailbox to idle first.
    /// Game-state bytes are left untouched.
    pub fn build<R: RegisterInterface>(self, regs: R) -> io::Result<Poller<R>> {
        self.map.validate()?;
        Mailbox::new(&regs, self.map.mailbox).reset();
        Ok(Poller::new(regs, self.map, self.item_table()))
    }

    /// Create the named shared region and build a poller over it.
    pub fn build_shared(self) -> io::Result<Poller<SharedRegisters>> {
        self.map.validate()?;
        let size = self.region_size()?;
        let region = SharedRegion::create(&self.region_name, size)?;
        self.build(SharedRegisters::new(region))
    }

    /// Attach to an existing shared region as the external writer.
    pub fn attach_courier(self) -> io::Result<Courier<SharedRegisters>> {
        self.map.validate()?;
        let size = self.region_size()?;
        let region = SharedRegion::attach(&self.region_name, size)?;
        Ok(Courier::new(SharedRegisters::new(region), self.map.mailbox))
    }

    fn region_size(&self) -> io::Result<usize> {
        Ok(self.map.extent()?.max(DeviceMap::SHARED_REGION_SIZE))
    }
}
