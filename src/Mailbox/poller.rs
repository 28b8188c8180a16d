// src/Mailbox/poller.rs

use crate::Core::RegisterInterface;
use crate::Mailbox::effects::{Effect, ItemTable};
use crate::Mailbox::layout::{DeviceMap, Mailbox, FLAG_IDLE, FLAG_PENDING};

/// What a single [`Poller::poll`] call did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// No message was waiting.
    Idle,
    /// One message was consumed and acknowledged. `effect` is `None` when the
    /// item id was not recognised.
    Delivered {
        item_id: u32,
        sender_id: u32,
        effect: Option<Effect>,
    },
}

impl PollOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PollOutcome::Delivered { .. })
    }
}

/// Drains the mailbox, at most one message per call.
///
/// The poller is the only clearer of the pending flag. The writer must fill
/// `ItemID`/`SenderID` before raising the flag and must not touch either field
/// again until it sees the flag cleared; writes that break this ordering are
/// outside the protocol and cannot be detected here.
pub struct Poller<R: RegisterInterface> {
    regs: R,
    map: DeviceMap,
    items: ItemTable,
}

impl<R: RegisterInterface> Poller<R> {
    /// Wrap an already-initialised mailbox. Use
    /// [`MailboxBuilder`](crate::Mailbox::MailboxBuilder) to reset it first.
    pub fn new(regs: R, map: DeviceMap, items: ItemTable) -> Self {
        Self { regs, map, items }
    }

    /// Run one polling cycle: heartbeat, check, ingest, dispatch, acknowledge.
    pub fn poll(&mut self) -> PollOutcome {
        let mailbox = Mailbox::new(&self.regs, self.map.mailbox);

        let beat = mailbox.beat();
        log::trace!("mailbox heartbeat {}", beat);

        let flag = mailbox.pending_raw();
        if flag != FLAG_PENDING {
            if flag != FLAG_IDLE {
                // Not a message: clear it without dispatch so the writer can resume.
                log::warn!("clearing unexpected pending flag value {:#x}", flag);
                mailbox.set_pending(false);
            }
            return PollOutcome::Idle;
        }

        let item_id = mailbox.item_id();
        let sender_id = mailbox.sender_id();
        mailbox.record_last(item_id, sender_id);

        let effect = self.items.apply(&self.regs, &self.map, item_id);
        if effect.is_none() {
            log::debug!("ignoring unknown item {} from sender {}", item_id, sender_id);
        }

        mailbox.set_pending(false);

        PollOutcome::Delivered {
            item_id,
            sender_id,
            effect,
        }
    }

    pub fn mailbox(&self) -> Mailbox<'_, R> {
        Mailbox::new(&self.regs, self.map.mailbox)
    }

    pub fn lives(&self) -> u8 {
        self.regs.read8(self.map.lives)
    }

    pub fn shard_flags(&self) -> u8 {
        self.regs.read8(self.map.shard_flags)
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn device_map(&self) -> &DeviceMap {
        &self.map
    }

    pub fn items(&self) -> &ItemTable {
        &self.items
    }

    /// Give back the register backend.
    pub fn into_registers(self) -> R {
        self.regs
    }
}
