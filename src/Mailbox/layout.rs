use std::io;

use crate::Core::RegisterInterface;
use crate::Mailbox::Structs::MailboxSnapshot;

/// Cartridge RAM address the patched ROM reserves for the mailbox.
pub const MAILBOX_BASE: usize = 0x0202_C000;

/// Word offsets from the mailbox base. These are shared with the external
/// writer and must not move.
pub const SHARD_MIRROR: usize = 0x00;
pub const PENDING_FLAG: usize = 0x04;
pub const ITEM_ID: usize = 0x08;
pub const SENDER_ID: usize = 0x0C;
pub const DEBUG_HEARTBEAT: usize = 0x10;
pub const DEBUG_LAST_ITEM_ID: usize = 0x14;
pub const DEBUG_LAST_SENDER: usize = 0x18;

/// Bytes covered by the mailbox window.
pub const MAILBOX_SIZE: usize = 0x1C;

/// Value of the pending flag while a message waits.
pub const FLAG_PENDING: u32 = 1;
/// Value of the pending flag when the mailbox is empty.
pub const FLAG_IDLE: u32 = 0;

/// The mailbox as it sits in memory.
///
/// Nothing reads through this struct at runtime (all access goes through the
/// register interface at the offsets above); it pins the ABI so the offsets
/// can be checked against a real `#[repr(C)]` layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct MailboxLayout {
    pub shard_mirror: u32,
    pub pending_flag: u32,
    pub item_id: u32,
    pub sender_id: u32,
    pub debug_heartbeat: u32,
    pub debug_last_item_id: u32,
    pub debug_last_sender: u32,
}

/// Where the mailbox and the two game-state bytes live.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeviceMap {
    /// Base address of the mailbox window.
    pub mailbox: usize,
    /// Address of the `ShardFlags` byte.
    pub shard_flags: usize,
    /// Address of the `Lives` byte.
    pub lives: usize,
}

impl DeviceMap {
    /// Size of the shared-memory region described by [`DeviceMap::shared`].
    pub const SHARED_REGION_SIZE: usize = 0x40;

    pub const fn new(mailbox: usize, shard_flags: usize, lives: usize) -> Self {
        Self {
            mailbox,
            shard_flags,
            lives,
        }
    }

    /// Layout used for `/dev/shm` regions: the mailbox at the start, then the
    /// game-state bytes right after it.
    pub const fn shared() -> Self {
        Self::new(0x00, 0x20, 0x21)
    }

    /// Reject maps whose game-state bytes overlap the mailbox or each other,
    /// whose mailbox words are misaligned, or whose addresses run past the
    /// end of the address space.
    pub fn validate(&self) -> io::Result<()> {
        if self.mailbox % 4 != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("mailbox base {:#x} is not word aligned", self.mailbox),
            ));
        }

        let window = self.mailbox..span_end("mailbox", self.mailbox, MAILBOX_SIZE)?;
        for (name, addr) in [("shard_flags", self.shard_flags), ("lives", self.lives)] {
            span_end(name, addr, 1)?;
            if window.contains(&addr) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "{} at {:#x} falls inside the mailbox window {:#x}..{:#x}",
                        name, addr, window.start, window.end
                    ),
                ));
            }
        }

        if self.shard_flags == self.lives {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("shard_flags and lives share address {:#x}", self.lives),
            ));
        }

        Ok(())
    }

    /// One past the highest byte this map touches.
    pub fn extent(&self) -> io::Result<usize> {
        let mailbox = span_end("mailbox", self.mailbox, MAILBOX_SIZE)?;
        let shard_flags = span_end("shard_flags", self.shard_flags, 1)?;
        let lives = span_end("lives", self.lives, 1)?;
        Ok(mailbox.max(shard_flags).max(lives))
    }
}

/// End of `width` bytes at `addr`, or `InvalidInput` if that overflows.
fn span_end(name: &str, addr: usize, width: usize) -> io::Result<usize> {
    addr.checked_add(width).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} at {:#x} (+{}) overflows the address space", name, addr, width),
        )
    })
}

impl Default for DeviceMap {
    fn default() -> Self {
        Self::shared()
    }
}

/// Typed view of the mailbox fields over a register backend.
pub struct Mailbox<'a, R: RegisterInterface + ?Sized> {
    regs: &'a R,
    base: usize,
}

impl<'a, R: RegisterInterface + ?Sized> Mailbox<'a, R> {
    pub fn new(regs: &'a R, base: usize) -> Self {
        Self { regs, base }
    }

    #[inline]
    fn read(&self, offset: usize) -> u32 {
        self.regs.read32(self.base + offset)
    }

    #[inline]
    fn write(&self, offset: usize, value: u32) {
        self.regs.write32(self.base + offset, value)
    }

    /// Raw pending-flag word.
    pub fn pending_raw(&self) -> u32 {
        self.read(PENDING_FLAG)
    }

    /// Only [`FLAG_PENDING`] counts as a waiting message.
    pub fn is_pending(&self) -> bool {
        self.pending_raw() == FLAG_PENDING
    }

    pub fn set_pending(&self, pending: bool) {
        self.write(PENDING_FLAG, if pending { FLAG_PENDING } else { FLAG_IDLE });
    }

    pub fn item_id(&self) -> u32 {
        self.read(ITEM_ID)
    }

    pub fn set_item_id(&self, item_id: u32) {
        self.write(ITEM_ID, item_id)
    }

    pub fn sender_id(&self) -> u32 {
        self.read(SENDER_ID)
    }

    pub fn set_sender_id(&self, sender_id: u32) {
        self.write(SENDER_ID, sender_id)
    }

    pub fn heartbeat(&self) -> u32 {
        self.read(DEBUG_HEARTBEAT)
    }

    /// Bump the liveness counter, wrapping at `u32::MAX`.
    pub fn beat(&self) -> u32 {
        let next = self.heartbeat().wrapping_add(1);
        self.write(DEBUG_HEARTBEAT, next);
        next
    }

    pub fn last_item_id(&self) -> u32 {
        self.read(DEBUG_LAST_ITEM_ID)
    }

    pub fn last_sender(&self) -> u32 {
        self.read(DEBUG_LAST_SENDER)
    }

    /// Record the most recently consumed message for diagnostics.
    pub fn record_last(&self, item_id: u32, sender_id: u32) {
        self.write(DEBUG_LAST_ITEM_ID, item_id);
        self.write(DEBUG_LAST_SENDER, sender_id);
    }

    pub fn shard_mirror(&self) -> u32 {
        self.read(SHARD_MIRROR)
    }

    /// OR `bits` into the debug mirror. Best effort, never read back by the poller.
    pub fn mirror_shards(&self, bits: u32) {
        let mirror = self.shard_mirror() | bits;
        self.write(SHARD_MIRROR, mirror);
    }

    /// Zero every word, leaving the mailbox quiescent.
    pub fn reset(&self) {
        for offset in (0..MAILBOX_SIZE).step_by(4) {
            self.write(offset, 0);
        }
    }

    pub fn snapshot(&self) -> MailboxSnapshot {
        MailboxSnapshot {
            shard_mirror: self.shard_mirror(),
            pending_flag: self.pending_raw(),
            item_id: self.item_id(),
            sender_id: self.sender_id(),
            debug_heartbeat: self.heartbeat(),
            debug_last_item_id: self.last_item_id(),
            debug_last_sender: self.last_sender(),
        }
    }
}
