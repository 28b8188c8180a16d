use std::fmt;

use crate::Core::{MemoryRegisters, RegisterInterface, SharedRegisters, VolatileRegisters};
use crate::Mailbox::{Courier, Poller};

/// Debug function for Poller
///
/// Shows:
/// - Device map and item table
/// - A live snapshot of the mailbox words
/// - The two game-state bytes
pub fn debug_poller<R: RegisterInterface>(poller: &Poller<R>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Poller")
        .field("map", poller.device_map())
        .field("items", poller.items())
        .field("mailbox", &poller.mailbox().snapshot())
        .field("lives", &poller.lives())
        .field("shard_flags", &format_args!("{:#010b}", poller.shard_flags()))
        .finish()
}

/// Debug function for Courier
pub fn debug_courier<R: RegisterInterface>(courier: &Courier<R>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Courier")
        .field("queued", &courier.pending())
        .field("delivered", &courier.delivered())
        .field("mailbox_empty", &courier.mailbox_empty())
        .finish()
}

/// Debug function for VolatileRegisters
///
/// Shows the window without dereferencing it
pub fn debug_volatile_registers(regs: &VolatileRegisters, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("VolatileRegisters")
        .field("base", &format_args!("{:p}", regs.base()))
        .field("len", &format_args!("{:#x}", regs.len()))
        .finish()
}

pub fn debug_shared_registers(regs: &SharedRegisters, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SharedRegisters")
        .field("region", &regs.region().name())
        .field("size", &regs.region().size())
        .finish_non_exhaustive()
}

pub fn debug_memory_registers(regs: &MemoryRegisters, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MemoryRegisters")
        .field("size", &regs.size())
        .finish_non_exhaustive()
}
