use crate::Core::VolatileRegisters;
use crate::Mailbox::{DeviceMap, MailboxBuilder, Poller, Revision};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::ptr::NonNull;

// Error codes
pub const AP_SUCCESS: i32 = 0;
pub const AP_ERROR_NULL_POINTER: i32 = -1;
pub const AP_ERROR_INVALID_ARG: i32 = -2;
pub const AP_ERROR_NOT_INITIALIZED: i32 = -3;

lazy_static! {
    /// The process-wide mailbox device. Built once by `ap_mailbox_init` and
    /// kept until `ap_mailbox_shutdown`.
    static ref DEVICE: Mutex<Option<Poller<VolatileRegisters>>> = Mutex::new(None);
}

// -----------------------------------------------------------------------------
// Lifecycle
// -----------------------------------------------------------------------------

/// Initialise the process-wide mailbox device.
///
/// # Arguments
/// * `base` - Start of the memory window every address below is relative to.
/// * `len` - Size of that window in bytes.
/// * `mailbox` - Offset of the mailbox inside the window (word aligned).
/// * `shard_flags` - Offset of the `ShardFlags` byte.
/// * `lives` - Offset of the `Lives` byte.
/// * `base_offset` - Item-id base offset shared with the randomizer.
///
/// The mailbox is reset to idle. Calling this again replaces the device.
///
/// # Returns
/// * 0 on success, negative error code otherwise.
///
/// # Safety
/// `base..base + len` must stay mapped and writable until
/// `ap_mailbox_shutdown` is called or the process exits.
#[no_mangle]
pub unsafe extern "C" fn ap_mailbox_init(
    base: *mut u8,
    len: usize,
    mailbox: usize,
    shard_flags: usize,
    lives: usize,
    base_offset: u32,
) -> i32 {
    let Some(base) = NonNull::new(base) else {
        return AP_ERROR_NULL_POINTER;
    };

    let map = DeviceMap::new(mailbox, shard_flags, lives);
    if let Err(e) = map.validate() {
        log::error!("ap_mailbox_init: {}", e);
        return AP_ERROR_INVALID_ARG;
    }
    let fits = matches!(map.extent(), Ok(end) if end <= len);
    if !fits || base.as_ptr() as usize % 4 != 0 {
        log::error!("ap_mailbox_init: {:?} does not fit a {:#x}-byte window", map, len);
        return AP_ERROR_INVALID_ARG;
    }

    let regs = VolatileRegisters::new(base, len);
    match MailboxBuilder::new()
        .with_base_offset(base_offset)
        .with_revision(Revision::LivesAndShards)
        .with_device_map(map)
        .build(regs)
    {
        Ok(poller) => {
            *DEVICE.lock() = Some(poller);
            AP_SUCCESS
        }
        Err(e) => {
            log::error!("ap_mailbox_init: {}", e);
            AP_ERROR_INVALID_ARG
        }
    }
}

/// Drop the process-wide device. Safe to call when nothing is initialised.
#[no_mangle]
pub extern "C" fn ap_mailbox_shutdown() {
    DEVICE.lock().take();
}

// -----------------------------------------------------------------------------
// Polling
// -----------------------------------------------------------------------------

/// Poll the mailbox once. Call once per game-loop iteration.
///
/// # Returns
/// * 1 if a message was consumed.
/// * 0 if the mailbox was idle.
/// * `AP_ERROR_NOT_INITIALIZED` before `ap_mailbox_init`.
#[no_mangle]
pub extern "C" fn ap_poll_mailbox() -> i32 {
    match DEVICE.lock().as_mut() {
        Some(poller) => {
            if poller.poll().is_delivered() {
                1
            } else {
                0
            }
        }
        None => AP_ERROR_NOT_INITIALIZED,
    }
}
