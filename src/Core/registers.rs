// Register access for the mailbox and game-state bytes.
// Every backend goes straight to storage: no caching, no batching.

use std::ptr::{self, NonNull};
use std::sync::Arc;

use parking_lot::Mutex;

use super::SharedMemory::SharedRegion;

/// Typed access to fixed addresses in a device's address space.
///
/// Addresses are byte offsets from the backend's base. Accesses are assumed
/// valid; an address outside the backing storage is a programming error.
pub trait RegisterInterface {
    fn read32(&self, addr: usize) -> u32;
    fn write32(&self, addr: usize, value: u32);
    fn read8(&self, addr: usize) -> u8;
    fn write8(&self, addr: usize, value: u8);
}

impl<R: RegisterInterface + ?Sized> RegisterInterface for &R {
    fn read32(&self, addr: usize) -> u32 {
        (**self).read32(addr)
    }

    fn write32(&self, addr: usize, value: u32) {
        (**self).write32(addr, value)
    }

    fn read8(&self, addr: usize) -> u8 {
        (**self).read8(addr)
    }

    fn write8(&self, addr: usize, value: u8) {
        (**self).write8(addr, value)
    }
}

impl<R: RegisterInterface + ?Sized> RegisterInterface for Arc<R> {
    fn read32(&self, addr: usize) -> u32 {
        (**self).read32(addr)
    }

    fn write32(&self, addr: usize, value: u32) {
        (**self).write32(addr, value)
    }

    fn read8(&self, addr: usize) -> u8 {
        (**self).read8(addr)
    }

    fn write8(&self, addr: usize, value: u8) {
        (**self).write8(addr, value)
    }
}

/// Volatile access rooted at a raw base pointer.
///
/// This is the backend used when the poller is linked into the game image and
/// the mailbox lives at a fixed RAM address.
pub struct VolatileRegisters {
    base: NonNull<u8>,
    len: usize,
}

impl VolatileRegisters {
    /// # Safety
    /// `base..base + len` must stay mapped, readable and writable for the
    /// lifetime of the returned value. Every access made through it must stay
    /// inside that window, `addr + width <= len` with a width of 4 for
    /// `read32`/`write32` and 1 for `read8`/`write8`, and every 32-bit address
    /// must be 4-byte aligned. Release builds do not check either; callers
    /// validate their addresses up front, as `DeviceMap::extent` does for
    /// the C ABI.
    pub unsafe fn new(base: NonNull<u8>, len: usize) -> Self {
        Self { base, len }
    }

    pub fn base(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn at(&self, addr: usize, width: usize) -> *mut u8 {
        debug_assert!(
            addr.checked_add(width).map_or(false, |end| end <= self.len),
            "register access at {addr:#x} (+{width}) outside {:#x}-byte window",
            self.len
        );
        unsafe { self.base.as_ptr().add(addr) }
    }
}

impl RegisterInterface for VolatileRegisters {
    fn read32(&self, addr: usize) -> u32 {
        unsafe { ptr::read_volatile(self.at(addr, 4) as *const u32) }
    }

    fn write32(&self, addr: usize, value: u32) {
        unsafe { ptr::write_volatile(self.at(addr, 4) as *mut u32, value) }
    }

    fn read8(&self, addr: usize) -> u8 {
        unsafe { ptr::read_volatile(self.at(addr, 1)) }
    }

    fn write8(&self, addr: usize, value: u8) {
        unsafe { ptr::write_volatile(self.at(addr, 1), value) }
    }
}

// The poller is the only in-process user; cross-process ordering is the
// single-writer convention on the pending flag.
unsafe impl Send for VolatileRegisters {}

/// Volatile access over a named shared-memory region, so an external process
/// can play the mailbox writer.
pub struct SharedRegisters {
    region: SharedRegion,
    regs: VolatileRegisters,
}

impl SharedRegisters {
    pub fn new(region: SharedRegion) -> Self {
        // mmap hands back page-aligned memory; the mapping lives as long as `region`.
        let regs = unsafe { VolatileRegisters::new(region.as_non_null(), region.size()) };
        Self { region, regs }
    }

    pub fn region(&self) -> &SharedRegion {
        &self.region
    }
}

impl RegisterInterface for SharedRegisters {
    fn read32(&self, addr: usize) -> u32 {
        self.regs.read32(addr)
    }

    fn write32(&self, addr: usize, value: u32) {
        self.regs.write32(addr, value)
    }

    fn read8(&self, addr: usize) -> u8 {
        self.regs.read8(addr)
    }

    fn write8(&self, addr: usize, value: u8) {
        self.regs.write8(addr, value)
    }
}

/// In-memory register file, little-endian words.
///
/// Used as a test double and by hosts that emulate the mailbox in process.
/// Wrap it in an `Arc` to hand the same storage to a poller and a courier.
pub struct MemoryRegisters {
    bytes: Mutex<Vec<u8>>,
}

impl MemoryRegisters {
    /// A zero-filled register file of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: Mutex::new(vec![0; size]),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.lock().len()
    }

    /// Copy of the whole backing store.
    pub fn dump(&self) -> Vec<u8> {
        self.bytes.lock().clone()
    }
}

impl RegisterInterface for MemoryRegisters {
    fn read32(&self, addr: usize) -> u32 {
        let bytes = self.bytes.lock();
        let mut word = [0u8; 4];
        word.copy_from_slice(&bytes[addr..addr + 4]);
        u32::from_le_bytes(word)
    }

    fn write32(&self, addr: usize, value: u32) {
        let mut bytes = self.bytes.lock();
        bytes[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn read8(&self, addr: usize) -> u8 {
        self.bytes.lock()[addr]
    }

    fn write8(&self, addr: usize, value: u8) {
        self.bytes.lock()[addr] = value;
    }
}
