use std::fmt;

use super::{Courier, Poller};
use crate::Core::{MemoryRegisters, RegisterInterface, SharedRegisters, VolatileRegisters};

// Debug proxy implementations that call the standalone debug functions
impl<R: RegisterInterface> fmt::Debug for Poller<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_poller(self, f)
    }
}

impl<R: RegisterInterface> fmt::Debug for Courier<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_courier(self, f)
    }
}

impl fmt::Debug for VolatileRegisters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_volatile_registers(self, f)
    }
}

impl fmt::Debug for SharedRegisters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_shared_registers(self, f)
    }
}

impl fmt::Debug for MemoryRegisters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_memory_registers(self, f)
    }
}
