pub mod SharedMemory;
pub mod registers;

pub use registers::{MemoryRegisters, RegisterInterface, SharedRegisters, VolatileRegisters};
pub use SharedMemory::SharedRegion;
