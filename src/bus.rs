//! Memory Bus
//!
//! The PPU does not decode the CPU address space itself. The only access it
//! needs to memory outside VRAM/OAM is the DMA source read, made through the
//! [`MemoryBus`] trait implemented by the host's MMU.

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::{Byte, Word};

/// Memory bus trait for reading external memory
pub trait MemoryBus {
    /// Read a byte from the given address
    fn read(&self, address: Word) -> Byte;
}

impl<T: MemoryBus> MemoryBus for Rc<RefCell<T>> {
    fn read(&self, address: Word) -> Byte {
        self.borrow().read(address)
    }
}

/// Flat 64KB memory, handy as a DMA source in tests and tools
pub struct FlatMemory {
    data: Vec<Byte>,
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatMemory {
    /// Create a zero-filled 64KB memory
    pub fn new() -> Self {
        Self {
            data: vec![0; 0x10000],
        }
    }

    /// Write a byte
    pub fn write(&mut self, address: Word, value: Byte) {
        self.data[address as usize] = value;
    }

    /// Copy a block starting at `address`, truncated at the end of memory
    pub fn load(&mut self, address: Word, bytes: &[Byte]) {
        let start = address as usize;
        let end = (start + bytes.len()).min(self.data.len());
        self.data[start..end].copy_from_slice(&bytes[..end - start]);
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, address: Word) -> Byte {
        self.data[address as usize]
    }
}
