//! DMA Transfer
//!
//! This module implements OAM DMA transfer for the Game Boy.
//! Writing XX to 0xFF46 copies 160 bytes from XX00-XX9F into OAM (0xFE00-0xFE9F).
//!
//! The copy completes inside the register write. Real hardware stalls the CPU
//! for [`DMA_DURATION_CYCLES`] while it runs; a host that wants that stall
//! has to apply it itself.

use crate::bus::MemoryBus;
use crate::common::{Byte, Word, OAM_SIZE};

/// T-cycles the transfer occupies on hardware (160 M-cycles)
pub const DMA_DURATION_CYCLES: u32 = 640;

/// DMA Transfer Controller
#[derive(Debug, Clone, Default)]
pub struct Dma {
    /// Source address high byte (last value written to 0xFF46)
    pub value: Byte,
    /// Completed transfers since power-on
    pub transfers: u32,
}

impl Dma {
    /// Create a new DMA controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Get source address for byte `offset` of the current transfer
    pub fn source_address(&self, offset: u8) -> Word {
        (self.value as Word) << 8 | offset as Word
    }

    /// Run a transfer
    ///
    /// Called when writing to 0xFF46
    pub fn transfer(&mut self, value: Byte, bus: &dyn MemoryBus, oam: &mut [Byte; OAM_SIZE]) {
        self.value = value;
        log::debug!(
            "DMA: 0x{:04X}-0x{:04X} -> OAM",
            self.source_address(0),
            self.source_address(OAM_SIZE as u8 - 1)
        );

        for (offset, byte) in oam.iter_mut().enumerate() {
            *byte = bus.read(self.source_address(offset as u8));
        }
        self.transfers += 1;
    }
}
