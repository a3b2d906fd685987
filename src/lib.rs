//! Game Boy PPU Library
//!
//! A cycle-driven model of the Game Boy pixel processing unit: the mode
//! state machine stepped by the host CPU loop, VRAM/OAM access arbitration,
//! OAM DMA, and scanline rendering of the background and sprite layers.
//!
//! The CPU, the rest of the memory map and the display are collaborators
//! supplied by the host through the traits in [`interrupts`], [`bus`] and
//! [`frame`].

pub mod bus;
pub mod common;
pub mod config;
pub mod dma;
pub mod frame;
pub mod interrupts;
pub mod lcd;
pub mod ppu;

pub use config::PpuConfig;
pub use ppu::Ppu;
