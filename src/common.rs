//! Common types and utilities for the PPU core
//!
//! This module defines type aliases matching Game Boy hardware specifications,
//! the memory-map constants the PPU answers to, and bit manipulation helpers.

/// 8-bit unsigned integer (Game Boy byte)
pub type Byte = u8;

/// 16-bit unsigned integer (Game Boy word)
pub type Word = u16;

/// Video RAM range (8KB)
pub const VRAM_START: Word = 0x8000;
pub const VRAM_END: Word = 0x9FFF;
pub const VRAM_SIZE: usize = 0x2000;

/// Object Attribute Memory range (40 sprites * 4 bytes)
pub const OAM_START: Word = 0xFE00;
pub const OAM_END: Word = 0xFE9F;
pub const OAM_SIZE: usize = 0xA0;

/// LCD registers
pub const REG_LCDC: Word = 0xFF40;
pub const REG_STAT: Word = 0xFF41;
pub const REG_SCY: Word = 0xFF42;
pub const REG_SCX: Word = 0xFF43;
pub const REG_LY: Word = 0xFF44;
pub const REG_LYC: Word = 0xFF45;
pub const REG_DMA: Word = 0xFF46;
pub const REG_BGP: Word = 0xFF47;
pub const REG_OBP0: Word = 0xFF48;
pub const REG_OBP1: Word = 0xFF49;
pub const REG_WY: Word = 0xFF4A;
pub const REG_WX: Word = 0xFF4B;

/// Check if a specific bit is set in a byte value
///
/// # Arguments
/// * `value` - The byte value to check
/// * `n` - The bit position (0-7)
#[inline]
pub fn bit(value: Byte, n: u8) -> bool {
    (value & (1 << n)) != 0
}

/// Set or clear a specific bit in a byte value
#[inline]
pub fn bit_set(value: &mut Byte, n: u8, on: bool) {
    if on {
        *value |= 1 << n;
    } else {
        *value &= !(1 << n);
    }
}

/// Combine bit `n` of two bitplane bytes into a 2-bit color index.
///
/// The low bit comes from `lo`, the high bit from `hi`.
#[inline]
pub fn color_index(lo: Byte, hi: Byte, n: u8) -> u8 {
    ((hi >> n) & 1) << 1 | ((lo >> n) & 1)
}
