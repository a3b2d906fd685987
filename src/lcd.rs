//! LCD Registers
//!
//! This module implements the register bank of the PPU.
//!
//! LCD Registers:
//! - LCDC (0xFF40): LCD Control
//! - STAT (0xFF41): LCD Status
//! - SCY (0xFF42): Scroll Y
//! - SCX (0xFF43): Scroll X
//! - LY (0xFF44): Current scanline (write resets to 0)
//! - LYC (0xFF45): LY Compare
//! - DMA (0xFF46): DMA Transfer (handled in dma.rs)
//! - BGP (0xFF47): Background Palette
//! - OBP0 (0xFF48): Object Palette 0
//! - OBP1 (0xFF49): Object Palette 1
//! - WY (0xFF4A): Window Y Position
//! - WX (0xFF4B): Window X Position (minus 7)
//!
//! Every register is stored as its raw byte; the named accessors below are
//! derived views over those bytes.

use crate::common::{bit, bit_set, Byte, Word};
use crate::common::{
    REG_BGP, REG_LCDC, REG_LY, REG_LYC, REG_OBP0, REG_OBP1, REG_SCX, REG_SCY, REG_STAT, REG_WX,
    REG_WY,
};

/// OAM search duration (mode 2)
pub const OAM_SEARCH_CYCLES: u32 = 80;
/// Pixel transfer duration (mode 3)
pub const VRAM_TRANSFER_CYCLES: u32 = 172;
/// HBlank duration (mode 0)
pub const HBLANK_CYCLES: u32 = 204;
/// Duration of one VBlank line (mode 1)
pub const VBLANK_LINE_CYCLES: u32 = 456;

/// T-cycles per scanline
pub const CYCLES_PER_LINE: u32 = OAM_SEARCH_CYCLES + VRAM_TRANSFER_CYCLES + HBLANK_CYCLES;
/// Scanlines per frame (144 visible + 10 VBlank)
pub const LINES_PER_FRAME: u8 = 154;
/// T-cycles per frame
pub const CYCLES_PER_FRAME: u32 = CYCLES_PER_LINE * LINES_PER_FRAME as u32;

/// PPU modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpuMode {
    HBlank = 0,
    VBlank = 1,
    OamSearch = 2,
    VramTransfer = 3,
}

impl From<u8> for PpuMode {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => PpuMode::HBlank,
            1 => PpuMode::VBlank,
            2 => PpuMode::OamSearch,
            3 => PpuMode::VramTransfer,
            _ => unreachable!(),
        }
    }
}

impl PpuMode {
    /// Number of T-cycles the mode lasts before the next transition
    pub fn threshold(self) -> u32 {
        match self {
            PpuMode::OamSearch => OAM_SEARCH_CYCLES,
            PpuMode::VramTransfer => VRAM_TRANSFER_CYCLES,
            PpuMode::HBlank => HBLANK_CYCLES,
            PpuMode::VBlank => VBLANK_LINE_CYCLES,
        }
    }
}

/// Where background tile bitmaps are fetched from (LCDC bit 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileData {
    /// 0x8000-0x8FFF, tile index is unsigned
    Unsigned8000,
    /// 0x8800-0x97FF, tile index is signed around 0x9000
    Signed9000,
}

impl TileData {
    /// Address of the first byte of tile `index`
    pub fn tile_address(self, index: Byte) -> Word {
        match self {
            TileData::Unsigned8000 => 0x8000 + index as Word * 16,
            TileData::Signed9000 => (0x9000i32 + (index as i8 as i32) * 16) as Word,
        }
    }
}

/// LCD register bank
#[derive(Debug, Clone, Default)]
pub struct Lcd {
    /// LCDC - LCD Control (0xFF40)
    pub lcdc: Byte,
    /// STAT - LCD Status (0xFF41)
    pub stat: Byte,
    /// SCY - Scroll Y (0xFF42)
    pub scy: Byte,
    /// SCX - Scroll X (0xFF43)
    pub scx: Byte,
    /// LY - Current scanline (0xFF44)
    pub ly: Byte,
    /// LYC - LY Compare (0xFF45)
    pub lyc: Byte,
    /// BGP - Background Palette (0xFF47)
    pub bgp: Byte,
    /// OBP0 - Object Palette 0 (0xFF48)
    pub obp0: Byte,
    /// OBP1 - Object Palette 1 (0xFF49)
    pub obp1: Byte,
    /// WY - Window Y Position (0xFF4A)
    pub wy: Byte,
    /// WX - Window X Position minus 7 (0xFF4B)
    pub wx: Byte,
}

impl Lcd {
    /// Create a register bank in the power-on state: display off, VBlank mode
    pub fn new() -> Self {
        let mut lcd = Self::default();
        lcd.set_mode(PpuMode::VBlank);
        lcd
    }

    /// Load the register values the boot ROM leaves behind
    pub fn pre_boot(&mut self) {
        self.ly = 0x91;
        self.scy = 0x00;
        self.scx = 0x00;
        self.lyc = 0x00;
        self.bgp = 0xFC;
        self.obp0 = 0xFF;
        self.obp1 = 0xFF;
        self.wy = 0x00;
        self.wx = 0x00;
    }

    /// Read LCD register
    pub fn read(&self, address: Word) -> Byte {
        match address {
            REG_LCDC => self.lcdc,
            REG_STAT => self.stat,
            REG_SCY => self.scy,
            REG_SCX => self.scx,
            REG_LY => self.ly,
            REG_LYC => self.lyc,
            REG_BGP => self.bgp,
            REG_OBP0 => self.obp0,
            REG_OBP1 => self.obp1,
            REG_WY => self.wy,
            REG_WX => self.wx,
            _ => {
                log::warn!("LCD: cannot read from address 0x{:04X}", address);
                0x00
            }
        }
    }

    /// Write LCD register
    pub fn write(&mut self, address: Word, value: Byte) {
        match address {
            REG_LCDC => self.lcdc = value,
            REG_STAT => {
                // Lower 3 bits are read-only (mode and LYC flag)
                self.stat = (self.stat & 0x07) | (value & 0xF8);
            }
            REG_SCY => self.scy = value,
            REG_SCX => self.scx = value,
            REG_LY => self.ly = 0,
            REG_LYC => self.lyc = value,
            REG_BGP => self.bgp = value,
            REG_OBP0 => self.obp0 = value,
            REG_OBP1 => self.obp1 = value,
            REG_WY => self.wy = value,
            REG_WX => self.wx = value,
            _ => log::warn!(
                "LCD: cannot write 0x{:02X} to address 0x{:04X}",
                value,
                address
            ),
        }
    }

    // ========== LCDC Bit Accessors ==========

    /// LCD Display Enable (bit 7)
    pub fn lcd_enabled(&self) -> bool {
        bit(self.lcdc, 7)
    }

    /// Window Tile Map Select (bit 6)
    /// false = 0x9800-0x9BFF, true = 0x9C00-0x9FFF
    pub fn window_tile_map(&self) -> Word {
        if bit(self.lcdc, 6) { 0x9C00 } else { 0x9800 }
    }

    /// Window Enable (bit 5)
    pub fn window_enabled(&self) -> bool {
        bit(self.lcdc, 5)
    }

    /// BG & Window Tile Data Select (bit 4)
    pub fn bg_tile_data(&self) -> TileData {
        if bit(self.lcdc, 4) {
            TileData::Unsigned8000
        } else {
            TileData::Signed9000
        }
    }

    /// BG Tile Map Select (bit 3)
    /// false = 0x9800-0x9BFF, true = 0x9C00-0x9FFF
    pub fn bg_tile_map(&self) -> Word {
        if bit(self.lcdc, 3) { 0x9C00 } else { 0x9800 }
    }

    /// Sprite Size (bit 2)
    /// false = 8x8, true = 8x16
    pub fn sprite_height(&self) -> u8 {
        if bit(self.lcdc, 2) { 16 } else { 8 }
    }

    /// Sprite Enable (bit 1)
    pub fn sprites_enabled(&self) -> bool {
        bit(self.lcdc, 1)
    }

    /// BG Display Enable (bit 0)
    pub fn bg_enabled(&self) -> bool {
        bit(self.lcdc, 0)
    }

    // ========== STAT Bit Accessors ==========

    /// Get current PPU mode (bits 0-1)
    pub fn mode(&self) -> PpuMode {
        PpuMode::from(self.stat & 0x03)
    }

    /// Set current PPU mode (bits 0-1)
    pub(crate) fn set_mode(&mut self, mode: PpuMode) {
        self.stat = (self.stat & 0xFC) | (mode as u8);
    }

    /// LYC=LY Coincidence Flag (bit 2)
    pub fn coincidence(&self) -> bool {
        bit(self.stat, 2)
    }

    /// Set LYC=LY Coincidence Flag (bit 2)
    pub(crate) fn set_coincidence(&mut self, value: bool) {
        bit_set(&mut self.stat, 2, value);
    }

    /// Mode 0 HBlank Interrupt Enable (bit 3)
    pub fn hblank_int_enabled(&self) -> bool {
        bit(self.stat, 3)
    }

    /// Mode 1 VBlank Interrupt Enable (bit 4)
    pub fn vblank_int_enabled(&self) -> bool {
        bit(self.stat, 4)
    }

    /// Mode 2 OAM Interrupt Enable (bit 5)
    pub fn oam_int_enabled(&self) -> bool {
        bit(self.stat, 5)
    }

    /// LYC=LY Coincidence Interrupt Enable (bit 6)
    pub fn lyc_int_enabled(&self) -> bool {
        bit(self.stat, 6)
    }

    // ========== Palette Helpers ==========

    /// Get palette slot for a color from the background palette
    pub fn bg_color(&self, color_id: u8) -> u8 {
        palette_slot(self.bgp, color_id)
    }

    /// Get palette slot for a color from sprite palette 0 or 1
    pub fn sprite_color(&self, palette_1: bool, color_id: u8) -> u8 {
        let palette = if palette_1 { self.obp1 } else { self.obp0 };
        palette_slot(palette, color_id)
    }
}

#[inline]
fn palette_slot(palette: Byte, color_id: u8) -> u8 {
    (palette >> ((color_id & 0x03) * 2)) & 0x03
}
