//! PPU Module
//!
//! This module implements the Pixel Processing Unit (PPU) for the Game Boy:
//! VRAM/OAM ownership and access arbitration, the per-instruction `step`
//! that drives the mode state machine, and dispatch of its side effects to
//! the renderers, the frame observer and the CPU.

pub mod background;
pub mod modes;
pub mod sprites;

use crate::bus::MemoryBus;
use crate::common::{bit, Byte, Word};
use crate::common::{OAM_END, OAM_SIZE, OAM_START, REG_DMA, VRAM_END, VRAM_SIZE, VRAM_START};
use crate::config::{ClockPolicy, PpuConfig};
use crate::dma::Dma;
use crate::frame::{FrameBuffer, FrameObserver};
use crate::interrupts::InterruptRequester;
use crate::lcd::{Lcd, PpuMode};
use modes::Effect;

/// Number of entries in OAM
pub const OAM_ENTRIES: usize = 40;

/// OAM Entry (sprite attributes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OamEntry {
    /// Y position (plus 16)
    pub y: Byte,
    /// X position (plus 8)
    pub x: Byte,
    /// Tile index
    pub tile: Byte,
    /// Flags (priority, flip, palette)
    pub flags: Byte,
}

impl OamEntry {
    /// DMG palette number (bit 4)
    pub fn palette_number(&self) -> bool {
        bit(self.flags, 4)
    }

    /// X flip (bit 5)
    pub fn x_flip(&self) -> bool {
        bit(self.flags, 5)
    }

    /// Y flip (bit 6)
    pub fn y_flip(&self) -> bool {
        bit(self.flags, 6)
    }

    /// BG over OBJ priority (bit 7)
    pub fn bg_priority(&self) -> bool {
        bit(self.flags, 7)
    }
}

/// Pixel Processing Unit
pub struct Ppu {
    /// LCD registers
    pub(crate) lcd: Lcd,
    /// Video RAM (8KB)
    vram: [Byte; VRAM_SIZE],
    /// Object Attribute Memory (40 sprites * 4 bytes)
    oam: [Byte; OAM_SIZE],
    dma: Dma,
    /// Cycles spent in the current mode
    mode_clock: u32,
    frame: FrameBuffer,
    frames_completed: u64,
    config: PpuConfig,

    interrupts: Option<Box<dyn InterruptRequester>>,
    memory: Option<Box<dyn MemoryBus>>,
    frame_observer: Option<Box<dyn FrameObserver>>,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Create a new PPU with the default configuration
    pub fn new() -> Self {
        Self::with_config(PpuConfig::default())
    }

    pub fn with_config(config: PpuConfig) -> Self {
        Self {
            lcd: Lcd::new(),
            vram: [0; VRAM_SIZE],
            oam: [0; OAM_SIZE],
            dma: Dma::new(),
            mode_clock: 0,
            frame: FrameBuffer::new(),
            frames_completed: 0,
            config,
            interrupts: None,
            memory: None,
            frame_observer: None,
        }
    }

    /// Return to the power-on state. Configuration and collaborators are kept.
    pub fn reset(&mut self) {
        self.lcd = Lcd::new();
        self.vram.fill(0);
        self.oam.fill(0);
        self.dma = Dma::new();
        self.mode_clock = 0;
        self.frame.fill(0);
        self.frames_completed = 0;
    }

    /// Load the register state the boot ROM leaves behind
    pub fn pre_boot(&mut self) {
        self.lcd.pre_boot();
    }

    pub fn config(&self) -> &PpuConfig {
        &self.config
    }

    /// Read-only view of the LCD registers; writes go through `write_byte`
    pub fn lcd(&self) -> &Lcd {
        &self.lcd
    }

    // ========== Collaborators ==========

    /// Attach the receiver of VBlank and LCD STAT requests
    pub fn set_interrupt_requester(&mut self, requester: impl InterruptRequester + 'static) {
        self.interrupts = Some(Box::new(requester));
    }

    /// Attach the memory DMA copies from
    pub fn set_memory_bus(&mut self, bus: impl MemoryBus + 'static) {
        self.memory = Some(Box::new(bus));
    }

    /// Attach the observer told about each finished frame
    pub fn set_frame_observer(&mut self, observer: impl FrameObserver + 'static) {
        self.frame_observer = Some(Box::new(observer));
    }

    // ========== State ==========

    pub fn mode(&self) -> PpuMode {
        self.lcd.mode()
    }

    pub fn mode_clock(&self) -> u32 {
        self.mode_clock
    }

    pub fn ly(&self) -> Byte {
        self.lcd.ly
    }

    /// The framebuffer. Rendering overwrites it in place as the next frame runs.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Frames completed since power-on
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// Get OAM entry at index
    pub fn oam_entry(&self, index: usize) -> OamEntry {
        if index >= OAM_ENTRIES {
            return OamEntry::default();
        }
        let offset = index * 4;
        OamEntry {
            y: self.oam[offset],
            x: self.oam[offset + 1],
            tile: self.oam[offset + 2],
            flags: self.oam[offset + 3],
        }
    }

    // ========== Timing ==========

    /// Advance the PPU by `cycles` T-cycles.
    ///
    /// Called by the host after every CPU instruction.
    pub fn step(&mut self, cycles: u32) {
        if !self.lcd.lcd_enabled() {
            modes::disable(&mut self.lcd, &mut self.mode_clock);
            return;
        }

        self.mode_clock = self.mode_clock.saturating_add(cycles);

        while let Some(effects) = modes::transition(&mut self.lcd, &mut self.mode_clock) {
            for effect in effects {
                self.apply(effect);
            }
            if self.config.clock_policy == ClockPolicy::SingleThreshold {
                break;
            }
        }

        if let Some(effect) = modes::coincidence(&mut self.lcd) {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::RenderScanline => self.render_scanline(),
            Effect::FrameComplete => {
                self.frames_completed += 1;
                if let Some(observer) = self.frame_observer.as_mut() {
                    observer.frame_complete();
                }
            }
            Effect::Interrupt(interrupt) => {
                if let Some(cpu) = self.interrupts.as_mut() {
                    cpu.request_interrupt(interrupt);
                }
            }
        }
    }

    /// Write the line in LY into the framebuffer
    fn render_scanline(&mut self) {
        self.render_background_line();

        // The window layer is not drawn; WY/WX are only stored.

        if self.lcd.sprites_enabled() {
            self.render_sprite_line();
        }
    }

    // ========== Memory Arbiter ==========

    fn vram_blocked(&self) -> bool {
        self.lcd.lcd_enabled() && self.lcd.mode() == PpuMode::VramTransfer
    }

    fn oam_blocked(&self) -> bool {
        self.lcd.lcd_enabled()
            && matches!(self.lcd.mode(), PpuMode::OamSearch | PpuMode::VramTransfer)
    }

    /// Read VRAM, OAM or a PPU register
    pub fn read_byte(&self, address: Word) -> Byte {
        match address {
            VRAM_START..=VRAM_END => {
                if self.vram_blocked() {
                    return 0x00;
                }
                self.vram[(address - VRAM_START) as usize]
            }
            OAM_START..=OAM_END => {
                if self.oam_blocked() {
                    return 0x00;
                }
                self.oam[(address - OAM_START) as usize]
            }
            REG_DMA => {
                log::warn!("PPU: cannot read from DMA register 0x{:04X}", address);
                0x00
            }
            _ => self.lcd.read(address),
        }
    }

    /// Write VRAM, OAM or a PPU register
    pub fn write_byte(&mut self, address: Word, value: Byte) {
        match address {
            VRAM_START..=VRAM_END => {
                if !self.vram_blocked() {
                    self.vram[(address - VRAM_START) as usize] = value;
                }
            }
            OAM_START..=OAM_END => {
                if !self.oam_blocked() {
                    self.oam[(address - OAM_START) as usize] = value;
                }
            }
            REG_DMA => match self.memory.as_deref() {
                Some(bus) => self.dma.transfer(value, bus, &mut self.oam),
                None => log::debug!("PPU: DMA 0x{:02X} ignored, no memory bus attached", value),
            },
            _ => self.lcd.write(address, value),
        }
    }

    /// Last DMA source page and the number of transfers run
    pub fn dma(&self) -> &Dma {
        &self.dma
    }
}
