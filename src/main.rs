//! PPU demo - headless entry point
//!
//! Draws one frame of a test scene (checkerboard background plus a few
//! sprites loaded through OAM DMA) and writes it as a binary PGM image.
//!
//! Usage: gbppu-demo [config.json] [out.pgm]

use std::cell::{Cell, RefCell};
use std::env;
use std::fs;
use std::process;
use std::rc::Rc;

use gbppu::bus::FlatMemory;
use gbppu::common::{REG_BGP, REG_DMA, REG_LCDC, REG_OBP0, REG_SCX, REG_SCY};
use gbppu::frame::{SCREEN_HEIGHT, SCREEN_WIDTH};
use gbppu::interrupts::{Interrupt, InterruptFlags};
use gbppu::{Ppu, PpuConfig};

/// Work RAM page the sprite table is staged in before DMA
const OAM_STAGING_PAGE: u8 = 0xC1;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => match PpuConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => PpuConfig::default(),
    };
    let out_path = args.get(2).map(String::as_str).unwrap_or("frame.pgm");

    let mut ppu = Ppu::with_config(config);
    let flags = Rc::new(RefCell::new(InterruptFlags::default()));
    let frame_ready = Rc::new(Cell::new(false));

    ppu.set_interrupt_requester(Rc::clone(&flags));
    ppu.set_memory_bus(staged_sprites());
    let signal = Rc::clone(&frame_ready);
    ppu.set_frame_observer(move || signal.set(true));

    ppu.pre_boot();
    load_scene(&mut ppu);
    ppu.write_byte(REG_LCDC, 0x93);

    // Skip the partial frame left over from boot, then draw a full one
    for _ in 0..2 {
        frame_ready.set(false);
        while !frame_ready.get() {
            ppu.step(4);
        }
    }
    log::info!(
        "Frame {} ready, IF=0x{:02X} (VBlank pending: {})",
        ppu.frames_completed(),
        flags.borrow().0,
        flags.borrow().is_set(Interrupt::VBlank)
    );

    let mut image = format!("P5\n{} {}\n255\n", SCREEN_WIDTH, SCREEN_HEIGHT).into_bytes();
    image.extend_from_slice(ppu.frame().as_slice());
    if let Err(e) = fs::write(out_path, image) {
        eprintln!("Failed to write {}: {}", out_path, e);
        process::exit(1);
    }
    println!("Wrote {}", out_path);
}

/// Memory holding a sprite table at `OAM_STAGING_PAGE`
fn staged_sprites() -> FlatMemory {
    let mut mem = FlatMemory::new();
    let mut table = Vec::with_capacity(160);
    for i in 0..40u8 {
        let (y, x) = if i < 4 {
            (16 + 60, 8 + 40 + i * 20)
        } else {
            (0, 0)
        };
        table.extend_from_slice(&[y, x, 1, (i & 1) << 5]);
    }
    mem.load((OAM_STAGING_PAGE as u16) << 8, &table);
    mem
}

/// Checkerboard background tile 0, arrow sprite tile 1, identity palettes
fn load_scene(ppu: &mut Ppu) {
    for row in 0..8u16 {
        let checker = if row < 4 { 0xF0 } else { 0x0F };
        ppu.write_byte(0x8000 + row * 2, checker);
        ppu.write_byte(0x8000 + row * 2 + 1, 0x00);

        let arrow = 0xFFu8 << (7 - row);
        ppu.write_byte(0x8010 + row * 2, arrow);
        ppu.write_byte(0x8010 + row * 2 + 1, arrow);
    }

    ppu.write_byte(REG_BGP, 0b11_10_01_00);
    ppu.write_byte(REG_OBP0, 0b11_10_01_00);
    ppu.write_byte(REG_SCX, 4);
    ppu.write_byte(REG_SCY, 4);
    ppu.write_byte(REG_DMA, OAM_STAGING_PAGE);
}
