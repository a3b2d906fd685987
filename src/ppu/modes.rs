//! PPU Modes
//!
//! Mode transitions and timing, kept free of rendering and collaborators so
//! the state machine can be driven and inspected on its own.
//!
//! - OAM Search (mode 2): 80 T-cycles
//! - Pixel Transfer (mode 3): 172 T-cycles
//! - HBlank (mode 0): 204 T-cycles
//! - VBlank (mode 1): 10 lines of 456 T-cycles, LY 144-153

use crate::interrupts::Interrupt;
use crate::lcd::{Lcd, PpuMode, LINES_PER_FRAME, VBLANK_LINE_CYCLES};

/// First line of VBlank
pub const VBLANK_START_LINE: u8 = 144;

/// LY reported while the display is off
pub const DISPLAY_OFF_LINE: u8 = 153;

/// Side effect produced by a mode transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Draw the line in LY into the framebuffer
    RenderScanline,
    /// The framebuffer holds a finished frame
    FrameComplete,
    Interrupt(Interrupt),
}

/// Park the PPU as the hardware does with the LCD off.
pub fn disable(lcd: &mut Lcd, mode_clock: &mut u32) {
    lcd.ly = DISPLAY_OFF_LINE;
    *mode_clock = VBLANK_LINE_CYCLES;
    lcd.set_mode(PpuMode::VBlank);
}

/// Perform at most one transition out of the current mode.
///
/// Returns `None` when the mode clock has not reached the mode's threshold,
/// otherwise the effects of the transition in the order they must be applied.
pub fn transition(lcd: &mut Lcd, mode_clock: &mut u32) -> Option<Vec<Effect>> {
    let mode = lcd.mode();
    let threshold = mode.threshold();
    if *mode_clock < threshold {
        return None;
    }
    *mode_clock -= threshold;

    let mut effects = Vec::new();
    match mode {
        PpuMode::OamSearch => lcd.set_mode(PpuMode::VramTransfer),
        PpuMode::VramTransfer => {
            lcd.set_mode(PpuMode::HBlank);
            effects.push(Effect::RenderScanline);
            if lcd.hblank_int_enabled() {
                effects.push(Effect::Interrupt(Interrupt::LcdStat));
            }
        }
        PpuMode::HBlank => {
            lcd.ly = lcd.ly.wrapping_add(1);
            if lcd.ly >= VBLANK_START_LINE {
                lcd.set_mode(PpuMode::VBlank);
                effects.push(Effect::FrameComplete);
                effects.push(Effect::Interrupt(Interrupt::VBlank));
                if lcd.vblank_int_enabled() {
                    effects.push(Effect::Interrupt(Interrupt::LcdStat));
                }
            } else {
                lcd.set_mode(PpuMode::OamSearch);
            }
        }
        PpuMode::VBlank => {
            lcd.ly = lcd.ly.wrapping_add(1);
            if lcd.ly >= LINES_PER_FRAME {
                lcd.ly = 0;
                lcd.set_mode(PpuMode::OamSearch);
            }
        }
    }

    log::trace!("PPU: {:?} -> {:?} at LY {}", mode, lcd.mode(), lcd.ly);
    Some(effects)
}

/// Update the LY=LYC flag, requesting STAT if it matches and is enabled.
pub fn coincidence(lcd: &mut Lcd) -> Option<Effect> {
    let matched = lcd.ly == lcd.lyc;
    lcd.set_coincidence(matched);

    if matched && lcd.lyc_int_enabled() {
        Some(Effect::Interrupt(Interrupt::LcdStat))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lcd::{CYCLES_PER_FRAME, HBLANK_CYCLES, OAM_SEARCH_CYCLES, VRAM_TRANSFER_CYCLES};
    use proptest::prelude::*;

    fn enabled_lcd() -> Lcd {
        let mut lcd = Lcd::new();
        lcd.lcdc = 0x91;
        lcd.ly = 0;
        lcd.set_mode(PpuMode::OamSearch);
        lcd
    }

    /// One single-threshold step, collecting every effect
    fn step(lcd: &mut Lcd, clock: &mut u32, cycles: u32) -> Vec<Effect> {
        *clock += cycles;
        let mut effects = transition(lcd, clock).unwrap_or_default();
        effects.extend(coincidence(lcd));
        effects
    }

    #[test]
    fn test_disable_parks_in_vblank() {
        let mut lcd = enabled_lcd();
        lcd.ly = 42;
        let mut clock = 17;

        disable(&mut lcd, &mut clock);

        assert_eq!(lcd.ly, 153);
        assert_eq!(lcd.mode(), PpuMode::VBlank);
        assert_eq!(clock, VBLANK_LINE_CYCLES);
    }

    #[test]
    fn test_no_transition_below_threshold() {
        let mut lcd = enabled_lcd();
        let mut clock = OAM_SEARCH_CYCLES - 1;
        assert_eq!(transition(&mut lcd, &mut clock), None);
        assert_eq!(lcd.mode(), PpuMode::OamSearch);
        assert_eq!(clock, OAM_SEARCH_CYCLES - 1);
    }

    #[test]
    fn test_line_sequence() {
        let mut lcd = enabled_lcd();
        let mut clock = OAM_SEARCH_CYCLES + 3;

        assert_eq!(transition(&mut lcd, &mut clock), Some(vec![]));
        assert_eq!(lcd.mode(), PpuMode::VramTransfer);
        assert_eq!(clock, 3);

        clock += VRAM_TRANSFER_CYCLES;
        assert_eq!(
            transition(&mut lcd, &mut clock),
            Some(vec![Effect::RenderScanline])
        );
        assert_eq!(lcd.mode(), PpuMode::HBlank);

        clock += HBLANK_CYCLES;
        assert_eq!(transition(&mut lcd, &mut clock), Some(vec![]));
        assert_eq!(lcd.mode(), PpuMode::OamSearch);
        assert_eq!(lcd.ly, 1);
        assert_eq!(clock, 3);
    }

    #[test]
    fn test_hblank_stat_interrupt() {
        let mut lcd = enabled_lcd();
        lcd.stat |= 0x08;
        lcd.set_mode(PpuMode::VramTransfer);
        let mut clock = VRAM_TRANSFER_CYCLES;

        assert_eq!(
            transition(&mut lcd, &mut clock),
            Some(vec![
                Effect::RenderScanline,
                Effect::Interrupt(Interrupt::LcdStat)
            ])
        );
    }

    #[test]
    fn test_vblank_entry() {
        let mut lcd = enabled_lcd();
        lcd.ly = 143;
        lcd.set_mode(PpuMode::HBlank);
        let mut clock = HBLANK_CYCLES;

        assert_eq!(
            transition(&mut lcd, &mut clock),
            Some(vec![
                Effect::FrameComplete,
                Effect::Interrupt(Interrupt::VBlank)
            ])
        );
        assert_eq!(lcd.ly, 144);
        assert_eq!(lcd.mode(), PpuMode::VBlank);

        // With the STAT VBlank source enabled, STAT follows VBlank
        lcd.ly = 143;
        lcd.stat |= 0x10;
        lcd.set_mode(PpuMode::HBlank);
        clock = HBLANK_CYCLES;
        assert_eq!(
            transition(&mut lcd, &mut clock),
            Some(vec![
                Effect::FrameComplete,
                Effect::Interrupt(Interrupt::VBlank),
                Effect::Interrupt(Interrupt::LcdStat)
            ])
        );
    }

    #[test]
    fn test_vblank_wraps_to_line_zero() {
        let mut lcd = enabled_lcd();
        lcd.ly = 152;
        lcd.set_mode(PpuMode::VBlank);
        let mut clock = VBLANK_LINE_CYCLES;

        transition(&mut lcd, &mut clock);
        assert_eq!(lcd.ly, 153);
        assert_eq!(lcd.mode(), PpuMode::VBlank);

        clock += VBLANK_LINE_CYCLES;
        transition(&mut lcd, &mut clock);
        assert_eq!(lcd.ly, 0);
        assert_eq!(lcd.mode(), PpuMode::OamSearch);
    }

    #[test]
    fn test_hblank_past_last_visible_line_enters_vblank() {
        // LY can sit past 143 in a visible-line mode after pre_boot on a running display
        let mut lcd = enabled_lcd();
        lcd.ly = 145;
        lcd.set_mode(PpuMode::HBlank);
        let mut clock = HBLANK_CYCLES;

        assert_eq!(
            transition(&mut lcd, &mut clock),
            Some(vec![Effect::FrameComplete, Effect::Interrupt(Interrupt::VBlank)])
        );
        assert_eq!(lcd.ly, 146);
        assert_eq!(lcd.mode(), PpuMode::VBlank);

        for _ in 0..2 * CYCLES_PER_FRAME / 4 {
            step(&mut lcd, &mut clock, 4);
            assert!(lcd.ly < LINES_PER_FRAME, "LY out of range: {}", lcd.ly);
        }
    }

    #[test]
    fn test_oversized_step_leaves_clock_behind() {
        // A single call worth two whole lines only advances one mode
        let mut lcd = enabled_lcd();
        let mut clock = 0;

        step(&mut lcd, &mut clock, 2 * VBLANK_LINE_CYCLES);

        assert_eq!(lcd.mode(), PpuMode::VramTransfer);
        assert_eq!(clock, 2 * VBLANK_LINE_CYCLES - OAM_SEARCH_CYCLES);
        assert!(clock >= PpuMode::VramTransfer.threshold());
    }

    #[test]
    fn test_coincidence() {
        let mut lcd = enabled_lcd();
        lcd.ly = 10;
        lcd.lyc = 10;
        assert_eq!(coincidence(&mut lcd), None);
        assert!(lcd.coincidence());

        lcd.stat |= 0x40;
        assert_eq!(
            coincidence(&mut lcd),
            Some(Effect::Interrupt(Interrupt::LcdStat))
        );

        lcd.lyc = 11;
        assert_eq!(coincidence(&mut lcd), None);
        assert!(!lcd.coincidence());
    }

    #[test]
    fn test_one_vblank_per_frame() {
        let mut lcd = enabled_lcd();
        let mut clock = 0;
        let mut vblanks = 0;
        let mut lines_rendered = 0;

        for _ in 0..(2 * CYCLES_PER_FRAME / 4) {
            for effect in step(&mut lcd, &mut clock, 4) {
                match effect {
                    Effect::Interrupt(Interrupt::VBlank) => {
                        vblanks += 1;
                        assert_eq!(lcd.ly, 144);
                    }
                    Effect::RenderScanline => lines_rendered += 1,
                    _ => {}
                }
            }
        }

        assert_eq!(vblanks, 2);
        assert_eq!(lines_rendered, 2 * 144);
        assert_eq!(lcd.ly, 0);
        assert_eq!(lcd.mode(), PpuMode::OamSearch);
        assert_eq!(clock, 0);
    }

    proptest! {
        #[test]
        fn prop_small_steps_keep_state_in_range(steps in prop::collection::vec(1u32..=80, 1..2000)) {
            let mut lcd = enabled_lcd();
            let mut clock = 0;

            for cycles in steps {
                step(&mut lcd, &mut clock, cycles);
                prop_assert!(lcd.ly < LINES_PER_FRAME);
                prop_assert!(clock < lcd.mode().threshold());
                prop_assert_eq!(lcd.coincidence(), lcd.ly == lcd.lyc);
                let visible = lcd.ly < VBLANK_START_LINE;
                prop_assert_eq!(lcd.mode() != PpuMode::VBlank, visible);
            }
        }
    }
}
