//! Background layer
//!
//! One scanline of the 256x256 background map, scrolled by SCX/SCY and
//! wrapped at the map edges.

use super::Ppu;
use crate::common::{color_index, Word};
use crate::frame::{SCREEN_HEIGHT, SCREEN_WIDTH};

impl Ppu {
    /// Draw the background for the line in LY
    pub(super) fn render_background_line(&mut self) {
        let ly = self.lcd.ly as usize;
        if ly >= SCREEN_HEIGHT {
            return;
        }

        let shades = self.config.shades;
        if !self.lcd.bg_enabled() {
            // A disabled background shows as blank (lightest shade)
            self.frame.row_mut(ly).fill(shades.lightest());
            return;
        }

        let tile_map = self.lcd.bg_tile_map();
        let tile_data = self.lcd.bg_tile_data();

        let y = ly as Word + self.lcd.scy as Word;
        let tile_row = (y / 8) % 32;
        let tile_y = y % 8;

        let mut line = [0; SCREEN_WIDTH];
        for (column, pixel) in line.iter_mut().enumerate() {
            let x = self.lcd.scx as Word + column as Word;
            let tile_col = (x / 8) % 32;

            let tile_index = self.read_byte(tile_map + tile_row * 32 + tile_col);
            let row_addr = tile_data.tile_address(tile_index) + tile_y * 2;
            let lo = self.read_byte(row_addr);
            let hi = self.read_byte(row_addr + 1);

            let color = color_index(lo, hi, 7 - (x % 8) as u8);
            *pixel = shades.shade(self.lcd.bg_color(color));
        }

        self.frame.row_mut(ly).copy_from_slice(&line);
    }
}
