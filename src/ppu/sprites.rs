//! Sprite layer
//!
//! Sprites are composited over the background line already in the
//! framebuffer. Two orderings are available, see [`SpritePriority`].

use super::{OamEntry, Ppu, OAM_ENTRIES};
use crate::common::{color_index, Word};
use crate::config::SpritePriority;
use crate::frame::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Sprite tiles always come from 0x8000-0x8FFF
const SPRITE_TILE_DATA: Word = 0x8000;

/// Sprites the hardware can show on one line
const MAX_SPRITES_PER_LINE: usize = 10;

impl Ppu {
    /// Draw the sprites that intersect the line in LY
    pub(super) fn render_sprite_line(&mut self) {
        let ly = self.lcd.ly as usize;
        if ly >= SCREEN_HEIGHT {
            return;
        }

        match self.config.sprite_priority {
            SpritePriority::OamOrder => {
                // Later entries overwrite earlier ones; there is no X ordering.
                for index in 0..OAM_ENTRIES {
                    let entry = self.oam_entry(index);
                    self.draw_sprite(entry, None);
                }
            }
            SpritePriority::Hardware => {
                let mut line_sprites: Vec<OamEntry> = (0..OAM_ENTRIES)
                    .map(|index| self.oam_entry(index))
                    .filter(|entry| self.sprite_row(entry).is_some())
                    .take(MAX_SPRITES_PER_LINE)
                    .collect();
                // Stable: equal X keeps OAM order, so lower index wins the tie
                line_sprites.sort_by_key(|entry| entry.x);

                let mut claimed = [false; SCREEN_WIDTH];
                for entry in line_sprites {
                    self.draw_sprite(entry, Some(&mut claimed));
                }
            }
        }
    }

    /// Row of the sprite's tile that lands on LY, or `None` if it misses the line
    fn sprite_row(&self, entry: &OamEntry) -> Option<u8> {
        let height = self.lcd.sprite_height() as i16;
        let top = entry.y as i16 - 16;
        let offset = self.lcd.ly as i16 - top;
        if !(0..height).contains(&offset) {
            return None;
        }

        let row = if entry.y_flip() {
            height - 1 - offset
        } else {
            offset
        };
        Some(row as u8)
    }

    /// Composite one sprite onto the line in LY.
    ///
    /// With `claimed`, a column already holding an opaque pixel of a
    /// higher-priority sprite is left alone, and each opaque pixel drawn
    /// claims its column even when the background hides it.
    fn draw_sprite(&mut self, entry: OamEntry, mut claimed: Option<&mut [bool; SCREEN_WIDTH]>) {
        let Some(row) = self.sprite_row(&entry) else {
            return;
        };

        let tile = if self.lcd.sprite_height() == 16 {
            entry.tile & 0xFE
        } else {
            entry.tile
        };
        let row_addr = SPRITE_TILE_DATA + tile as Word * 16 + row as Word * 2;
        let lo = self.read_byte(row_addr);
        let hi = self.read_byte(row_addr + 1);

        let ly = self.lcd.ly as usize;
        let shades = self.config.shades;
        let left = entry.x as i16 - 8;

        for px in 0..8u8 {
            let bit = if entry.x_flip() { px } else { 7 - px };
            let color = color_index(lo, hi, bit);
            // Color 0 is transparent for sprites
            if color == 0 {
                continue;
            }

            let column = left + px as i16;
            if !(0..SCREEN_WIDTH as i16).contains(&column) {
                continue;
            }
            let column = column as usize;

            if let Some(claimed) = claimed.as_deref_mut() {
                if claimed[column] {
                    continue;
                }
                claimed[column] = true;
            }

            let shade = shades.shade(self.lcd.sprite_color(entry.palette_number(), color));
            let pixel = &mut self.frame.row_mut(ly)[column];
            // Behind-BG sprites show through background color 0, which is
            // the lightest configured shade rather than a fixed byte value
            if !entry.bg_priority() || *pixel == shades.lightest() {
                *pixel = shade;
            }
        }
    }
}
