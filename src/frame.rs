//! Frame Sink
//!
//! The framebuffer the renderers draw into, and the observer notified once
//! per completed frame.

use crate::common::Byte;

/// Screen dimensions
pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

/// Notified when the PPU enters VBlank with a finished frame
pub trait FrameObserver {
    fn frame_complete(&mut self);
}

impl<F: FnMut()> FrameObserver for F {
    fn frame_complete(&mut self) {
        self()
    }
}

/// 160x144 shades, row-major, one byte per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<Byte>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    /// Shade at (x, y), or `None` off screen
    pub fn pixel(&self, x: usize, y: usize) -> Option<Byte> {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            Some(self.pixels[y * SCREEN_WIDTH + x])
        } else {
            None
        }
    }

    /// Set the shade at (x, y); writes off screen are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, shade: Byte) {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            self.pixels[y * SCREEN_WIDTH + x] = shade;
        }
    }

    /// One scanline
    ///
    /// # Panics
    ///
    /// Panics if `y` is not below `SCREEN_HEIGHT`. Renderers only call this
    /// for visible lines.
    pub fn row(&self, y: usize) -> &[Byte] {
        debug_assert!(y < SCREEN_HEIGHT, "row {} off screen", y);
        &self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    /// One scanline, mutable
    ///
    /// # Panics
    ///
    /// Panics if `y` is not below `SCREEN_HEIGHT`.
    pub fn row_mut(&mut self, y: usize) -> &mut [Byte] {
        debug_assert!(y < SCREEN_HEIGHT, "row {} off screen", y);
        &mut self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub fn as_slice(&self) -> &[Byte] {
        &self.pixels
    }

    pub fn fill(&mut self, shade: Byte) {
        self.pixels.fill(shade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_framebuffer_bounds() {
        let mut fb = FrameBuffer::new();
        assert_eq!(fb.as_slice().len(), SCREEN_WIDTH * SCREEN_HEIGHT);

        fb.set_pixel(159, 143, 0x60);
        assert_eq!(fb.pixel(159, 143), Some(0x60));
        assert_eq!(fb.row(143)[159], 0x60);

        fb.set_pixel(160, 0, 0x11);
        fb.set_pixel(0, 144, 0x11);
        assert_eq!(fb.pixel(160, 0), None);
        assert_eq!(fb.pixel(0, 144), None);
        assert!(!fb.as_slice().contains(&0x11));
    }

    #[test]
    #[should_panic]
    fn test_row_past_last_line_panics() {
        let fb = FrameBuffer::new();
        let _ = fb.row(SCREEN_HEIGHT);
    }

    #[test]
    fn test_closure_observer() {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let mut observer = move || seen.set(seen.get() + 1);

        observer.frame_complete();
        observer.frame_complete();
        assert_eq!(count.get(), 2);
    }
}
