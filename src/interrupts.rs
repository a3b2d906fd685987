//! Interrupts
//!
//! The PPU only raises interrupts; masking and dispatch belong to the CPU.
//! Interrupt vectors:
//!   - VBlank: 0x0040
//!   - LCD STAT: 0x0048

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::Byte;

/// Interrupts the PPU can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interrupt {
    /// VBlank interrupt (entering line 144)
    VBlank,
    /// LCD STAT interrupt (HBlank, VBlank or LY=LYC, as enabled in STAT)
    LcdStat,
}

impl Interrupt {
    /// Bit for this interrupt in the IE/IF registers
    pub fn bit(&self) -> Byte {
        match self {
            Interrupt::VBlank => 0x01,
            Interrupt::LcdStat => 0x02,
        }
    }

    /// Address the CPU jumps to when servicing this interrupt
    pub fn vector(&self) -> u16 {
        match self {
            Interrupt::VBlank => 0x0040,
            Interrupt::LcdStat => 0x0048,
        }
    }
}

/// Receiver of interrupt requests, usually the CPU's IF register
pub trait InterruptRequester {
    fn request_interrupt(&mut self, interrupt: Interrupt);
}

impl<T: InterruptRequester> InterruptRequester for Rc<RefCell<T>> {
    fn request_interrupt(&mut self, interrupt: Interrupt) {
        self.borrow_mut().request_interrupt(interrupt);
    }
}

/// Plain IF register that latches requested interrupts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptFlags(pub Byte);

impl InterruptFlags {
    /// Is this interrupt pending?
    pub fn is_set(&self, interrupt: Interrupt) -> bool {
        self.0 & interrupt.bit() != 0
    }

    /// Acknowledge an interrupt
    pub fn clear(&mut self, interrupt: Interrupt) {
        self.0 &= !interrupt.bit();
    }
}

impl InterruptRequester for InterruptFlags {
    fn request_interrupt(&mut self, interrupt: Interrupt) {
        self.0 |= interrupt.bit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_bits() {
        assert_eq!(Interrupt::VBlank.bit(), 0x01);
        assert_eq!(Interrupt::LcdStat.bit(), 0x02);
        assert_eq!(Interrupt::VBlank.vector(), 0x0040);
        assert_eq!(Interrupt::LcdStat.vector(), 0x0048);
    }

    #[test]
    fn test_flags_latch_and_clear() {
        let mut flags = InterruptFlags::default();
        flags.request_interrupt(Interrupt::LcdStat);
        assert!(flags.is_set(Interrupt::LcdStat));
        assert!(!flags.is_set(Interrupt::VBlank));

        flags.request_interrupt(Interrupt::VBlank);
        assert_eq!(flags.0, 0x03);

        flags.clear(Interrupt::LcdStat);
        assert_eq!(flags.0, 0x01);
    }

    #[test]
    fn test_shared_requester() {
        let flags = Rc::new(RefCell::new(InterruptFlags::default()));
        let mut handle = Rc::clone(&flags);
        handle.request_interrupt(Interrupt::VBlank);
        assert!(flags.borrow().is_set(Interrupt::VBlank));
    }
}
