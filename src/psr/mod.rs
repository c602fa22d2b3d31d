//! Processor status register: privilege bit and the NZP condition flags.

use std::fmt;

pub const PRIV_BIT: u16 = 0x8000;
pub const NZP_MASK: u16 = 0x0007;

pub const FLAG_N: u8 = 0x4;
pub const FLAG_Z: u8 = 0x2;
pub const FLAG_P: u8 = 0x1;

/// Status value at power-on.
pub const BOOT_PSR: u16 = 0x8002;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Psr(pub u16);

impl Default for Psr {
    fn default() -> Self {
        Psr(BOOT_PSR)
    }
}

impl fmt::Display for Psr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.nzp();
        write!(
            f,
            "0x{:04x} [{}{}{}{}]",
            self.0,
            if self.privileged() { 'S' } else { 'U' },
            if n & FLAG_N != 0 { 'n' } else { '-' },
            if n & FLAG_Z != 0 { 'z' } else { '-' },
            if n & FLAG_P != 0 { 'p' } else { '-' },
        )
    }
}

impl Psr {
    pub fn privileged(&self) -> bool {
        self.0 & PRIV_BIT != 0
    }

    pub fn set_privileged(&mut self, on: bool) {
        if on {
            self.0 |= PRIV_BIT;
        } else {
            self.0 &= !PRIV_BIT;
        }
    }

    pub fn nzp(&self) -> u8 {
        (self.0 & NZP_MASK) as u8
    }

    /// Flag unit: replaces bits 2:0 with the one-hot sign of `result`
    /// and returns the bits it installed.
    pub fn set_nzp(&mut self, result: i16) -> u8 {
        let flags = nzp_of(result);
        self.0 = (self.0 & !NZP_MASK) | flags as u16;
        flags
    }
}

/// One-hot NZP encoding of a signed result.
pub fn nzp_of(result: i16) -> u8 {
    match result {
        r if r < 0 => FLAG_N,
        0 => FLAG_Z,
        _ => FLAG_P,
    }
}
