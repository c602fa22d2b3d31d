//! Per-cycle trace records, one text line per executed instruction.

use std::fmt;
use std::io::{self, Write};

/// Control signals raised by one instruction. Built fresh every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub reg_we: bool,
    pub rd: u8,
    pub reg_value: u16,
    pub nzp_we: bool,
    pub nzp: u8,
    pub data_we: bool,
    pub dmem_addr: u16,
    pub dmem_value: u16,
}

impl Signals {
    pub fn reg_write(mut self, rd: u8, value: u16) -> Self {
        self.reg_we = true;
        self.rd = rd;
        self.reg_value = value;
        self
    }

    pub fn flags(mut self, nzp: u8) -> Self {
        self.nzp_we = true;
        self.nzp = nzp;
        self
    }

    pub fn data_write(mut self, addr: u16, value: u16) -> Self {
        self.data_we = true;
        self.dmem_addr = addr;
        self.dmem_value = value;
        self
    }
}

/// One executed cycle: fetch address, instruction word and its signals.
/// The rendered line ends with a single space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub pc: u16,
    pub inst: u16,
    pub signals: Signals,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.signals;
        write!(f, "{:04X} {:016b} {:X} ", self.pc, self.inst, s.reg_we as u8)?;
        if s.reg_we {
            write!(f, "{:X} {:04X} ", s.rd, s.reg_value)?;
        } else {
            f.write_str("0 0000 ")?;
        }
        write!(f, "{:X} ", s.nzp_we as u8)?;
        if s.nzp_we {
            write!(f, "{:X} ", s.nzp)?;
        } else {
            f.write_str("0 ")?;
        }
        write!(f, "{:X} ", s.data_we as u8)?;
        if s.data_we {
            write!(f, "{:04X} {:04X} ", s.dmem_addr, s.dmem_value)
        } else {
            f.write_str("0000 0000 ")
        }
    }
}

/// Appends `rec` as one line.
pub fn emit<W: Write + ?Sized>(out: &mut W, rec: &TraceRecord) -> io::Result<()> {
    writeln!(out, "{rec}")
}
