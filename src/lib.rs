//! Cycle-level simulator for the LC-4 16-bit teaching ISA.

pub mod config;
pub mod cpu;
pub mod mem;
pub mod obj;
pub mod psr;
pub mod trace;
