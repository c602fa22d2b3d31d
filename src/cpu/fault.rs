use crate::cpu::decode::DecodeError;
use crate::mem::MemError;
use thiserror::Error;

/// Conditions that end a run. Illegal PCs and zero divisors are not faults;
/// they are handled inside the cycle.
#[derive(Error, Debug)]
pub enum Fault {
    #[error("illegal instruction at pc=0x{pc:04x} inst=0x{inst:04x}")]
    IllegalInstruction { pc: u16, inst: u16 },

    #[error("illegal memory access at pc=0x{pc:04x}, addr=0x{addr:04x}")]
    IllegalAccess { pc: u16, addr: u16 },

    #[error("failed to write trace: {0}")]
    Trace(#[from] std::io::Error),
}

/// Trait for adding PC context to errors that can become Faults
pub trait WithPc<T> {
    fn with_pc(self, pc: u16) -> Result<T, Fault>;
}

impl<T> WithPc<T> for Result<T, MemError> {
    fn with_pc(self, pc: u16) -> Result<T, Fault> {
        self.map_err(|err| match err {
            MemError::IllegalAccess(addr) => Fault::IllegalAccess { pc, addr },
        })
    }
}

impl<T> WithPc<T> for Result<T, DecodeError> {
    fn with_pc(self, pc: u16) -> Result<T, Fault> {
        self.map_err(|err| match err {
            DecodeError::InvalidOpcode { inst } => Fault::IllegalInstruction { pc, inst },
        })
    }
}
