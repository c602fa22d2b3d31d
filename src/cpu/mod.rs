pub mod decode;
pub mod exec;
pub mod fault;
pub mod guard;

use std::io::Write;

use crate::config::Config;
use crate::mem::Memory;
use crate::psr::Psr;
use crate::trace::{self, TraceRecord};
use fault::{Fault, WithPc};

pub use guard::HALT_PC;

/// Power-on program counter.
pub const BOOT_PC: u16 = 0x8200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cpu {
    pub regs: [u16; 8],
    pub pc: u16,
    pub psr: Psr,
}

impl Default for Cpu {
    fn default() -> Self {
        Self {
            regs: [0; 8],
            pc: BOOT_PC,
            psr: Psr::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Halted,
    CycleLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub reason: StopReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    pub cpu: Cpu,
    pub mem: Memory,
    pub config: Config,
    pub executed: u64,
    // last value any instruction wrote into a register; only read in legacy flag mode
    latched_input: u16,
}

impl Machine {
    pub fn new(config: Config) -> Self {
        Self {
            cpu: Cpu::default(),
            mem: Memory::new(),
            config,
            executed: 0,
            latched_input: 0,
        }
    }

    /// Restores the power-on image: registers and memory cleared, boot PC and PSR.
    pub fn reset(&mut self) {
        self.cpu = Cpu::default();
        self.mem.clear();
        self.executed = 0;
        self.latched_input = 0;
    }

    pub fn halted(&self) -> bool {
        self.cpu.pc == HALT_PC
    }

    /// Runs one fetch-decode-execute cycle and writes its trace line.
    pub fn step<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<TraceRecord, Fault> {
        let pc = self.cpu.pc;

        // Fetch
        let inst = self.mem.read(pc);

        // Decode
        let instr = decode::decode(inst).with_pc(pc)?;

        // Execute
        let retire = exec::execute(&mut self.cpu, &mut self.mem, self.config.data_policy, instr)?;
        if retire.signals.reg_we {
            self.latched_input = retire.signals.reg_value;
        }

        let relatch = if self.config.legacy_flags {
            exec::relatch(&instr)
        } else {
            None
        };

        let mut signals = retire.signals;
        if relatch == Some(exec::Relatch::BeforeTrace) {
            let nzp = self.cpu.psr.set_nzp(self.latched_input as i16);
            if signals.nzp_we {
                signals.nzp = nzp;
            }
        }

        let rec = TraceRecord { pc, inst, signals };
        trace::emit(out, &rec)?;

        if relatch == Some(exec::Relatch::AfterTrace) {
            self.cpu.psr.set_nzp(self.latched_input as i16);
        }

        match retire.next {
            exec::Next::Sequential => guard::advance(&mut self.cpu),
            exec::Next::Target(target) => guard::jump(&mut self.cpu, target),
        }
        self.executed += 1;
        Ok(rec)
    }

    /// Steps until the PC reaches the halt address, the cycle limit is hit,
    /// or a fault ends the run.
    pub fn run<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<RunSummary, Fault> {
        let start = self.executed;
        loop {
            if self.halted() {
                return Ok(RunSummary {
                    cycles: self.executed - start,
                    reason: StopReason::Halted,
                });
            }
            if self.config.max_cycles != 0 && self.executed - start >= self.config.max_cycles {
                return Ok(RunSummary {
                    cycles: self.executed - start,
                    reason: StopReason::CycleLimit,
                });
            }
            self.step(out)?;
        }
    }
}
