//! Program-counter guard. Any PC outside the legal windows is replaced by
//! [`HALT_PC`], which is how a run ends.

use crate::cpu::Cpu;
use crate::mem::pc_legal;

/// Sentinel PC the driver loop stops on.
pub const HALT_PC: u16 = 0x80FF;

/// Straight-line sequencing: moves to `pc + 1`.
pub fn advance(cpu: &mut Cpu) {
    let next = cpu.pc.wrapping_add(1);
    jump(cpu, next);
}

/// Control transfer to an already computed target.
pub fn jump(cpu: &mut Cpu, target: u16) {
    if pc_legal(target, cpu.psr.privileged()) {
        cpu.pc = target;
    } else {
        tracing::info!("illegal PC 0x{target:04x} from 0x{:04x}, halting", cpu.pc);
        cpu.pc = HALT_PC;
    }
}
