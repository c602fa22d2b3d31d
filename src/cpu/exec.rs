use std::cmp::Ordering;

use super::Cpu;
use super::decode::{ArithOp, Instr, LogicOp, Operand, ShiftOp};
use super::fault::{Fault, WithPc};
use crate::mem::{AccessPolicy, Memory};
use crate::trace::Signals;

/// Base of the trap vector page.
pub const TRAP_BASE: u16 = 0x8000;

/// Register that receives return addresses.
pub const LINK_REG: u8 = 7;

/// Where the PC goes once the instruction has been traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Sequential,
    Target(u16),
}

/// What an instruction did this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retire {
    pub signals: Signals,
    pub next: Next,
}

impl Retire {
    fn seq(signals: Signals) -> Self {
        Self {
            signals,
            next: Next::Sequential,
        }
    }

    fn to(signals: Signals, target: u16) -> Self {
        Self {
            signals,
            next: Next::Target(target),
        }
    }
}

/// Commits `value` to `rd`, updates the flags from it and reports both.
fn write_reg(cpu: &mut Cpu, rd: u8, value: u16) -> Signals {
    cpu.regs[rd as usize] = value;
    let nzp = cpu.psr.set_nzp(value as i16);
    Signals::default().reg_write(rd, value).flags(nzp)
}

fn operand(cpu: &Cpu, src: Operand) -> u16 {
    match src {
        Operand::Reg(rt) => cpu.regs[rt as usize],
        Operand::Imm(imm) => imm as u16,
    }
}

/// Executes one decoded instruction against `cpu` and `mem`. The PC is left
/// untouched; the caller traces the cycle and then resolves [`Retire::next`].
pub fn execute(
    cpu: &mut Cpu,
    mem: &mut Memory,
    policy: AccessPolicy,
    instr: Instr,
) -> Result<Retire, Fault> {
    let pc = cpu.pc;
    let r = |cpu: &Cpu, idx: u8| -> u16 { cpu.regs[idx as usize] };

    let retire = match instr {
        Instr::Br { mask, off } => branch(cpu, mask, off),
        Instr::Arith { op, rd, rs, src } => arith(cpu, op, rd, rs, src),
        Instr::Cmp { rs, rt } => {
            let ord = (r(cpu, rs) as i16).cmp(&(r(cpu, rt) as i16));
            compare(cpu, ord)
        }
        Instr::Cmpu { rs, rt } => {
            let ord = r(cpu, rs).cmp(&r(cpu, rt));
            compare(cpu, ord)
        }
        Instr::Cmpi { rs, imm } => {
            let ord = (r(cpu, rs) as i16).cmp(&imm);
            compare(cpu, ord)
        }
        Instr::Cmpiu { rs, uimm } => {
            let ord = r(cpu, rs).cmp(&uimm);
            compare(cpu, ord)
        }
        Instr::Jsr { imm } => {
            let target = (pc & 0x8000) | ((imm << 4) as u16);
            Retire::to(write_reg(cpu, LINK_REG, pc.wrapping_add(1)), target)
        }
        Instr::Jsrr { rs } => {
            // read the target before R7 is overwritten
            let target = r(cpu, rs);
            Retire::to(write_reg(cpu, LINK_REG, pc.wrapping_add(1)), target)
        }
        Instr::Logic { op, rd, rs, src } => {
            let a = r(cpu, rs);
            let value = match op {
                LogicOp::And => a & operand(cpu, src),
                LogicOp::Not => !a,
                LogicOp::Or => a | operand(cpu, src),
                LogicOp::Xor => a ^ operand(cpu, src),
            };
            Retire::seq(write_reg(cpu, rd, value))
        }
        Instr::Ldr { rd, rs, off } => {
            let addr = r(cpu, rs).wrapping_add(off as u16);
            let value = mem
                .load(addr, cpu.psr.privileged(), policy)
                .with_pc(pc)?;
            let mut signals = write_reg(cpu, rd, value);
            signals.dmem_addr = addr;
            signals.dmem_value = value;
            Retire::seq(signals)
        }
        Instr::Str { rt, rs, off } => {
            let addr = r(cpu, rs).wrapping_add(off as u16);
            let value = r(cpu, rt);
            mem.store(addr, value, cpu.psr.privileged(), policy)
                .with_pc(pc)?;
            Retire::seq(Signals::default().data_write(addr, value))
        }
        Instr::Rti => {
            cpu.psr.set_privileged(false);
            Retire::to(Signals::default(), r(cpu, LINK_REG))
        }
        Instr::Const { rd, imm } => Retire::seq(write_reg(cpu, rd, imm as u16)),
        Instr::Shift { op, rd, rs, uimm } => {
            let a = r(cpu, rs);
            let value = match op {
                ShiftOp::Sll => a << uimm,
                ShiftOp::Sra => ((a as i16) >> uimm) as u16,
                ShiftOp::Srl => a >> uimm,
            };
            Retire::seq(write_reg(cpu, rd, value))
        }
        Instr::Mod { rd, rs, rt } => match r(cpu, rs).checked_rem(r(cpu, rt)) {
            Some(value) => Retire::seq(write_reg(cpu, rd, value)),
            None => {
                tracing::warn!("modulo by zero at pc=0x{pc:04x}, R{rd} left unchanged");
                Retire::seq(Signals::default())
            }
        },
        Instr::Jmp { off } => {
            let target = pc.wrapping_add(1).wrapping_add(off as u16);
            Retire::to(Signals::default(), target)
        }
        Instr::Jmpr { rs } => Retire::to(Signals::default(), r(cpu, rs)),
        Instr::HiConst { rd, uimm } => {
            let value = (r(cpu, rd) & 0x00FF) | ((uimm as u16) << 8);
            Retire::seq(write_reg(cpu, rd, value))
        }
        Instr::Trap { uimm } => {
            let signals = write_reg(cpu, LINK_REG, pc.wrapping_add(1));
            cpu.psr.set_privileged(true);
            Retire::to(signals, TRAP_BASE | uimm as u16)
        }
    };
    Ok(retire)
}

fn branch(cpu: &Cpu, mask: u8, off: i16) -> Retire {
    if mask & cpu.psr.nzp() != 0 {
        let target = cpu.pc.wrapping_add(1).wrapping_add(off as u16);
        Retire::to(Signals::default(), target)
    } else {
        Retire::seq(Signals::default())
    }
}

fn arith(cpu: &mut Cpu, op: ArithOp, rd: u8, rs: u8, src: Operand) -> Retire {
    let a = cpu.regs[rs as usize];
    let b = operand(cpu, src);
    let value = match op {
        ArithOp::Add => a.wrapping_add(b),
        ArithOp::Mul => a.wrapping_mul(b),
        ArithOp::Sub => a.wrapping_sub(b),
        ArithOp::Div => match (a as i16).checked_div(b as i16) {
            Some(q) => q as u16,
            // i16::MIN / -1 wraps like the hardware divider
            None if b != 0 => a,
            None => {
                tracing::warn!(
                    "division by zero at pc=0x{:04x}, R{rd} left unchanged",
                    cpu.pc
                );
                return Retire::seq(Signals::default());
            }
        },
    };
    Retire::seq(write_reg(cpu, rd, value))
}

fn compare(cpu: &mut Cpu, ord: Ordering) -> Retire {
    let nzp = cpu.psr.set_nzp(ord as i16);
    Retire::seq(Signals::default().flags(nzp))
}

/// When, relative to its trace line, an instruction recomputes the flags
/// from the last register-input value in legacy flag mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relatch {
    /// The trace line already shows the recomputed flags.
    BeforeTrace,
    AfterTrace,
}

pub fn relatch(instr: &Instr) -> Option<Relatch> {
    match instr {
        Instr::Cmp { .. }
        | Instr::Cmpu { .. }
        | Instr::Cmpi { .. }
        | Instr::Cmpiu { .. }
        | Instr::Str { .. } => Some(Relatch::BeforeTrace),
        Instr::Br { .. } | Instr::Jmp { .. } | Instr::Jmpr { .. } | Instr::Rti => {
            Some(Relatch::AfterTrace)
        }
        _ => None,
    }
}
