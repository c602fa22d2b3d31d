use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    InvalidOpcode { inst: u16 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidOpcode { inst } => {
                write!(f, "invalid opcode {:x}: 0x{:04x}", inst >> 12, inst)
            }
        }
    }
}

/// Top-nibble opcode families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Branch = 0x0,
    Arith = 0x1,
    Cmp = 0x2,
    Jsr = 0x4,
    Logic = 0x5,
    Ldr = 0x6,
    Str = 0x7,
    Rti = 0x8,
    Const = 0x9,
    ShiftMod = 0xA,
    Jmp = 0xC,
    HiConst = 0xD,
    Trap = 0xF,
}

impl Opcode {
    pub fn of(inst: u16) -> Result<Self, DecodeError> {
        Ok(match inst >> 12 {
            0x0 => Opcode::Branch,
            0x1 => Opcode::Arith,
            0x2 => Opcode::Cmp,
            0x4 => Opcode::Jsr,
            0x5 => Opcode::Logic,
            0x6 => Opcode::Ldr,
            0x7 => Opcode::Str,
            0x8 => Opcode::Rti,
            0x9 => Opcode::Const,
            0xA => Opcode::ShiftMod,
            0xC => Opcode::Jmp,
            0xD => Opcode::HiConst,
            0xF => Opcode::Trap,
            _ => return Err(DecodeError::InvalidOpcode { inst }),
        })
    }
}

/// Second ALU operand: a register or an already sign-extended literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(u8),
    Imm(i16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Mul,
    Sub,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Not,
    Or,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Sll,
    Sra,
    Srl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    // mask == 0 is NOP, mask == 0b111 is unconditional
    Br { mask: u8, off: i16 },
    Arith { op: ArithOp, rd: u8, rs: u8, src: Operand },
    Cmp { rs: u8, rt: u8 },
    Cmpu { rs: u8, rt: u8 },
    Cmpi { rs: u8, imm: i16 },
    Cmpiu { rs: u8, uimm: u16 },
    Jsr { imm: i16 },
    Jsrr { rs: u8 },
    Logic { op: LogicOp, rd: u8, rs: u8, src: Operand },
    Ldr { rd: u8, rs: u8, off: i16 },
    Str { rt: u8, rs: u8, off: i16 },
    Rti,
    Const { rd: u8, imm: i16 },
    Shift { op: ShiftOp, rd: u8, rs: u8, uimm: u8 },
    Mod { rd: u8, rs: u8, rt: u8 },
    Jmp { off: i16 },
    Jmpr { rs: u8 },
    HiConst { rd: u8, uimm: u8 },
    Trap { uimm: u8 },
}

/// Sign-extends the low `bits` bits of `value` to a 16-bit signed value
/// by replicating bit `bits - 1` upward.
pub fn sign_extend(value: u16, bits: u32) -> i16 {
    let shift = 16 - bits;
    ((value << shift) as i16) >> shift
}

pub fn rd(inst: u16) -> u8 {
    ((inst >> 9) & 0x7) as u8
}

pub fn rs(inst: u16) -> u8 {
    ((inst >> 6) & 0x7) as u8
}

pub fn rt(inst: u16) -> u8 {
    (inst & 0x7) as u8
}

/// Low `bits` bits, zero-extended.
pub fn uimm(inst: u16, bits: u32) -> u16 {
    inst & ((1u16 << bits) - 1)
}

/// Low `bits` bits, sign-extended.
pub fn imm(inst: u16, bits: u32) -> i16 {
    sign_extend(uimm(inst, bits), bits)
}

pub fn decode(inst: u16) -> Result<Instr, DecodeError> {
    let opcode = Opcode::of(inst)?;
    let instr = match opcode {
        Opcode::Branch => Instr::Br {
            mask: rd(inst),
            off: imm(inst, 9),
        },
        Opcode::Arith => {
            let (rd, rs) = (rd(inst), rs(inst));
            if inst & 0x20 != 0 {
                Instr::Arith {
                    op: ArithOp::Add,
                    rd,
                    rs,
                    src: Operand::Imm(imm(inst, 5)),
                }
            } else {
                let op = match (inst >> 3) & 0x3 {
                    0 => ArithOp::Add,
                    1 => ArithOp::Mul,
                    2 => ArithOp::Sub,
                    _ => ArithOp::Div,
                };
                Instr::Arith {
                    op,
                    rd,
                    rs,
                    src: Operand::Reg(rt(inst)),
                }
            }
        }
        Opcode::Cmp => {
            // compares use [11:9] as the first source
            let rs = rd(inst);
            match (inst >> 7) & 0x3 {
                0 => Instr::Cmp { rs, rt: rt(inst) },
                1 => Instr::Cmpu { rs, rt: rt(inst) },
                2 => Instr::Cmpi {
                    rs,
                    imm: imm(inst, 7),
                },
                _ => Instr::Cmpiu {
                    rs,
                    uimm: uimm(inst, 7),
                },
            }
        }
        Opcode::Jsr => {
            if inst & 0x0800 != 0 {
                Instr::Jsr { imm: imm(inst, 10) }
            } else {
                Instr::Jsrr { rs: rs(inst) }
            }
        }
        Opcode::Logic => {
            let (rd, rs) = (rd(inst), rs(inst));
            if inst & 0x20 != 0 {
                Instr::Logic {
                    op: LogicOp::And,
                    rd,
                    rs,
                    src: Operand::Imm(imm(inst, 5)),
                }
            } else {
                let op = match (inst >> 3) & 0x3 {
                    0 => LogicOp::And,
                    1 => LogicOp::Not,
                    2 => LogicOp::Or,
                    _ => LogicOp::Xor,
                };
                Instr::Logic {
                    op,
                    rd,
                    rs,
                    src: Operand::Reg(rt(inst)),
                }
            }
        }
        Opcode::Ldr => Instr::Ldr {
            rd: rd(inst),
            rs: rs(inst),
            off: imm(inst, 6),
        },
        Opcode::Str => Instr::Str {
            // the stored register sits in the rd slot
            rt: rd(inst),
            rs: rs(inst),
            off: imm(inst, 6),
        },
        Opcode::Rti => Instr::Rti,
        Opcode::Const => Instr::Const {
            rd: rd(inst),
            imm: imm(inst, 9),
        },
        Opcode::ShiftMod => {
            let (rd, rs) = (rd(inst), rs(inst));
            let uimm = uimm(inst, 4) as u8;
            match (inst >> 4) & 0x3 {
                0 => Instr::Shift {
                    op: ShiftOp::Sll,
                    rd,
                    rs,
                    uimm,
                },
                1 => Instr::Shift {
                    op: ShiftOp::Sra,
                    rd,
                    rs,
                    uimm,
                },
                2 => Instr::Shift {
                    op: ShiftOp::Srl,
                    rd,
                    rs,
                    uimm,
                },
                _ => Instr::Mod { rd, rs, rt: rt(inst) },
            }
        }
        Opcode::Jmp => {
            if inst & 0x0800 != 0 {
                Instr::Jmp { off: imm(inst, 10) }
            } else {
                Instr::Jmpr { rs: rs(inst) }
            }
        }
        Opcode::HiConst => Instr::HiConst {
            rd: rd(inst),
            uimm: uimm(inst, 8) as u8,
        },
        Opcode::Trap => Instr::Trap {
            uimm: uimm(inst, 8) as u8,
        },
    };
    Ok(instr)
}
