#![allow(dead_code)]

use lc4_sim::config::Config;
use lc4_sim::cpu::{BOOT_PC, Machine};

// Instruction encoders. Immediates are masked to their field width.

pub fn nop() -> u16 {
    0x0000
}

pub fn br(mask: u16, off: i16) -> u16 {
    (mask << 9) | (off as u16 & 0x1FF)
}

pub fn add(rd: u16, rs: u16, rt: u16) -> u16 {
    0x1000 | (rd << 9) | (rs << 6) | rt
}

pub fn mul(rd: u16, rs: u16, rt: u16) -> u16 {
    0x1008 | (rd << 9) | (rs << 6) | rt
}

pub fn sub(rd: u16, rs: u16, rt: u16) -> u16 {
    0x1010 | (rd << 9) | (rs << 6) | rt
}

pub fn div(rd: u16, rs: u16, rt: u16) -> u16 {
    0x1018 | (rd << 9) | (rs << 6) | rt
}

pub fn addi(rd: u16, rs: u16, imm: i16) -> u16 {
    0x1020 | (rd << 9) | (rs << 6) | (imm as u16 & 0x1F)
}

pub fn cmp(rs: u16, rt: u16) -> u16 {
    0x2000 | (rs << 9) | rt
}

pub fn cmpu(rs: u16, rt: u16) -> u16 {
    0x2080 | (rs << 9) | rt
}

pub fn cmpi(rs: u16, imm: i16) -> u16 {
    0x2100 | (rs << 9) | (imm as u16 & 0x7F)
}

pub fn cmpiu(rs: u16, uimm: u16) -> u16 {
    0x2180 | (rs << 9) | (uimm & 0x7F)
}

pub fn jsr(imm: i16) -> u16 {
    0x4800 | (imm as u16 & 0x3FF)
}

pub fn jsrr(rs: u16) -> u16 {
    0x4000 | (rs << 6)
}

pub fn and(rd: u16, rs: u16, rt: u16) -> u16 {
    0x5000 | (rd << 9) | (rs << 6) | rt
}

pub fn not(rd: u16, rs: u16) -> u16 {
    0x5008 | (rd << 9) | (rs << 6)
}

pub fn or(rd: u16, rs: u16, rt: u16) -> u16 {
    0x5010 | (rd << 9) | (rs << 6) | rt
}

pub fn xor(rd: u16, rs: u16, rt: u16) -> u16 {
    0x5018 | (rd << 9) | (rs << 6) | rt
}

pub fn andi(rd: u16, rs: u16, imm: i16) -> u16 {
    0x5020 | (rd << 9) | (rs << 6) | (imm as u16 & 0x1F)
}

pub fn ldr(rd: u16, rs: u16, off: i16) -> u16 {
    0x6000 | (rd << 9) | (rs << 6) | (off as u16 & 0x3F)
}

pub fn str(rt: u16, rs: u16, off: i16) -> u16 {
    0x7000 | (rt << 9) | (rs << 6) | (off as u16 & 0x3F)
}

pub fn rti() -> u16 {
    0x8000
}

pub fn konst(rd: u16, imm: i16) -> u16 {
    0x9000 | (rd << 9) | (imm as u16 & 0x1FF)
}

pub fn sll(rd: u16, rs: u16, uimm: u16) -> u16 {
    0xA000 | (rd << 9) | (rs << 6) | (uimm & 0xF)
}

pub fn sra(rd: u16, rs: u16, uimm: u16) -> u16 {
    0xA010 | (rd << 9) | (rs << 6) | (uimm & 0xF)
}

pub fn srl(rd: u16, rs: u16, uimm: u16) -> u16 {
    0xA020 | (rd << 9) | (rs << 6) | (uimm & 0xF)
}

pub fn modulo(rd: u16, rs: u16, rt: u16) -> u16 {
    0xA030 | (rd << 9) | (rs << 6) | rt
}

pub fn jmp(off: i16) -> u16 {
    0xC800 | (off as u16 & 0x3FF)
}

pub fn jmpr(rs: u16) -> u16 {
    0xC000 | (rs << 6)
}

pub fn hiconst(rd: u16, uimm: u16) -> u16 {
    0xD000 | (rd << 9) | (uimm & 0xFF)
}

pub fn trap(uimm: u16) -> u16 {
    0xF000 | (uimm & 0xFF)
}

/// Fresh machine with `program` placed at the boot address.
pub fn boot_with(config: Config, program: &[u16]) -> Machine {
    let mut m = Machine::new(config);
    m.reset();
    m.mem.write_words(BOOT_PC, program);
    m
}

pub fn boot(program: &[u16]) -> Machine {
    boot_with(Config::default(), program)
}

/// Steps `n` cycles, discarding the trace.
pub fn step_n(m: &mut Machine, n: usize) {
    let mut sink = std::io::sink();
    for _ in 0..n {
        m.step(&mut sink).expect("step");
    }
}

/// Object image bytes for a single code section.
pub fn code_image(addr: u16, words: &[u16]) -> Vec<u8> {
    section(0xCADE, addr, words)
}

pub fn data_image(addr: u16, words: &[u16]) -> Vec<u8> {
    section(0xDADA, addr, words)
}

fn section(tag: u16, addr: u16, words: &[u16]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&tag.to_be_bytes());
    out.extend_from_slice(&addr.to_be_bytes());
    out.extend_from_slice(&(words.len() as u16).to_be_bytes());
    for w in words {
        out.extend_from_slice(&w.to_be_bytes());
    }
    out
}
