//! Object-image loader. An image is a sequence of tagged sections made of
//! big-endian 16-bit words; symbol and file-name bodies are one byte per
//! character.

use crate::mem::Memory;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const TAG_CODE: u16 = 0xCADE;
pub const TAG_DATA: u16 = 0xDADA;
pub const TAG_SYMBOL: u16 = 0xC3B7;
pub const TAG_FILE_NAME: u16 = 0xF17E;
pub const TAG_LINE_NUMBER: u16 = 0x715E;

#[derive(Error, Debug)]
pub enum ObjectError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("unknown section tag 0x{tag:04x} at byte offset {offset}")]
    UnknownTag { tag: u16, offset: usize },

    #[error("image truncated at byte offset {offset}")]
    Truncated { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Code { addr: u16, words: Vec<u16> },
    Data { addr: u16, words: Vec<u16> },
    Symbol { addr: u16, name: String },
    FileName { name: String },
    LineNumber { addr: u16, line: u16, file: u16 },
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ObjectError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(ObjectError::Truncated { offset: self.pos })?;
        let bytes = self.bytes;
        let out = &bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn word(&mut self) -> Result<u16, ObjectError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn words(&mut self, n: u16) -> Result<Vec<u16>, ObjectError> {
        (0..n).map(|_| self.word()).collect()
    }

    fn text(&mut self, n: u16) -> Result<String, ObjectError> {
        let b = self.take(n as usize)?;
        Ok(String::from_utf8_lossy(b).into_owned())
    }
}

/// Splits a raw image into its sections.
pub fn parse(bytes: &[u8]) -> Result<Vec<Section>, ObjectError> {
    let mut r = Reader { bytes, pos: 0 };
    let mut sections = Vec::new();

    while !r.at_end() {
        let offset = r.pos;
        let tag = r.word()?;
        let section = match tag {
            TAG_CODE | TAG_DATA => {
                let addr = r.word()?;
                let n = r.word()?;
                let words = r.words(n)?;
                if tag == TAG_CODE {
                    Section::Code { addr, words }
                } else {
                    Section::Data { addr, words }
                }
            }
            TAG_SYMBOL => {
                let addr = r.word()?;
                let n = r.word()?;
                Section::Symbol {
                    addr,
                    name: r.text(n)?,
                }
            }
            TAG_FILE_NAME => {
                let n = r.word()?;
                Section::FileName { name: r.text(n)? }
            }
            TAG_LINE_NUMBER => Section::LineNumber {
                addr: r.word()?,
                line: r.word()?,
                file: r.word()?,
            },
            _ => return Err(ObjectError::UnknownTag { tag, offset }),
        };
        sections.push(section);
    }

    Ok(sections)
}

/// Writes code and data sections into memory. Everything else is
/// informational and only logged.
pub fn load_sections(sections: &[Section], mem: &mut Memory) {
    for section in sections {
        match section {
            Section::Code { addr, words } | Section::Data { addr, words } => {
                tracing::debug!("loading {} words at 0x{addr:04x}", words.len());
                mem.write_words(*addr, words);
            }
            Section::Symbol { addr, name } => {
                tracing::debug!("symbol {name} = 0x{addr:04x}");
            }
            Section::FileName { name } => {
                tracing::debug!("source file {name}");
            }
            Section::LineNumber { addr, line, file } => {
                tracing::trace!("0x{addr:04x} -> file {file} line {line}");
            }
        }
    }
}

/// Reads, parses and loads one image file. Returns the parsed sections.
pub fn load_file(path: impl AsRef<Path>, mem: &mut Memory) -> Result<Vec<Section>, ObjectError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ObjectError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let sections = parse(&bytes)?;
    load_sections(&sections, mem);
    Ok(sections)
}
