use thiserror::Error;

/// Number of addressable 16-bit words.
pub const MEM_WORDS: usize = 1 << 16;

// Region boundaries shared by the PC guard and the data-access check.
pub const GAP_LOW: u16 = 0x2000;
pub const GAP_HIGH: u16 = 0x7FFF;
/// With the privilege bit clear, everything above this is off limits.
pub const LOW_REGION_HIGH: u16 = 0x7FFF;
/// With the privilege bit set, everything from here up is off limits.
pub const HIGH_REGION_LOW: u16 = 0xA000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    #[error("illegal memory access: 0x{0:04x}")]
    IllegalAccess(u16),
}

/// Which windows load/store addresses are checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Same windows the PC guard enforces.
    #[default]
    Shared,
    /// User data at 0x2000..=0x7FFF, OS data at 0xA000..=0xFFFF (privileged only).
    Split,
}

/// Legality predicate for program-counter values.
pub fn pc_legal(addr: u16, privileged: bool) -> bool {
    let in_gap = (GAP_LOW..=GAP_HIGH).contains(&addr);
    let restricted = if privileged {
        addr >= HIGH_REGION_LOW
    } else {
        addr > LOW_REGION_HIGH
    };
    !in_gap && !restricted
}

/// Legality predicate for load/store effective addresses.
pub fn data_legal(addr: u16, privileged: bool, policy: AccessPolicy) -> bool {
    match policy {
        AccessPolicy::Shared => pc_legal(addr, privileged),
        AccessPolicy::Split => {
            (GAP_LOW..=GAP_HIGH).contains(&addr) || (privileged && addr >= HIGH_REGION_LOW)
        }
    }
}

/// Flat word-addressed memory shared by code and data.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    words: Vec<u16>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.words.iter().filter(|w| **w != 0).count();
        f.debug_struct("Memory").field("nonzero_words", &used).finish()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            words: vec![0; MEM_WORDS],
        }
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    pub fn read(&self, addr: u16) -> u16 {
        self.words[addr as usize]
    }

    pub fn write(&mut self, addr: u16, v: u16) {
        self.words[addr as usize] = v;
    }

    /// Checked read for the load path.
    pub fn load(&self, addr: u16, privileged: bool, policy: AccessPolicy) -> Result<u16, MemError> {
        if !data_legal(addr, privileged, policy) {
            return Err(MemError::IllegalAccess(addr));
        }
        Ok(self.read(addr))
    }

    /// Checked write for the store path. Nothing is written on failure.
    pub fn store(
        &mut self,
        addr: u16,
        v: u16,
        privileged: bool,
        policy: AccessPolicy,
    ) -> Result<(), MemError> {
        if !data_legal(addr, privileged, policy) {
            return Err(MemError::IllegalAccess(addr));
        }
        self.write(addr, v);
        Ok(())
    }

    /// Copies `words` in starting at `addr`, wrapping past 0xFFFF.
    pub fn write_words(&mut self, addr: u16, words: &[u16]) {
        for (i, w) in words.iter().enumerate() {
            self.write(addr.wrapping_add(i as u16), *w);
        }
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.words
    }
}
