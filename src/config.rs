use crate::mem::AccessPolicy;

/// Knobs the driver exposes on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// After BR, CMP, JMP, STR and RTI, overwrite the flags with the sign
    /// of the last value written to any register. CMP traces the overwritten
    /// flags; the others are traced first.
    pub legacy_flags: bool,
    pub data_policy: AccessPolicy,
    /// Stop after N cycles (0 = run until halt)
    pub max_cycles: u64,
}
