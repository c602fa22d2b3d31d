use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lc4_sim::config::Config;
use lc4_sim::cpu::{Machine, StopReason};
use lc4_sim::mem::AccessPolicy;
use tracing_subscriber::EnvFilter;

/// Command-line spelling of [`AccessPolicy`].
#[derive(ValueEnum, Clone, Copy, Debug)]
enum DataPolicy {
    /// Same windows the PC guard enforces
    Shared,
    /// User data at 0x2000..=0x7FFF, OS data at 0xA000..=0xFFFF
    Split,
}

impl From<DataPolicy> for AccessPolicy {
    fn from(policy: DataPolicy) -> Self {
        match policy {
            DataPolicy::Shared => AccessPolicy::Shared,
            DataPolicy::Split => AccessPolicy::Split,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Cycle-level LC-4 simulator")]
struct Args {
    /// Trace file to write, one line per executed instruction
    output: PathBuf,

    /// Object images to load, in order
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Stop after N instructions (0 = run until halt)
    #[arg(long, default_value_t = 0)]
    max_cycles: u64,

    /// After BR, CMP, JMP, STR and RTI, recompute flags from the last register write
    #[arg(long, default_value_t = false)]
    legacy_flags: bool,

    /// Address windows that loads and stores are checked against
    #[arg(long, value_enum, default_value_t = DataPolicy::Shared)]
    data_policy: DataPolicy,

    /// Log loader and halt details to stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // refuse to touch the output file unless every image is there
    if let Some(missing) = args.inputs.iter().find(|p| !p.exists()) {
        return Err(format!("input file does not exist: {}", missing.display()).into());
    }

    let mut machine = Machine::new(Config {
        legacy_flags: args.legacy_flags,
        data_policy: args.data_policy.into(),
        max_cycles: args.max_cycles,
    });
    machine.reset();

    for path in &args.inputs {
        let sections = lc4_sim::obj::load_file(path, &mut machine.mem)?;
        tracing::debug!("{}: {} sections", path.display(), sections.len());
    }

    let mut out = BufWriter::new(File::create(&args.output)?);

    // fetch-decode-execute until the PC guard sends us to the halt address
    let result = machine.run(&mut out);
    let flushed = out.flush();

    match result {
        Ok(summary) => {
            flushed?;
            let reason = match summary.reason {
                StopReason::Halted => "halted",
                StopReason::CycleLimit => "cycle limit reached",
            };
            println!("{} cycles, {}", summary.cycles, reason);
            Ok(())
        }
        Err(fault) => {
            tracing::error!(
                "CPU fault after {} cycles: {fault} (psr={})",
                machine.executed,
                machine.cpu.psr
            );
            Err(fault.into())
        }
    }
}
