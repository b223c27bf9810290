mod expected;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{WrapErr, bail, eyre};

use rv64sim_core::{
    datapath::{Core, ExecError, TickStatus},
    encoder::{EncodedProgram, encode_trace},
};

/// Simulator for a 64-bit RISC-V single-cycle datapath.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Arguments {
    /// Trace file with one assembly instruction per line
    trace: PathBuf,

    /// Maximum number of clock ticks before the run is aborted
    #[arg(short, long, default_value_t = 1_000_000)]
    timeout: u64,

    /// Suppress the per-tick register dump
    #[arg(short, long)]
    quiet: bool,

    /// First data-memory address of the post-halt dump (inclusive)
    #[arg(long, default_value_t = 0)]
    mem_start: usize,

    /// Last data-memory address of the post-halt dump (exclusive)
    #[arg(long, default_value_t = 32)]
    mem_end: usize,

    /// JSON file with the expected final register/memory state
    #[arg(long)]
    expected: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Arguments::parse();

    let source = std::fs::read_to_string(&args.trace)
        .wrap_err_with(|| format!("cannot open trace file {}", args.trace.display()))?;

    let program = match encode_trace(&source) {
        Ok(program) => program,
        Err(errors) => {
            for error in &errors {
                eprintln!("{error}");
            }
            bail!(
                "{} error(s) while encoding {}",
                errors.len(),
                args.trace.display()
            );
        }
    };
    for skipped in &program.skipped {
        eprintln!("warning: {skipped}");
    }
    if program.instruction_memory.is_empty() {
        bail!("trace {} contains no instructions", args.trace.display());
    }

    let mut core = Core::new();
    let mut halted = false;
    for _ in 0..args.timeout {
        let status = core
            .tick(&program.instruction_memory)
            .map_err(|error| locate_error(error, &program))?;
        if !args.quiet {
            print_core_state(&core);
        }
        if status == TickStatus::Halted {
            halted = true;
            break;
        }
    }
    if !halted {
        bail!("no halt within {} ticks", args.timeout);
    }

    println!("Simulation complete.");
    print_data_memory(&core, args.mem_start, args.mem_end);

    if let Some(path) = &args.expected {
        expected::check_final_state(&core, path)?;
    }

    Ok(())
}

/// Attaches the trace line to an execution error when the source map
/// knows the faulting address.
fn locate_error(error: ExecError, program: &EncodedProgram) -> color_eyre::Report {
    match program.source_map.get_by_left(&error.pc()) {
        Some(line) => eyre!("{error} (trace line {line})"),
        None => eyre!("{error}"),
    }
}

fn print_core_state(core: &Core) {
    println!("Register file");
    for (i, value) in core.x.x.iter().enumerate() {
        println!("x{i} \t: {value}");
    }
    println!("Clock cycle: {}", core.clk);
}

fn print_data_memory(core: &Core, start: usize, end: usize) {
    let Some(bytes) = core.data_mem.range(start, end) else {
        println!("Address range [{start}, {end}) is invalid");
        return;
    };

    println!("Data memory: bytes (in hex) within address range [{start}, {end})");
    for (offset, byte) in bytes.iter().enumerate() {
        println!("{}: \t {:02x}", start + offset, byte);
    }
}
