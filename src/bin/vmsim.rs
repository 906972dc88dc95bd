//! vmsim command-line front end.
//!
//! Reads a trace, runs it through one replacement policy, prints one line
//! per access and a summary.
//!
//! ```text
//! vmsim -n <numframes> -a <opt|clock|nru|rand> [-r <refresh>] <tracefile>
//! ```

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use vmsim::common::config::DEFAULT_RANDOM_SEED;
use vmsim::trace::read_trace;
use vmsim::{Algorithm, SimConfig, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "vmsim",
    author,
    version,
    about = "Virtual memory page replacement simulator",
    long_about = "Replays a memory trace against a fixed number of frames and reports hits, \
                  page faults and dirty-page writebacks.\n\nTrace lines are \"<hex address> <R|W>\".\n\n\
                  Examples:\n  vmsim -n 8 -a opt gcc.trace\n  vmsim -n 16 -a nru -r 32 gcc.trace"
)]
struct Cli {
    /// Number of physical frames.
    #[arg(short = 'n', long = "frames")]
    frames: usize,

    /// Replacement policy: opt, clock, nru or rand.
    #[arg(short = 'a', long = "algorithm")]
    algorithm: Algorithm,

    /// NRU reference-bit refresh interval, in accesses (required for nru).
    #[arg(short = 'r', long = "refresh")]
    refresh: Option<usize>,

    /// Seed for the rand policy.
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_RANDOM_SEED)]
    seed: u64,

    /// Only print the summary.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Trace file.
    tracefile: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("vmsim: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> vmsim::Result<()> {
    let config = SimConfig {
        frames: cli.frames,
        algorithm: cli.algorithm,
        refresh: cli.refresh,
        seed: cli.seed,
    };
    // Config errors win over a missing or malformed trace.
    config.validate()?;

    let trace = read_trace(&cli.tracefile)?;
    let mut sim = Simulator::from_config(&config, &trace)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    // A failed write (e.g. a closed pipe) ends the run at that access.
    sim.run(&trace, |outcome| {
        if !cli.quiet {
            writeln!(out, "{outcome}")?;
        }
        Ok(())
    })?;

    writeln!(out, "{}", sim.summary())?;
    out.flush()?;
    Ok(())
}
