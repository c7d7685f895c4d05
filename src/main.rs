use clap::{Parser, ValueEnum};
use qengine::algorithms::deutsch::{self, DeutschOutcome, Oracle};
use qengine::{Measurement, QuantumRegister};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OracleArg {
    Const0,
    Const1,
    BalancedX,
    BalancedNotX,
}

impl From<OracleArg> for Oracle {
    fn from(arg: OracleArg) -> Self {
        match arg {
            OracleArg::Const0 => Oracle::Const0,
            OracleArg::Const1 => Oracle::Const1,
            OracleArg::BalancedX => Oracle::BalancedX,
            OracleArg::BalancedNotX => Oracle::BalancedNotX,
        }
    }
}

/// Runs Deutsch's algorithm on a simulated 2-qubit register.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Oracle to query; picked at random when omitted
    #[arg(long, value_enum)]
    oracle: Option<OracleArg>,

    /// Seed for the measurement RNG
    #[arg(long)]
    seed: Option<u64>,

    /// Print the register amplitudes before measuring
    #[arg(long)]
    show_state: bool,
}

fn print_register(reg: &QuantumRegister) {
    println!("Register state (basis amplitudes):");
    for (i, amp) in reg.amplitudes().iter().enumerate() {
        println!("  |{}⟩: ({:.4} + {:.4}i)", i, amp.re, amp.im);
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let oracle = cli
        .oracle
        .map(Oracle::from)
        .unwrap_or_else(|| Oracle::random(&mut rng));

    log::info!("Running Deutsch's algorithm...");
    log::info!("Using {}", oracle);

    if cli.show_state {
        match deutsch::prepare(oracle) {
            Ok(reg) => print_register(&reg),
            Err(e) => log::error!("failed to prepare register: {}", e),
        }
    }

    match deutsch::run(oracle, &Measurement::default(), &mut rng) {
        Ok(DeutschOutcome::Constant) => {
            println!("First qubit is |0⟩ -> f(x) is CONSTANT.");
            ExitCode::SUCCESS
        }
        Ok(DeutschOutcome::Balanced) => {
            println!("First qubit is |1⟩ -> f(x) is BALANCED.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Measurement failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
