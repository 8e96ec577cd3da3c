// ========================================================================================
//
//                       THE COMMAND-LINE FRONT END: FASTGL
//
// ========================================================================================
//
// Thin driver over the library. It parses arguments, optionally loads a TOML
// configuration, runs the chosen engine and prints one `node<TAB>weight` line per node
// in ascending order. All numerics live in the library; this file only owns process
// concerns (logging setup, output buffering, exit codes).

use clap::{Parser, ValueEnum};
use fastgl::{FastRootEngine, QuadratureConfig, QuadratureRule, ReferenceRootEngine};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

// ========================================================================================
//                         COMMAND-LINE INTERFACE DEFINITION
// ========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Asymptotic estimates plus fixed Newton corrections, O(n).
    Fast,
    /// Classic Newton iteration on the three-term recurrence, O(n^2).
    Reference,
}

#[derive(Parser, Debug)]
#[command(
    name = "fastgl",
    version,
    about = "Computes Gauss-Legendre quadrature nodes and weights on [-1, 1].",
    allow_negative_numbers = true
)]
struct Args {
    /// Number of nodes in the rule.
    order: i64,

    /// Engine used to compute the rule.
    #[arg(short, long, value_enum, default_value_t = Method::Fast)]
    method: Method,

    /// TOML file with engine settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print the sum of the weights to stderr.
    #[arg(long)]
    sum: bool,
}

// ========================================================================================
//                                   ENTRY POINT
// ========================================================================================

fn main() {
    env_logger::init();
    let args = Args::parse();
    let start_time = Instant::now();

    let config = match &args.config {
        Some(path) => match QuadratureConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        None => QuadratureConfig::default(),
    };

    let computed = match args.method {
        Method::Fast => FastRootEngine::new(config).and_then(|engine| engine.compute(args.order)),
        Method::Reference => {
            ReferenceRootEngine::new(config).and_then(|engine| engine.compute(args.order))
        }
    };
    let rule = match computed {
        Ok(rule) => rule,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    log::info!(
        "computed {}-point rule with the {:?} engine in {:.2?}",
        rule.order(),
        args.method,
        start_time.elapsed()
    );

    if let Err(e) = write_rule(&rule, io::stdout().lock()) {
        // A closed pipe (e.g. `fastgl 100 | head`) is not an error.
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("Error writing output: {e}");
            process::exit(1);
        }
    }

    if args.sum {
        let mut buffer = ryu::Buffer::new();
        eprintln!("sum of weights: {}", buffer.format(rule.weight_sum()));
    }
}

// ========================================================================================
//                                      OUTPUT
// ========================================================================================

/// Writes one `node<TAB>weight` line per node in shortest round-trip form.
fn write_rule(rule: &QuadratureRule, out: impl Write) -> io::Result<()> {
    let mut writer = BufWriter::new(out);
    let mut node_buffer = ryu::Buffer::new();
    let mut weight_buffer = ryu::Buffer::new();
    for pair in rule.pairs() {
        writeln!(
            writer,
            "{}\t{}",
            node_buffer.format(pair.node),
            weight_buffer.format(pair.weight)
        )?;
    }
    writer.flush()
}
