use std::process;

use clap::Parser;
use log::LevelFilter;
use rope_expr::{Compiler, Expression};

#[derive(Debug, Parser)]
#[command(name = "rope-expr")]
#[command(about = "Compile a formula of one parameter and evaluate it")]
#[command(version)]
struct Cli {
    /// Formula to compile, e.g. `sin(2*t) + t^2`
    #[arg(allow_hyphen_values = true)]
    formula: String,

    /// Name of the free variable
    #[arg(short, long, default_value_t = 't')]
    name: char,

    /// Evaluate at this value of the free variable (repeatable)
    #[arg(long = "at", value_name = "VALUE", allow_negative_numbers = true)]
    at: Vec<f64>,

    /// Start of an evenly sampled range
    #[arg(long, requires = "to", allow_negative_numbers = true)]
    from: Option<f64>,

    /// End of an evenly sampled range
    #[arg(long, requires = "from", allow_negative_numbers = true)]
    to: Option<f64>,

    /// Number of intervals the range is split into
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Skip constant folding and function fusion
    #[arg(long)]
    no_optimize: bool,

    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();
    log::debug!("cli: {cli:?}");

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let expression: Expression = Compiler::new(&cli.name.to_string())?
        .optimize(!cli.no_optimize)
        .compile(&cli.formula)?;
    log::info!("compiled into {expression}");

    if let (Some(from), Some(to)) = (cli.from, cli.to) {
        let params = linspace(from, to, cli.steps);
        let values = expression.sample(cli.name, &params)?;
        for (param, value) in params.iter().zip(values) {
            println!("{param} {value}");
        }
    } else if !cli.at.is_empty() {
        let function = expression.bind(cli.name)?;
        for &param in &cli.at {
            println!("{}", function(param));
        }
    } else {
        println!("{}", expression.evaluate_without_parameter()?);
    }
    Ok(())
}

/// `steps + 1` evenly spaced values from `from` to `to`, both included.
fn linspace(from: f64, to: f64, steps: usize) -> Vec<f64> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| from + (to - from) * i as f64 / steps as f64)
        .collect()
}
