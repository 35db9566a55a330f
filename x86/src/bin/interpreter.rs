use std::error::Error;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use x86::{Config, Interpreter};


#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Assembly source file
    source: PathBuf,

    /// Global memory size in bytes
    #[arg(short, long, default_value_t = x86::config::MEMORY_SIZE)]
    memory_size: u32,

    /// Stop after this many executed instructions
    #[arg(short, long)]
    step_limit: Option<u64>,

    /// Print a hexdump of memory and the declared variables
    #[arg(short, long)]
    dump_memory: bool,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = main_real(args) {
        tracing::error!("{e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main_real(args: Args) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(&args.source)
        .map_err(|e| format!("cant open {}: {e}", args.source.display()))?;

    let config = Config {
        memory_size: args.memory_size,
        step_limit: args.step_limit,
    };

    let mut interpreter = Interpreter::new(&config);
    let result = interpreter.run(&source);

    tracing::info!("{} instruction(s) executed", interpreter.state.steps());
    println!("{}", interpreter.machine.reg);

    if args.dump_memory {
        println!();
        print!("{}", interpreter.machine.mem);
    }

    result?;
    Ok(())
}
