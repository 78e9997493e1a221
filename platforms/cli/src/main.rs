use clap::Parser;
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use turing_tape::{ProgramLoader, ProgramManager, TuringMachine};

/// Number of steps run when none is given.
const DEFAULT_STEPS: usize = 10;

/// Runs a Turing machine program for a fixed number of steps and prints its tape.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tt programs/turing-first.tm -n 20
  tt --builtin unary-successor --save resumed.tm
  tt resumed.tm -n 5")]
struct Cli {
    /// Path to a program or snapshot file (.tm).
    #[clap(required_unless_present_any = ["builtin", "list"], conflicts_with = "builtin")]
    program: Option<PathBuf>,

    /// Number of steps to run.
    #[clap(short = 'n', long, default_value_t = DEFAULT_STEPS)]
    steps: usize,

    /// Run a built-in program instead of a file.
    #[clap(short, long)]
    builtin: Option<String>,

    /// List the built-in programs and exit.
    #[clap(short, long)]
    list: bool,

    /// Write the snapshot of the final machine to this file.
    #[clap(short, long)]
    save: Option<PathBuf>,

    /// Print a JSON report instead of the bare tape contents.
    #[clap(long)]
    json: bool,

    /// Log every step.
    #[clap(short = 'd', long)]
    debug: bool,
}

/// The result of a run, printed with `--json`.
#[derive(Serialize)]
struct Report<'a> {
    state: &'a str,
    steps: usize,
    contents: String,
    snapshot: String,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so the tape contents stay alone on stdout.
    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        for name in ProgramManager::list_program_names() {
            let info = ProgramManager::get_program_info(name)?;
            println!("{:<20} {}", info.name, info.description);
        }
        return Ok(());
    }

    let mut machine = load_machine(cli)?;
    execute(&mut machine, cli.steps)?;

    if let Some(path) = &cli.save {
        save_snapshot(&machine, path)?;
    }

    if cli.json {
        let report = Report {
            state: machine.state(),
            steps: machine.step_count(),
            contents: machine.tape().contents_as_string(),
            snapshot: machine.encode(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", machine.tape().contents_as_string());
    }

    Ok(())
}

/// Loads the machine named on the command line, either a built-in or a file.
fn load_machine(cli: &Cli) -> Result<TuringMachine, Box<dyn Error>> {
    let machine = match (&cli.builtin, &cli.program) {
        (Some(name), _) => {
            info!(program = %name, "loading built-in program");
            ProgramManager::get_program_by_name(name)?
        }
        (None, Some(path)) => {
            info!(path = %path.display(), "loading program");
            ProgramLoader::load_program(path)?
        }
        (None, None) => return Err("no program given".into()),
    };

    debug!(
        state = machine.state(),
        steps = machine.step_count(),
        states = machine.table().len(),
        "machine ready"
    );

    Ok(machine)
}

/// Runs `steps` steps, logging each one.
fn execute(machine: &mut TuringMachine, steps: usize) -> Result<(), Box<dyn Error>> {
    for _ in 0..steps {
        machine.step()?;
        debug!(
            step = machine.step_count(),
            state = machine.state(),
            cursor = machine.tape().cursor(),
            tape = %machine.tape().contents_as_string(),
        );
    }

    info!(
        steps,
        state = machine.state(),
        total = machine.step_count(),
        "run finished"
    );

    Ok(())
}

fn save_snapshot(machine: &TuringMachine, path: &Path) -> Result<(), Box<dyn Error>> {
    fs::write(path, machine.encode() + "\n")
        .map_err(|e| format!("Failed to write snapshot {}: {}", path.display(), e))?;
    info!(path = %path.display(), "snapshot saved");

    Ok(())
}
