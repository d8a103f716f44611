mod repl;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use koala_cli::common::render_error;
use koala_cli::compile_source;
use koala_compiler::Compiler;
use koala_vm::Vm;
use log::{debug, LevelFilter};
use owo_colors::OwoColorize;

#[derive(Parser, Debug)]
#[command(name = "koala", version, about = "Run KoalaCode programs or start the REPL")]
struct Cli {
    /// Source file to run. Starts the REPL when omitted.
    file: Option<PathBuf>,

    /// Print the compiled bytecode instead of running it
    #[arg(long = "dump", default_value_t = false)]
    dump: bool,

    /// More log output: -v for debug, -vv for a per-instruction trace
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.format_timestamp(None).init();
}

fn run_file(path: &Path, dump: bool) {
    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("Failed to read {}: {}", path.display(), e).red()
            );
            std::process::exit(1);
        }
    };
    debug!("loaded {} ({} bytes)", path.display(), src.len());

    let program = match compile_source(&mut Compiler::new(), &src) {
        Ok(p) => p,
        Err(e) => {
            render_error(&src, &e);
            std::process::exit(1);
        }
    };

    if dump {
        print!("{}", program.disassemble());
        return;
    }

    let mut vm = Vm::new();
    if let Err(e) = vm.run(&program) {
        render_error(&src, &e);
        std::process::exit(1);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.file {
        Some(path) => run_file(&path, cli.dump),
        None => repl::start_repl(),
    }
}
