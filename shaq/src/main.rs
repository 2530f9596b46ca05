//! Shaq: a live shader sandbox driven by SEL, the Shader Expression Language (spec §1).
//!
//! This binary is the thinnest possible glue: parse the CLI (§6), install the logger, load the
//! project file, and run the main loop against whatever [`shaq_render::GpuBackend`] is wired in.
//! The GLSL compiler, GPU driver, and windowing/input back-end are explicitly out of scope (§1);
//! [`backend::HeadlessBackend`] stands in for them so the rest of the pipeline is still runnable
//! and observable end to end.

mod app;
mod backend;
mod fps_limiter;
mod logger;
mod reload;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Live shader sandbox driven by the Shader Expression Language.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the project file to load.
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Seed for the session's `rand`/`randi` PRNG. Defaults to wall-clock entropy.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// List every built-in constant and function, then exit.
    #[arg(short = 'l', long = "list-builtins")]
    list_builtins: bool,

    /// Suppress informational log output; only warnings and errors are printed.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.list_builtins {
        print_builtins();
        return ExitCode::SUCCESS;
    }

    logger::init(args.quiet);

    let Some(input) = args.input else {
        tracing::error!("no project file given; pass -i <path>");
        return ExitCode::FAILURE;
    };

    let mut backend = backend::HeadlessBackend::new();
    match app::run(&input, args.seed, &mut backend) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("fatal: {err}");
            ExitCode::FAILURE
        }
    }
}

/// `-l`/`--list-builtins`: enumerates the built-in registry's constants and functions with their
/// types, purity, and signature (spec §4.6, SPEC_FULL.md §2.2).
fn print_builtins() {
    println!("constants:");
    for constant in shaq_sel::builtins::CONSTANTS {
        println!("  {} : {} = {}", constant.name, constant.ty, constant.value);
    }

    println!("functions:");
    for function in shaq_sel::builtins::FUNCTIONS {
        let purity = if function.pure_ { "pure" } else { "impure" };
        let args: Vec<&str> = function.args.iter().map(|ty| ty.name()).collect();
        println!(
            "  {}({}) -> {} [{}] -- {}",
            function.name,
            args.join(", "),
            function.result,
            purity,
            function.doc
        );
    }
}
