use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use chisel_gen::driver::{run, RunConfig};

/// Reads a grammar description and emits a self-contained recursive-descent
/// parser.
#[derive(Parser, Debug)]
#[command(name = "chisel-gen", version, about)]
struct Cli {
    /// Path to the grammar source file.
    grammar_file: PathBuf,

    /// Output path for the generated parser header.
    #[arg(short = 'o', long = "output", default_value = "chisel.hpp")]
    output: PathBuf,

    /// Output path for the generated visitor header.
    #[arg(short = 'v', long = "visitor", default_value = "visitor.hpp")]
    visitor: PathBuf,

    /// Also generate a template main entry using a bundled template.
    #[arg(short = 't', long = "template")]
    template: bool,

    /// Pretty-print the canonicalized combinator forest instead of
    /// emitting C++, for debugging a grammar.
    #[arg(long = "dump-ir")]
    dump_ir: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = RunConfig {
        grammar_path: cli.grammar_file,
        output_path: cli.output,
        visitor_path: cli.visitor,
        emit_template: cli.template,
        dump_ir: cli.dump_ir,
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("chisel-gen: {err}");
            ExitCode::FAILURE
        }
    }
}
