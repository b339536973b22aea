//! Ivy compiler CLI
//!
//! Compiles Ivy contract source files and prints the result as JSON;
//! also disassembles compiled programs for inspection.

use clap::{Parser, Subcommand};
use ivy_compiler::compiler::{compile, ContractArg};
use ivy_compiler::vm;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ivyc")]
#[command(version = "0.1.0")]
#[command(about = "Compiler for the Ivy smart-contract language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a contract source file
    Compile {
        /// Path to the .ivy source file
        source: PathBuf,

        /// Instantiation arguments as a JSON array, e.g.
        /// '[{"integer": 5}, {"string": "ab12"}]'
        #[arg(short, long)]
        args: Option<String>,

        /// Pretty-print the result JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Disassemble a compiled program
    Disasm {
        /// The program as a hex string
        hex: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Compile {
            source,
            args,
            pretty,
        } => {
            let text = fs::read_to_string(&source)?;
            let args: Vec<ContractArg> = match args {
                Some(json) => serde_json::from_str(&json)?,
                None => Vec::new(),
            };
            let result = compile(&text, &args)?;
            let rendered = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{}", rendered);
        }

        Commands::Disasm { hex } => {
            let program = hex::decode(hex.trim())?;
            print!("{}", vm::disassemble(&program)?);
        }
    }
    Ok(())
}
