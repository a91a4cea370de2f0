// Copyright 2022 Asen Lazarov

use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::Parser;

use conf::*;
use engine::Interpreter;

mod conf;
mod engine;
mod lexer;
mod output;
mod parser;

pub type DynError = Box<dyn Error>;
pub type DynBoxWrite = Box<dyn Write>;

const SCRIPT_EXTENSION: &str = "cql";

/// Import the configured preload tables before any user input runs.
fn preload_tables(interp: &mut Interpreter, conf: &Conf) {
    for pt in conf.preload() {
        let cmd = parser::Command::Import {
            table: pt.name.clone(),
            file: pt.file.clone(),
        };
        match interp.execute(&cmd) {
            Ok(Some(msg)) => log::info!("{}", msg),
            Ok(None) => {}
            Err(e) => log::error!("preload of '{}' failed: {}", pt.name, e),
        }
    }
}

/// Print one batch's outcome. Errors are ordinary output here, not exit
/// codes: a failed command reports its message the same way a successful
/// one does.
fn print_outcome(
    interp: &mut Interpreter,
    outcome: Result<Option<String>, DynError>,
) -> Result<(), DynError> {
    match outcome {
        Ok(Some(result)) => writeln!(interp.out(), "{}", result)?,
        Ok(None) => {}
        Err(e) => writeln!(interp.out(), "{}", e)?,
    }
    interp.out().flush()?;
    Ok(())
}

fn run_script(interp: &mut Interpreter, filename: &str) -> Result<(), DynError> {
    let path = Path::new(filename);
    if !path.exists() {
        return Err(Box::new(ConfigError::new(&format!(
            "File {} does not exist",
            filename
        ))));
    }
    if path.extension().and_then(|e| e.to_str()) != Some(SCRIPT_EXTENSION) {
        return Err(Box::new(ConfigError::new(&format!(
            "File {} must have .{} extension",
            filename, SCRIPT_EXTENSION
        ))));
    }
    let content = fs::read_to_string(path)?;
    let outcome = interp.interpret(&content);
    print_outcome(interp, outcome)
}

fn run_repl(interp: &mut Interpreter, prompt: &str) -> Result<(), DynError> {
    println!("CQL interpreter (type 'EXIT' to quit)");
    let stdin = io::stdin();
    loop {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            break;
        }
        let outcome = interp.interpret(line);
        print_outcome(interp, outcome)?;
    }
    Ok(())
}

fn main() -> Result<(), DynError> {
    env_logger::init();
    let args: CliArgs = CliArgs::parse();
    let external = args.get_external_conf()?;
    let conf = Conf::new(args, external);
    let outp = conf.get_outp()?;
    let mut interp = Interpreter::with_output(outp);
    preload_tables(&mut interp, &conf);
    match conf.script() {
        Some(filename) => run_script(&mut interp, filename),
        None => run_repl(&mut interp, conf.prompt()),
    }
}

#[test]
fn verify_app() {
    use clap::CommandFactory;
    CliArgs::command().debug_assert()
}
