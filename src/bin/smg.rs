// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `smg` is the command-line host for the scripting language: it reads
//! a source file, runs it to completion, and reports any error with
//! its source line highlighted.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use structopt::StructOpt;

use smg::builtins;
use smg::interpreter::Interpreter;
use smg::parser::parse_program;
use smg::span::LineMap;
use smg::value::Value;

#[derive(Debug, StructOpt)]
#[structopt(name = "smg", about = "Running scripts")]
struct Opt {
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,

    /// Marshal floating-point values across host calls as decimal
    /// strings instead of binary doubles.
    #[structopt(long = "decimal-mode")]
    decimal_mode: bool,

    /// The source file to run.
    #[structopt(parse(from_os_str))]
    source: PathBuf,
}

fn main() -> ExitCode {
    let opt = Opt::from_args();

    let level = if opt.verbose {
        log::Level::Trace
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level).unwrap();

    let source = match std::fs::read_to_string(&opt.source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error reading {}: {}", opt.source.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(&source, opt.decimal_mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let line_map = LineMap::new(&source);
            let line = err.line.min(line_map_max_line(&source));
            eprintln!("{}", err);
            eprintln!("{}", line_map.highlight(line, 1));
            ExitCode::FAILURE
        }
    }
}

/// The line count of `source`, used to keep an error's recorded line
/// in range for `LineMap::highlight`, which indexes directly into its
/// line-offset table and would panic on an out-of-range line rather
/// than degrade gracefully.
fn line_map_max_line(source: &str) -> usize {
    source.lines().count().max(1)
}

fn run(source: &str, decimal_mode: bool) -> smg::error::SmgResult<()> {
    let program = parse_program(source)?;

    let mut interpreter = Interpreter::new().with_decimal_mode(decimal_mode);
    interpreter.define_global(
        "print",
        Value::host_fn(|args| {
            print!("{}", builtins::join_print_args(args));
            let _ = io::stdout().flush();
            Ok(Value::Null)
        }),
    );
    interpreter.define_global(
        "println",
        Value::host_fn(|args| {
            println!("{}", builtins::join_print_args(args));
            Ok(Value::Null)
        }),
    );

    interpreter.run(&program)?;
    Ok(())
}
