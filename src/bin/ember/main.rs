//! # Ember
//!
//! CLI entry point: runs a source file in one of three modes (lex, parse,
//! evaluate), or drops into the matching REPL when no file is given.
mod cli;
mod repl;

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use cli::Cli;
use ember::evaluator::eval_program;
use ember::lexer::Lexer;
use ember::object::Environment;
use ember::parser::Parser;
use ember::token::TokenKind;

fn main() {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let mode = if args.lex {
        repl::Mode::Lex
    } else if args.parse {
        repl::Mode::Parse
    } else {
        repl::Mode::Eval
    };

    let result = match &args.file {
        Some(file) => run_file(file, mode),
        None => repl::start(mode).map_err(anyhow::Error::from),
    };

    if let Err(err) = result {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}

fn run_file(path: &Path, mode: repl::Mode) -> Result<()> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            bail!("File: \"{}\" does not exist.", path.display());
        }
        Err(_) if path.is_dir() => {
            bail!("File: \"{}\" is a directory.", path.display());
        }
        Err(err) => {
            bail!("File: \"{}\" {err}.", path.display());
        }
    };

    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    match mode {
        repl::Mode::Lex => lex_source(&source),
        repl::Mode::Parse => parse_source(&source, dir),
        repl::Mode::Eval => evaluate_source(&source, dir),
    }
    Ok(())
}

fn lex_source(source: &str) {
    let mut lexer = Lexer::new(source);
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eof {
            break;
        }
        println!("Token: {{{}}}, Literal: {{{}}}", token.kind, token.literal);
    }
}

fn parse_source(source: &str, dir: std::path::PathBuf) {
    let mut parser = Parser::new(Lexer::new(source), dir);
    let program = parser.parse_program();
    if !parser.errors.is_empty() {
        repl::print_errors(&parser.errors);
    } else {
        println!("{program}");
    }
}

fn evaluate_source(source: &str, dir: std::path::PathBuf) {
    let mut parser = Parser::new(Lexer::new(source), dir);
    let program = parser.parse_program();
    if !parser.errors.is_empty() {
        repl::print_errors(&parser.errors);
        return;
    }
    let env = Environment::new();
    let result = eval_program(&program, &env);
    println!("{result}");
}
