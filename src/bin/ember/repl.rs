//! Interactive read-eval-print loop.
use std::path::PathBuf;

use ember::evaluator::eval_program;
use ember::lexer::Lexer;
use ember::object::Environment;
use ember::parser::Parser;
use ember::token::TokenKind;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "ember> ";
const FAREWELL: &str = "Now exiting... see you later!";

#[derive(Clone, Copy)]
pub enum Mode {
    Lex,
    Parse,
    Eval,
}

pub fn start(mode: Mode) -> rustyline::Result<()> {
    print_header(mode);

    let mut editor = DefaultEditor::new()?;
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env = Environment::new();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line == "exit()" {
                    println!("{FAREWELL}");
                    return Ok(());
                }
                let _ = editor.add_history_entry(line.as_str());
                run_line(&line, mode, &cwd, &env);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\n{FAREWELL}");
                return Ok(());
            }
            Err(err) => return Err(err),
        }
    }
}

fn run_line(line: &str, mode: Mode, cwd: &std::path::Path, env: &ember::object::environment::Env) {
    match mode {
        Mode::Lex => {
            let mut lexer = Lexer::new(line);
            loop {
                let token = lexer.next_token();
                if token.kind == TokenKind::Eof {
                    break;
                }
                println!("Token: {{{}}}, Literal: {{{}}}", token.kind, token.literal);
            }
        }
        Mode::Parse => {
            let mut parser = Parser::new(Lexer::new(line), cwd.to_path_buf());
            let program = parser.parse_program();
            if !parser.errors.is_empty() {
                print_errors(&parser.errors);
            } else {
                println!("{program}");
            }
        }
        Mode::Eval => {
            let mut parser = Parser::new(Lexer::new(line), cwd.to_path_buf());
            let program = parser.parse_program();
            if !parser.errors.is_empty() {
                print_errors(&parser.errors);
                return;
            }
            println!("{}", eval_program(&program, env));
        }
    }
}

pub fn print_errors(errors: &[String]) {
    for error in errors {
        println!("\t{error}");
    }
}

fn print_header(mode: Mode) {
    let label = match mode {
        Mode::Lex => "LEXING",
        Mode::Parse => "LEXING AND PARSING",
        Mode::Eval => "EVALUATION",
    };
    println!("Ember — a small C-like scripting language.");
    println!("Running in {label} mode.\n");
}
