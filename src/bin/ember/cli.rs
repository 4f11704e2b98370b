//! Command-line argument parsing for the `ember` binary.
use clap::{Parser, ValueEnum};

/// Lexer, parser and tree-walking evaluator for the Ember scripting language.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Source file to run. Omit to start a REPL.
    pub file: Option<std::path::PathBuf>,

    /// Lex input only. Do not parse, evaluate or collect $200.
    #[arg(short, long, conflicts_with = "parse")]
    pub lex: bool,

    /// Lex and parse input. Do not evaluate.
    #[arg(short, long)]
    pub parse: bool,

    /// Specify the log level.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    #[default]
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
